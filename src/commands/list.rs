use anyhow::{bail, Result};
use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::feed::SuggestionFeed;
use crate::i18n::{format_time_ago, Messages};
use crate::models::Suggestion;
use crate::settings::Settings;
use crate::store::{SortOrder, StoreError};
use crate::vote::VoteState;

/// Page through the feed the way scrolling would: the first page, then one
/// more each time the end of the list comes into view. `max_pages` of `None`
/// keeps going until a short page arrives.
pub fn collect(
    db: &Database,
    voter: Option<&str>,
    project: &str,
    sort: SortOrder,
    max_pages: Option<usize>,
) -> Result<SuggestionFeed> {
    let mut feed = SuggestionFeed::new(project, sort);
    let mut request = feed.reload();
    let mut loaded = 0;

    loop {
        feed.load(db, voter, request)?;
        loaded += 1;

        if max_pages.is_some_and(|max| loaded >= max) {
            break;
        }
        match feed.on_sentinel_visible() {
            Some(next) => request = next,
            None => break,
        }
    }

    Ok(feed)
}

pub fn run(
    db: &Database,
    settings: &Settings,
    project: &str,
    sort: SortOrder,
    max_pages: Option<usize>,
) -> Result<()> {
    let messages = settings.messages();

    let feed = match collect(db, settings.voter_id.as_deref(), project, sort, max_pages) {
        Ok(feed) => feed,
        Err(e) => {
            if let Some(StoreError::ProjectNotFound(_)) = e.downcast_ref::<StoreError>() {
                bail!("{}", messages.no_project_selected);
            }
            return Err(e.context(messages.error_title));
        }
    };

    let heading = match sort {
        SortOrder::Votes => messages.most_voted,
        SortOrder::Recent => messages.most_recent,
    };
    println!("{} ({})", messages.suggestions, heading);
    println!("{}", messages.share_ideas);
    println!();

    if feed.suggestions().is_empty() {
        println!("{}", messages.no_suggestions);
        return Ok(());
    }

    let now = Utc::now();
    for suggestion in feed.suggestions() {
        println!(
            "{}",
            format_row(suggestion, feed.vote_state(&suggestion.id), now, messages)
        );
    }

    println!();
    if feed.has_more() {
        println!("{} (--pages {})", messages.loading_more, feed.page() + 2);
    } else {
        println!("{}", messages.no_more_suggestions);
    }

    Ok(())
}

pub fn format_row(
    suggestion: &Suggestion,
    state: VoteState,
    now: DateTime<Utc>,
    messages: &Messages,
) -> String {
    let marker = match state {
        VoteState::Up => "[+]",
        VoteState::Down => "[-]",
        VoteState::None => "[ ]",
    };
    format!(
        "{} {:>5}  {:<50} {:<16} {}",
        marker,
        suggestion.vote_count,
        truncate(&suggestion.title, 50),
        format_time_ago(suggestion.created_at, now, messages),
        suggestion.id
    )
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}
