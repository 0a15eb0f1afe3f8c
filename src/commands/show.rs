use anyhow::{bail, Result};
use chrono::Utc;
use tracing::warn;

use crate::db::Database;
use crate::i18n::format_time_ago;
use crate::settings::Settings;
use crate::store::Repository;
use crate::vote::VoteState;

pub fn run(db: &Database, settings: &Settings, id: &str) -> Result<()> {
    let messages = settings.messages();
    let suggestion = match db.get_suggestion(id)? {
        Some(s) => s,
        None => bail!("Suggestion {} not found", id),
    };

    println!("{}", suggestion.title);
    println!("Id: {}", suggestion.id);
    println!("{}", (messages.votes)(suggestion.vote_count));
    println!(
        "{} ({})",
        format_time_ago(suggestion.created_at, Utc::now(), messages),
        suggestion.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(voter) = settings.voter_id.as_deref() {
        let state = match db.list_votes_for(voter, std::slice::from_ref(&suggestion.id)) {
            Ok(votes) => VoteState::from(votes.first().map(|v| v.direction)),
            Err(e) => {
                warn!(error = %e, "could not load prior vote");
                VoteState::None
            }
        };
        if state != VoteState::None {
            println!("Your vote: {}", state.as_str());
        }
    }

    if let Some(desc) = &suggestion.description {
        if !desc.is_empty() {
            println!();
            for line in desc.lines() {
                println!("  {}", line);
            }
        }
    }

    Ok(())
}
