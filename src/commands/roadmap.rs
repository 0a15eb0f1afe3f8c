use anyhow::Result;

use crate::db::Database;
use crate::i18n::Messages;
use crate::models::RoadmapStatus;
use crate::roadmap::{RoadmapFeed, StatusCounts, StatusFilter};
use crate::settings::Settings;

pub fn run(db: &Database, settings: &Settings, project: &str, filter: StatusFilter) -> Result<()> {
    let messages = settings.messages();
    let feed = RoadmapFeed::load(db, project);

    println!("{}", messages.roadmap);
    println!("{}", messages.roadmap_description);
    println!();
    println!("{}", format_tabs(&feed.counts(), filter, messages));
    println!();

    let items = feed.filter(filter);
    if items.is_empty() {
        println!("{}", messages.no_roadmap_items);
        return Ok(());
    }

    for item in items {
        println!("[{}] {}", messages.status_label(item.status), item.title);
        if let Some(desc) = &item.description {
            for line in desc.lines() {
                println!("    {}", line);
            }
        }
    }

    Ok(())
}

/// One label per tab with its count; the selected tab is bracketed.
pub fn format_tabs(counts: &StatusCounts, selected: StatusFilter, messages: &Messages) -> String {
    let mut tabs = vec![(StatusFilter::All, messages.status_all)];
    tabs.extend(
        RoadmapStatus::ALL
            .iter()
            .map(|status| (StatusFilter::Only(*status), messages.status_label(*status))),
    );

    tabs.into_iter()
        .map(|(filter, label)| {
            let tab = format!("{} ({})", label, counts.get(filter));
            if filter == selected {
                format!("[{}]", tab)
            } else {
                tab
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}
