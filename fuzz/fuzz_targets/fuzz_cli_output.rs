#![no_main]

//! Fuzz target for CLI output functions.
//!
//! Rows of the suggestion list truncate titles and format ages in both
//! locales. The goal is to catch panics from byte slicing on multi-byte
//! characters and from extreme timestamps or counts.

use arbitrary::Arbitrary;
use chrono::{Duration, Utc};
use libfuzzer_sys::fuzz_target;
use tempfile::tempdir;

use suggestbox::commands::list::{collect, format_row, truncate};
use suggestbox::db::Database;
use suggestbox::i18n::{BG, EN};
use suggestbox::models::NewSuggestion;
use suggestbox::store::{Repository, SortOrder};
use suggestbox::vote::VoteState;

#[derive(Arbitrary, Debug)]
struct CliOutputInput {
    /// Suggestion title - can contain any Unicode
    title: String,
    /// Suggestion description - can contain any Unicode
    description: Option<String>,
    /// Age of the suggestion in minutes
    age_minutes: u32,
    /// Number of suggestions to create (for list testing)
    num_suggestions: u8,
}

fuzz_target!(|input: CliOutputInput| {
    for max in [4usize, 10, 50] {
        let _ = truncate(&input.title, max);
    }

    let dir = match tempdir() {
        Ok(d) => d,
        Err(_) => return,
    };
    let db = match Database::open(&dir.path().join("store.db")) {
        Ok(d) => d,
        Err(_) => return,
    };
    let project = match db.create_project("demo") {
        Ok(p) => p,
        Err(_) => return,
    };

    let num_suggestions = (input.num_suggestions % 25).max(1);
    for i in 0..num_suggestions {
        let title = if i == 0 {
            input.title.clone()
        } else {
            format!("{} #{}", input.title, i)
        };
        let _ = db.insert_suggestion(
            &project,
            &NewSuggestion {
                title,
                description: input.description.clone(),
                contact: None,
            },
        );
    }

    let feed = match collect(&db, None, "demo", SortOrder::Recent, None) {
        Ok(f) => f,
        Err(_) => return,
    };

    let now = Utc::now() + Duration::minutes(i64::from(input.age_minutes));
    for suggestion in feed.suggestions() {
        let _ = format_row(suggestion, VoteState::Up, now, &EN);
        let _ = format_row(suggestion, VoteState::None, now, &BG);
    }
});
