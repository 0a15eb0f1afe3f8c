#![no_main]

//! Fuzz target for the vote state machine.
//!
//! Drives arbitrary click sequences from several voters through the engine
//! against a real store, optionally interleaving a second click while the
//! first is still pending. After every step the locally tracked count must
//! match the stored count and the stored count must equal the vote sum.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tempfile::tempdir;

use suggestbox::db::Database;
use suggestbox::models::{Direction, NewSuggestion};
use suggestbox::store::Repository;
use suggestbox::vote::{LocalVote, VoteEngine, VoteState};

#[derive(Arbitrary, Debug)]
struct Click {
    voter: u8,
    up: bool,
    double_click: bool,
}

fuzz_target!(|clicks: Vec<Click>| {
    let dir = match tempdir() {
        Ok(d) => d,
        Err(_) => return,
    };
    let db = match Database::open(&dir.path().join("store.db")) {
        Ok(d) => d,
        Err(_) => return,
    };
    let Ok(project) = db.create_project("demo") else {
        return;
    };
    let Ok(id) = db.insert_suggestion(
        &project,
        &NewSuggestion {
            title: "Fuzz".to_string(),
            description: None,
            contact: None,
        },
    ) else {
        return;
    };

    let mut engine = VoteEngine::new();
    for click in clicks.iter().take(64) {
        let voter = format!("voter_{}", click.voter % 4);
        let direction = if click.up { Direction::Up } else { Direction::Down };

        let Ok(Some(suggestion)) = db.get_suggestion(&id) else {
            return;
        };
        let prior = db
            .list_votes_for(&voter, std::slice::from_ref(&id))
            .unwrap_or_default();
        let mut local = LocalVote::new(
            suggestion.vote_count,
            VoteState::from(prior.first().map(|v| v.direction)),
        );

        let Some(pending) = engine.begin(&id, &mut local, direction) else {
            panic!("gate closed with nothing in flight");
        };
        if click.double_click {
            let before = local;
            assert!(engine.begin(&id, &mut local, direction).is_none());
            assert_eq!(before, local);
        }

        if engine.reconcile(&db, &voter, &pending, &mut local).is_err() {
            return;
        }
        assert!(!engine.is_pending(&id));

        let stored = db.get_suggestion(&id).ok().flatten().map(|s| s.vote_count);
        assert_eq!(stored, Some(local.count));
        assert_eq!(db.vote_sum(&id).ok(), Some(local.count));
    }
});
