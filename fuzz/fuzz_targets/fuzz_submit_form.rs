#![no_main]

//! Fuzz target for submission form validation.
//!
//! Any accepted form must come out trimmed and within the character limits,
//! and must survive a trip through the store unchanged.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tempfile::tempdir;

use suggestbox::db::Database;
use suggestbox::store::Repository;
use suggestbox::submit::{
    SubmissionForm, SubmitOutcome, MAX_CONTACT_CHARS, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS,
};

#[derive(Arbitrary, Debug)]
struct FormInput {
    title: String,
    description: Option<String>,
    contact: Option<String>,
}

fuzz_target!(|input: FormInput| {
    let form = SubmissionForm::new(
        &input.title,
        input.description.as_deref(),
        input.contact.as_deref(),
    );

    let Ok(suggestion) = form.validate() else {
        return;
    };
    assert!(!suggestion.title.is_empty());
    assert_eq!(suggestion.title, suggestion.title.trim());
    assert!(suggestion.title.chars().count() <= MAX_TITLE_CHARS);
    if let Some(d) = &suggestion.description {
        assert!(!d.is_empty() && d.chars().count() <= MAX_DESCRIPTION_CHARS);
    }
    if let Some(c) = &suggestion.contact {
        assert!(!c.is_empty() && c.chars().count() <= MAX_CONTACT_CHARS);
    }

    let dir = match tempdir() {
        Ok(d) => d,
        Err(_) => return,
    };
    let db = match Database::open(&dir.path().join("store.db")) {
        Ok(d) => d,
        Err(_) => return,
    };
    if db.create_project("demo").is_err() {
        return;
    }

    let mut form = form;
    if let Ok(SubmitOutcome::Submitted(id)) = form.submit(&db, "demo") {
        let stored = db.get_suggestion(&id).ok().flatten();
        assert_eq!(stored.map(|s| s.title), Some(suggestion.title));
    }
});
