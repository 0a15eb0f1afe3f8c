use tracing::{error, info};

use crate::models::NewSuggestion;
use crate::store::{Repository, StoreError, StoreResult};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_CONTACT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("{field} is too long ({len} characters, at most {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored under this id; the feed should reload from page 0.
    Submitted(String),
    /// A previous submission has not finished.
    Busy,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub title: String,
    pub description: String,
    pub contact: String,
    submitting: bool,
}

impl SubmissionForm {
    pub fn new(title: &str, description: Option<&str>, contact: Option<&str>) -> Self {
        SubmissionForm {
            title: title.to_string(),
            description: description.unwrap_or_default().to_string(),
            contact: contact.unwrap_or_default().to_string(),
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit button would be enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.title.trim().is_empty()
    }

    /// Trim every field and check the length limits. Empty optional fields
    /// become `None`.
    pub fn validate(&self) -> Result<NewSuggestion, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        check_length("Title", title, MAX_TITLE_CHARS)?;

        let description = non_empty(&self.description);
        if let Some(d) = description {
            check_length("Description", d, MAX_DESCRIPTION_CHARS)?;
        }

        let contact = non_empty(&self.contact);
        if let Some(c) = contact {
            check_length("Contact", c, MAX_CONTACT_CHARS)?;
        }

        Ok(NewSuggestion {
            title: title.to_string(),
            description: description.map(str::to_string),
            contact: contact.map(str::to_string),
        })
    }

    /// Validate and close the gate. `Ok(None)` while a submission is already
    /// in flight.
    pub fn begin(&mut self) -> Result<Option<NewSuggestion>, ValidationError> {
        if self.submitting {
            return Ok(None);
        }
        let suggestion = self.validate()?;
        self.submitting = true;
        Ok(Some(suggestion))
    }

    /// Open the gate again. A successful insert clears the form; a failed one
    /// keeps it so the user can retry.
    pub fn finish(&mut self, result: &StoreResult<String>) {
        self.submitting = false;
        if result.is_ok() {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.contact.clear();
    }

    pub fn submit<R: Repository + ?Sized>(
        &mut self,
        repo: &R,
        project_slug: &str,
    ) -> Result<SubmitOutcome, SubmitError> {
        let Some(suggestion) = self.begin()? else {
            return Ok(SubmitOutcome::Busy);
        };

        let result = insert(repo, project_slug, &suggestion);
        self.finish(&result);

        match result {
            Ok(id) => {
                info!(id = %id, project = project_slug, "suggestion submitted");
                Ok(SubmitOutcome::Submitted(id))
            }
            Err(err) => {
                error!(project = project_slug, error = %err, "failed to submit suggestion");
                Err(err.into())
            }
        }
    }
}

fn insert<R: Repository + ?Sized>(repo: &R, project_slug: &str, suggestion: &NewSuggestion) -> StoreResult<String> {
    let project_id = repo.project_id(project_slug)?;
    repo.insert_suggestion(&project_id, suggestion)
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, len, max });
    }
    Ok(())
}
