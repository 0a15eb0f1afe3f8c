use anyhow::{bail, Result};

use crate::db::Database;
use crate::settings::Settings;
use crate::store::StoreError;
use crate::submit::{SubmissionForm, SubmitError, SubmitOutcome};

/// Submit a suggestion to the project. Returns the new id.
pub fn run(
    db: &Database,
    settings: &Settings,
    project: &str,
    title: &str,
    description: Option<&str>,
    contact: Option<&str>,
) -> Result<Option<String>> {
    let messages = settings.messages();
    let mut form = SubmissionForm::new(title, description, contact);

    match form.submit(db, project) {
        Ok(SubmitOutcome::Submitted(id)) => {
            println!("{}", messages.toast_suggestion_success);
            println!("Id: {}", id);
            Ok(Some(id))
        }
        Ok(SubmitOutcome::Busy) => Ok(None),
        Err(SubmitError::Invalid(e)) => bail!("{}", e),
        Err(SubmitError::Store(StoreError::ProjectNotFound(_))) => {
            bail!("{}", messages.no_project_selected)
        }
        Err(SubmitError::Store(e)) => {
            Err(anyhow::Error::new(e).context(messages.toast_suggestion_error))
        }
    }
}
