//! The narrow interface between the client and the data store.
//!
//! Feeds, the vote engine and the submission form only ever talk to a
//! [`Repository`]. The shipped implementation is the SQLite [`Database`];
//! tests wrap it to inject failures.
//!
//! [`Database`]: crate::db::Database

use std::fmt;
use std::str::FromStr;

use crate::models::{Direction, NewSuggestion, RoadmapItem, Suggestion, Vote};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("project '{0}' not found")]
    ProjectNotFound(String),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => StoreError::Constraint(err.to_string()),
            Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Ordering of the suggestion feed. Both orders are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Votes,
    Recent,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Votes => "votes",
            SortOrder::Recent => "recent",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "votes" => Ok(SortOrder::Votes),
            "recent" => Ok(SortOrder::Recent),
            _ => Err(format!("Invalid sort '{}'. Must be one of: votes, recent", s)),
        }
    }
}

pub trait Repository {
    /// Resolve a project slug to its id.
    fn project_id(&self, slug: &str) -> StoreResult<String>;

    /// One page of a project's suggestions. Page `n` covers rows
    /// `n * page_size .. (n + 1) * page_size`.
    fn list_suggestions(
        &self,
        project_id: &str,
        sort: SortOrder,
        page: usize,
        page_size: usize,
    ) -> StoreResult<Vec<Suggestion>>;

    fn get_suggestion(&self, id: &str) -> StoreResult<Option<Suggestion>>;

    /// The voter's rows restricted to the given suggestions.
    fn list_votes_for(&self, voter: &str, suggestion_ids: &[String]) -> StoreResult<Vec<Vote>>;

    fn delete_vote(&self, suggestion_id: &str, voter: &str) -> StoreResult<()>;

    fn insert_vote(&self, suggestion_id: &str, voter: &str, direction: Direction) -> StoreResult<()>;

    /// Swap the voter's row for one in `direction`. Stores that can should
    /// apply both halves or neither.
    fn replace_vote(&self, suggestion_id: &str, voter: &str, direction: Direction) -> StoreResult<()> {
        self.delete_vote(suggestion_id, voter)?;
        self.insert_vote(suggestion_id, voter, direction)
    }

    fn insert_suggestion(&self, project_id: &str, suggestion: &NewSuggestion) -> StoreResult<String>;

    /// All roadmap items of a project, `display_order` ascending.
    fn list_roadmap_items(&self, project_id: &str) -> StoreResult<Vec<RoadmapItem>>;
}
