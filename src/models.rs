use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub vote_count: i64,
    pub created_at: DateTime<Utc>,
    pub project_id: Option<String>,
    /// Private contact left by the submitter. Never rendered.
    #[serde(skip_serializing)]
    pub contact: Option<String>,
}

/// A suggestion as it leaves the submission form, before the store assigns
/// an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub title: String,
    pub description: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Signed weight stored in the `vote_type` column.
    pub fn value(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Direction::Up),
            -1 => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(format!("Invalid vote direction '{}'. Must be one of: up, down", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: String,
    pub suggestion_id: String,
    pub voter_identifier: String,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadmapStatus {
    Planned,
    Todo,
    Doing,
    Done,
}

impl RoadmapStatus {
    pub const ALL: [RoadmapStatus; 4] = [
        RoadmapStatus::Planned,
        RoadmapStatus::Todo,
        RoadmapStatus::Doing,
        RoadmapStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoadmapStatus::Planned => "planned",
            RoadmapStatus::Todo => "todo",
            RoadmapStatus::Doing => "doing",
            RoadmapStatus::Done => "done",
        }
    }
}

impl fmt::Display for RoadmapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoadmapStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(RoadmapStatus::Planned),
            "todo" => Ok(RoadmapStatus::Todo),
            "doing" => Ok(RoadmapStatus::Doing),
            "done" => Ok(RoadmapStatus::Done),
            _ => Err(format!(
                "Invalid status '{}'. Must be one of: planned, todo, doing, done",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: RoadmapStatus,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
