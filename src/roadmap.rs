use std::fmt;
use std::str::FromStr;
use tracing::error;

use crate::models::{RoadmapItem, RoadmapStatus};
use crate::store::{Repository, StoreResult};

/// Roadmap tab selection: everything, or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RoadmapStatus),
}

impl StatusFilter {
    pub fn matches(self, item: &RoadmapItem) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => item.status == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse::<RoadmapStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| {
                format!(
                    "Invalid status '{}'. Must be one of: all, planned, todo, doing, done",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub planned: usize,
    pub todo: usize,
    pub doing: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.total(),
            StatusFilter::Only(RoadmapStatus::Planned) => self.planned,
            StatusFilter::Only(RoadmapStatus::Todo) => self.todo,
            StatusFilter::Only(RoadmapStatus::Doing) => self.doing,
            StatusFilter::Only(RoadmapStatus::Done) => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.planned + self.todo + self.doing + self.done
    }
}

/// Read-only roadmap of one project, in display order.
#[derive(Debug, Clone, Default)]
pub struct RoadmapFeed {
    items: Vec<RoadmapItem>,
}

impl RoadmapFeed {
    pub fn from_items(items: Vec<RoadmapItem>) -> Self {
        RoadmapFeed { items }
    }

    /// Load every item of the project. A missing project or a failing store is
    /// logged and yields an empty roadmap.
    pub fn load<R: Repository + ?Sized>(repo: &R, project_slug: &str) -> Self {
        match fetch_items(repo, project_slug) {
            Ok(items) => RoadmapFeed { items },
            Err(err) => {
                error!(project = project_slug, error = %err, "failed to load roadmap");
                RoadmapFeed::default()
            }
        }
    }

    pub fn items(&self) -> &[RoadmapItem] {
        &self.items
    }

    pub fn filter(&self, filter: StatusFilter) -> Vec<&RoadmapItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for item in &self.items {
            match item.status {
                RoadmapStatus::Planned => counts.planned += 1,
                RoadmapStatus::Todo => counts.todo += 1,
                RoadmapStatus::Doing => counts.doing += 1,
                RoadmapStatus::Done => counts.done += 1,
            }
        }
        counts
    }
}

fn fetch_items<R: Repository + ?Sized>(repo: &R, project_slug: &str) -> StoreResult<Vec<RoadmapItem>> {
    let project_id = repo.project_id(project_slug)?;
    repo.list_roadmap_items(&project_id)
}
