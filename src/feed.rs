//! The paginated suggestion list.
//!
//! Pages are requested and accepted in two steps so a slow response can be
//! recognised as stale: every reset bumps the feed's generation, and a page
//! that comes back under an older generation is dropped.

use std::collections::{HashMap, HashSet};
use tracing::{debug, error, warn};

use crate::models::{Direction, Suggestion, Vote};
use crate::store::{Repository, SortOrder, StoreError, StoreResult};
use crate::vote::{LocalVote, VoteEngine, VoteOutcome, VoteState};

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    generation: u64,
    page: usize,
}

impl PageRequest {
    pub fn page(&self) -> usize {
        self.page
    }
}

/// One page of suggestions plus the current voter's rows for them.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub suggestions: Vec<Suggestion>,
    pub votes: Vec<Vote>,
}

#[derive(Debug)]
pub struct SuggestionFeed {
    project_slug: String,
    sort: SortOrder,
    suggestions: Vec<Suggestion>,
    votes: HashMap<String, Direction>,
    // Last accepted page since the reset; `None` until one arrives
    page: Option<usize>,
    has_more: bool,
    loading: bool,
    generation: u64,
}

impl SuggestionFeed {
    pub fn new(project_slug: &str, sort: SortOrder) -> Self {
        SuggestionFeed {
            project_slug: project_slug.to_string(),
            sort,
            suggestions: Vec::new(),
            votes: HashMap::new(),
            page: None,
            has_more: true,
            loading: false,
            generation: 0,
        }
    }

    pub fn project_slug(&self) -> &str {
        &self.project_slug
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn vote_state(&self, suggestion_id: &str) -> VoteState {
        self.votes.get(suggestion_id).copied().into()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Index of the last accepted page, 0 before any page arrived.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(0)
    }

    /// Start over for a (possibly new) project and sort order. Any page still
    /// in flight is superseded.
    pub fn reset(&mut self, project_slug: &str, sort: SortOrder) -> PageRequest {
        self.project_slug = project_slug.to_string();
        self.sort = sort;
        self.suggestions.clear();
        self.votes.clear();
        self.page = None;
        self.has_more = true;
        self.generation += 1;
        self.loading = true;
        debug!(project = %self.project_slug, sort = %self.sort, generation = self.generation, "feed reset");

        PageRequest {
            generation: self.generation,
            page: 0,
        }
    }

    /// Reload from page 0 with the current project and sort order.
    pub fn reload(&mut self) -> PageRequest {
        let slug = std::mem::take(&mut self.project_slug);
        self.reset(&slug, self.sort)
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> Option<PageRequest> {
        if sort == self.sort {
            return None;
        }
        let slug = std::mem::take(&mut self.project_slug);
        Some(self.reset(&slug, sort))
    }

    pub fn set_project(&mut self, project_slug: &str) -> Option<PageRequest> {
        if project_slug == self.project_slug {
            return None;
        }
        Some(self.reset(project_slug, self.sort))
    }

    /// The end of the list scrolled into view. Only asks for another page when
    /// nothing is loading and the last page was full. If the first page never
    /// arrived, asks for page 0 again.
    pub fn on_sentinel_visible(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            generation: self.generation,
            page: self.page.map_or(0, |page| page + 1),
        })
    }

    /// Merge a loaded page. Returns `false` if the request was superseded and
    /// the page was dropped.
    pub fn accept_page(&mut self, request: PageRequest, page: Page) -> bool {
        if request.generation != self.generation {
            debug!(
                stale = request.generation,
                current = self.generation,
                "dropping stale page"
            );
            return false;
        }
        self.loading = false;

        let received = page.suggestions.len();
        self.has_more = received == PAGE_SIZE;
        self.page = Some(request.page);

        if request.page == 0 {
            self.suggestions.clear();
        }

        let page_ids: HashSet<String> = page.suggestions.iter().map(|s| s.id.clone()).collect();
        for id in &page_ids {
            self.votes.remove(id);
        }
        for vote in page.votes {
            if page_ids.contains(&vote.suggestion_id) {
                self.votes.insert(vote.suggestion_id, vote.direction);
            }
        }

        let known: HashSet<String> = self.suggestions.iter().map(|s| s.id.clone()).collect();
        for suggestion in page.suggestions {
            if known.contains(&suggestion.id) {
                // Counts shifted between page loads; keep the first copy
                debug!(id = %suggestion.id, "skipping suggestion already in feed");
                continue;
            }
            self.suggestions.push(suggestion);
        }

        debug!(page = request.page, received, has_more = self.has_more, "page accepted");
        true
    }

    /// A page load failed. The feed keeps what it has; scrolling again retries.
    pub fn reject_page(&mut self, request: PageRequest, err: &StoreError) {
        if request.generation != self.generation {
            return;
        }
        self.loading = false;
        error!(page = request.page, error = %err, "failed to load suggestions");
    }

    /// Fetch and merge the requested page.
    pub fn load<R: Repository + ?Sized>(
        &mut self,
        repo: &R,
        voter: Option<&str>,
        request: PageRequest,
    ) -> StoreResult<usize> {
        match fetch_page(repo, &self.project_slug, self.sort, request.page, voter) {
            Ok(page) => {
                let received = page.suggestions.len();
                self.accept_page(request, page);
                Ok(received)
            }
            Err(err) => {
                self.reject_page(request, &err);
                Err(err)
            }
        }
    }

    pub fn local_vote(&self, suggestion_id: &str) -> Option<LocalVote> {
        self.suggestions
            .iter()
            .find(|s| s.id == suggestion_id)
            .map(|s| LocalVote::new(s.vote_count, self.vote_state(suggestion_id)))
    }

    /// Apply a vote delta in place. The list is not re-sorted.
    pub fn apply_vote(&mut self, suggestion_id: &str, state: VoteState, delta: i64) -> bool {
        let Some(suggestion) = self.suggestions.iter_mut().find(|s| s.id == suggestion_id) else {
            return false;
        };
        suggestion.vote_count += delta;

        match state.direction() {
            Some(direction) => {
                self.votes.insert(suggestion_id.to_string(), direction);
            }
            None => {
                self.votes.remove(suggestion_id);
            }
        }
        true
    }

    /// Run a click through the vote engine, keeping the feed in step with the
    /// optimistic update and its rollback. `None` if the suggestion is not in
    /// the feed or a vote on it is still pending.
    pub fn cast_vote<R: Repository + ?Sized>(
        &mut self,
        engine: &mut VoteEngine,
        repo: &R,
        voter: &str,
        suggestion_id: &str,
        direction: Direction,
    ) -> Option<StoreResult<VoteOutcome>> {
        let mut local = self.local_vote(suggestion_id)?;
        let pending = engine.begin(suggestion_id, &mut local, direction)?;
        let transition = pending.transition();
        self.apply_vote(suggestion_id, transition.next, transition.delta);

        let result = engine.reconcile(repo, voter, &pending, &mut local);
        if result.is_err() {
            self.apply_vote(suggestion_id, transition.previous, -transition.delta);
        }
        Some(result)
    }
}

/// Resolve the project and read one page plus the voter's prior votes on it.
pub fn fetch_page<R: Repository + ?Sized>(
    repo: &R,
    project_slug: &str,
    sort: SortOrder,
    page: usize,
    voter: Option<&str>,
) -> StoreResult<Page> {
    let project_id = repo.project_id(project_slug)?;
    let suggestions = repo.list_suggestions(&project_id, sort, page, PAGE_SIZE)?;

    let votes = match voter {
        Some(voter) if !suggestions.is_empty() => {
            let ids: Vec<String> = suggestions.iter().map(|s| s.id.clone()).collect();
            repo.list_votes_for(voter, &ids).unwrap_or_else(|err| {
                warn!(error = %err, "could not load prior votes");
                Vec::new()
            })
        }
        _ => Vec::new(),
    };

    Ok(Page { suggestions, votes })
}
