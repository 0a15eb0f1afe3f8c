//! Vote reconciliation.
//!
//! A vote is applied to the local copy first and then pushed to the store.
//! If the store rejects it the local change is inverted, so the caller never
//! keeps a count the store does not agree with.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::models::Direction;
use crate::store::{Repository, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoteState {
    #[default]
    None,
    Up,
    Down,
}

impl VoteState {
    pub fn direction(self) -> Option<Direction> {
        match self {
            VoteState::None => None,
            VoteState::Up => Some(Direction::Up),
            VoteState::Down => Some(Direction::Down),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteState::None => "none",
            VoteState::Up => "up",
            VoteState::Down => "down",
        }
    }
}

impl From<Direction> for VoteState {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => VoteState::Up,
            Direction::Down => VoteState::Down,
        }
    }
}

impl From<Option<Direction>> for VoteState {
    fn from(direction: Option<Direction>) -> Self {
        direction.map(VoteState::from).unwrap_or(VoteState::None)
    }
}

/// The client's provisional view of one suggestion's votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVote {
    pub count: i64,
    pub state: VoteState,
}

impl LocalVote {
    pub fn new(count: i64, state: VoteState) -> Self {
        LocalVote { count, state }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: VoteState,
    pub next: VoteState,
    pub delta: i64,
}

impl Transition {
    pub fn apply(&self, local: &mut LocalVote) {
        local.count += self.delta;
        local.state = self.next;
    }

    pub fn invert(&self, local: &mut LocalVote) {
        local.count -= self.delta;
        local.state = self.previous;
    }
}

/// Next state and count delta for a click on `requested`.
///
/// Clicking the active direction clears the vote, clicking the other one
/// flips it (a swing of two), clicking from no vote casts one.
pub fn transition(current: VoteState, requested: Direction) -> Transition {
    let weight = requested.value();
    let (next, delta) = match (current, requested) {
        (VoteState::None, _) => (VoteState::from(requested), weight),
        (VoteState::Up, Direction::Up) | (VoteState::Down, Direction::Down) => (VoteState::None, -weight),
        (VoteState::Up, Direction::Down) | (VoteState::Down, Direction::Up) => {
            (VoteState::from(requested), 2 * weight)
        }
    };

    Transition {
        previous: current,
        next,
        delta,
    }
}

/// A vote that has been applied locally and is waiting on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVote {
    suggestion_id: String,
    requested: Direction,
    transition: Transition,
}

impl PendingVote {
    pub fn suggestion_id(&self) -> &str {
        &self.suggestion_id
    }

    pub fn requested(&self) -> Direction {
        self.requested
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded(Direction),
    Removed,
}

/// Tracks which suggestions have a vote in flight.
///
/// While a suggestion is pending every further click on it is dropped, not
/// queued.
#[derive(Debug, Default)]
pub struct VoteEngine {
    in_flight: HashSet<String>,
}

impl VoteEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, suggestion_id: &str) -> bool {
        self.in_flight.contains(suggestion_id)
    }

    /// Apply a click optimistically. Returns `None` when a vote on the same
    /// suggestion has not resolved yet; `local` is left untouched then.
    pub fn begin(
        &mut self,
        suggestion_id: &str,
        local: &mut LocalVote,
        requested: Direction,
    ) -> Option<PendingVote> {
        if !self.in_flight.insert(suggestion_id.to_string()) {
            debug!(suggestion_id, "vote already in flight, ignoring click");
            return None;
        }

        let transition = transition(local.state, requested);
        transition.apply(local);
        debug!(
            suggestion_id,
            from = transition.previous.as_str(),
            to = transition.next.as_str(),
            delta = transition.delta,
            "applied optimistic vote"
        );

        Some(PendingVote {
            suggestion_id: suggestion_id.to_string(),
            requested,
            transition,
        })
    }

    /// Push a pending vote to the store. On failure `local` is rolled back to
    /// its pre-click values and the error is returned. The gate is released
    /// either way.
    pub fn reconcile<R: Repository + ?Sized>(
        &mut self,
        repo: &R,
        voter: &str,
        pending: &PendingVote,
        local: &mut LocalVote,
    ) -> StoreResult<VoteOutcome> {
        let result = push_vote(repo, voter, pending);
        self.in_flight.remove(&pending.suggestion_id);

        if let Err(err) = &result {
            warn!(suggestion_id = %pending.suggestion_id, error = %err, "vote failed, rolling back");
            pending.transition.invert(local);
        }
        result
    }
}

// Delete before insert keeps at most one row per (suggestion, voter).
fn push_vote<R: Repository + ?Sized>(repo: &R, voter: &str, pending: &PendingVote) -> StoreResult<VoteOutcome> {
    let suggestion_id = pending.suggestion_id.as_str();
    match pending.transition.next.direction() {
        None => {
            repo.delete_vote(suggestion_id, voter)?;
            Ok(VoteOutcome::Removed)
        }
        Some(direction) => {
            repo.replace_vote(suggestion_id, voter, direction)?;
            Ok(VoteOutcome::Recorded(direction))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::NewSuggestion;
    use crate::store::testing::FlakyStore;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn setup_test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(&db_path).unwrap();
        (db, dir)
    }

    fn seed_suggestion(db: &Database) -> String {
        let project = db.create_project("demo").unwrap();
        db.insert_suggestion(
            &project,
            &NewSuggestion {
                title: "Offline mode".to_string(),
                description: None,
                contact: None,
            },
        )
        .unwrap()
    }

    fn cast(
        engine: &mut VoteEngine,
        repo: &impl Repository,
        id: &str,
        local: &mut LocalVote,
        direction: Direction,
    ) -> StoreResult<VoteOutcome> {
        let pending = engine.begin(id, local, direction).unwrap();
        engine.reconcile(repo, "voter_test", &pending, local)
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Up), Just(Direction::Down)]
    }

    fn state_strategy() -> impl Strategy<Value = VoteState> {
        prop_oneof![Just(VoteState::None), Just(VoteState::Up), Just(VoteState::Down)]
    }

    // ==================== Unit Tests ====================

    #[test]
    fn test_transition_table() {
        let cases = [
            (VoteState::None, Direction::Up, VoteState::Up, 1),
            (VoteState::None, Direction::Down, VoteState::Down, -1),
            (VoteState::Up, Direction::Up, VoteState::None, -1),
            (VoteState::Down, Direction::Down, VoteState::None, 1),
            (VoteState::Up, Direction::Down, VoteState::Down, -2),
            (VoteState::Down, Direction::Up, VoteState::Up, 2),
        ];

        for (current, requested, next, delta) in cases {
            let t = transition(current, requested);
            assert_eq!(t.previous, current);
            assert_eq!(t.next, next, "{:?} + {:?}", current, requested);
            assert_eq!(t.delta, delta, "{:?} + {:?}", current, requested);
        }
    }

    #[test]
    fn test_apply_then_invert_restores() {
        let mut local = LocalVote::new(7, VoteState::Down);
        let t = transition(local.state, Direction::Up);
        t.apply(&mut local);
        assert_eq!(local, LocalVote::new(9, VoteState::Up));
        t.invert(&mut local);
        assert_eq!(local, LocalVote::new(7, VoteState::Down));
    }

    #[test]
    fn test_voting_scenario() {
        let (db, _dir) = setup_test_db();
        let id = seed_suggestion(&db);
        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(5, VoteState::None);

        assert_eq!(
            cast(&mut engine, &db, &id, &mut local, Direction::Up).unwrap(),
            VoteOutcome::Recorded(Direction::Up)
        );
        assert_eq!(local, LocalVote::new(6, VoteState::Up));

        assert_eq!(
            cast(&mut engine, &db, &id, &mut local, Direction::Up).unwrap(),
            VoteOutcome::Removed
        );
        assert_eq!(local, LocalVote::new(5, VoteState::None));

        cast(&mut engine, &db, &id, &mut local, Direction::Down).unwrap();
        assert_eq!(local, LocalVote::new(4, VoteState::Down));
    }

    #[test]
    fn test_store_mirrors_local_delta() {
        let (db, _dir) = setup_test_db();
        let id = seed_suggestion(&db);
        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(0, VoteState::None);

        cast(&mut engine, &db, &id, &mut local, Direction::Up).unwrap();
        cast(&mut engine, &db, &id, &mut local, Direction::Down).unwrap();

        let stored = db.get_suggestion(&id).unwrap().unwrap();
        assert_eq!(stored.vote_count, local.count);
        assert_eq!(stored.vote_count, -1);
        let votes = db.list_votes_for("voter_test", &[id.clone()]).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].direction, Direction::Down);
    }

    #[test]
    fn test_second_click_while_pending_is_ignored() {
        let (db, _dir) = setup_test_db();
        let id = seed_suggestion(&db);
        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(3, VoteState::None);

        let pending = engine.begin(&id, &mut local, Direction::Up).unwrap();
        assert!(engine.is_pending(&id));
        assert!(engine.begin(&id, &mut local, Direction::Down).is_none());
        assert_eq!(local, LocalVote::new(4, VoteState::Up));

        engine.reconcile(&db, "voter_test", &pending, &mut local).unwrap();
        assert!(!engine.is_pending(&id));
        assert!(engine.begin(&id, &mut local, Direction::Down).is_some());
    }

    #[test]
    fn test_different_suggestions_are_independent() {
        let mut engine = VoteEngine::new();
        let mut a = LocalVote::new(0, VoteState::None);
        let mut b = LocalVote::new(0, VoteState::None);

        assert!(engine.begin("a", &mut a, Direction::Up).is_some());
        assert!(engine.begin("b", &mut b, Direction::Down).is_some());
        assert!(engine.is_pending("a") && engine.is_pending("b"));
    }

    #[test]
    fn test_insert_failure_rolls_back() {
        let (db, _dir) = setup_test_db();
        let id = seed_suggestion(&db);
        let store = FlakyStore::new(&db);
        store.fail_inserts.set(true);
        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(5, VoteState::None);

        let result = cast(&mut engine, &store, &id, &mut local, Direction::Up);
        assert!(result.is_err());
        assert_eq!(local, LocalVote::new(5, VoteState::None));
        assert!(!engine.is_pending(&id));
    }

    #[test]
    fn test_delete_failure_rolls_back_flip() {
        let (db, _dir) = setup_test_db();
        let id = seed_suggestion(&db);
        db.insert_vote(&id, "voter_test", Direction::Up).unwrap();
        let store = FlakyStore::new(&db);
        store.fail_deletes.set(true);
        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(1, VoteState::Up);

        assert!(cast(&mut engine, &store, &id, &mut local, Direction::Down).is_err());
        assert_eq!(local, LocalVote::new(1, VoteState::Up));
        // Nothing reached the store either
        assert_eq!(db.get_suggestion(&id).unwrap().unwrap().vote_count, 1);
    }

    #[test]
    fn test_clear_vote_only_deletes() {
        let (db, _dir) = setup_test_db();
        let id = seed_suggestion(&db);
        db.insert_vote(&id, "voter_test", Direction::Down).unwrap();
        let store = FlakyStore::new(&db);
        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(-1, VoteState::Down);

        cast(&mut engine, &store, &id, &mut local, Direction::Down).unwrap();
        assert_eq!(*store.calls.borrow(), vec!["delete_vote"]);
        assert_eq!(local, LocalVote::new(0, VoteState::None));
    }

    #[test]
    fn test_new_vote_deletes_then_inserts() {
        let (db, _dir) = setup_test_db();
        let id = seed_suggestion(&db);
        let store = FlakyStore::new(&db);
        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(0, VoteState::None);

        cast(&mut engine, &store, &id, &mut local, Direction::Up).unwrap();
        assert_eq!(*store.calls.borrow(), vec!["delete_vote", "insert_vote"]);
    }

    #[test]
    fn test_stale_local_state_does_not_duplicate_rows() {
        let (db, _dir) = setup_test_db();
        let id = seed_suggestion(&db);
        // The store already holds an up vote the client does not know about
        db.insert_vote(&id, "voter_test", Direction::Up).unwrap();
        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(0, VoteState::None);

        cast(&mut engine, &db, &id, &mut local, Direction::Down).unwrap();
        assert_eq!(db.list_votes_for("voter_test", &[id.clone()]).unwrap().len(), 1);
        assert_eq!(db.get_suggestion(&id).unwrap().unwrap().vote_count, -1);
    }

    // ==================== Property-Based Tests ====================

    proptest! {
        #[test]
        fn prop_same_direction_twice_is_identity(state in state_strategy(), count in -1000i64..1000, dir in direction_strategy()) {
            let mut local = LocalVote::new(count, state);
            let first = transition(local.state, dir);
            first.apply(&mut local);
            let second = transition(local.state, dir);
            second.apply(&mut local);

            if state == VoteState::None || state == VoteState::from(dir) {
                prop_assert_eq!(local, LocalVote::new(count, state));
            }
            prop_assert_eq!(first.delta + second.delta == 0, local.count == count);
        }

        #[test]
        fn prop_toggle_pairs_from_none_net_zero(count in -1000i64..1000, dir in direction_strategy(), pairs in 1usize..10) {
            let mut local = LocalVote::new(count, VoteState::None);
            for _ in 0..pairs * 2 {
                transition(local.state, dir).apply(&mut local);
            }
            prop_assert_eq!(local, LocalVote::new(count, VoteState::None));
        }

        #[test]
        fn prop_symmetric_under_exchange(state in state_strategy(), dir in direction_strategy()) {
            let mirror_state = match state {
                VoteState::None => VoteState::None,
                VoteState::Up => VoteState::Down,
                VoteState::Down => VoteState::Up,
            };
            let mirror_dir = match dir {
                Direction::Up => Direction::Down,
                Direction::Down => Direction::Up,
            };
            let t = transition(state, dir);
            let m = transition(mirror_state, mirror_dir);
            prop_assert_eq!(t.delta, -m.delta);
        }

        #[test]
        fn prop_delta_matches_state_weights(state in state_strategy(), dir in direction_strategy()) {
            fn weight(s: VoteState) -> i64 {
                s.direction().map(Direction::value).unwrap_or(0)
            }
            let t = transition(state, dir);
            prop_assert_eq!(t.delta, weight(t.next) - weight(t.previous));
        }

        #[test]
        fn prop_failure_always_restores(state in state_strategy(), count in -50i64..50, dir in direction_strategy()) {
            let (db, _dir) = setup_test_db();
            let id = seed_suggestion(&db);
            let store = FlakyStore::new(&db);
            store.fail_deletes.set(true);
            let mut engine = VoteEngine::new();
            let mut local = LocalVote::new(count, state);

            let pending = engine.begin(&id, &mut local, dir).unwrap();
            prop_assert!(engine.reconcile(&store, "voter_test", &pending, &mut local).is_err());
            prop_assert_eq!(local, LocalVote::new(count, state));
        }
    }
}
