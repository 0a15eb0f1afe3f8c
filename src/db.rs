use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Direction, NewSuggestion, Project, RoadmapItem, RoadmapStatus, Suggestion, Vote};
use crate::store::{Repository, SortOrder, StoreError, StoreResult};

const SCHEMA_VERSION: i32 = 1;

const SUGGESTION_COLUMNS: &str =
    "id, title, description, vote_count, created_at, project_id, contact";

const ROADMAP_COLUMNS: &str =
    "id, project_id, title, description, status, display_order, created_at, updated_at";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open database")?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap_or(0);

        if version < SCHEMA_VERSION {
            self.conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS projects (
                    id TEXT PRIMARY KEY,
                    slug TEXT NOT NULL UNIQUE,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS suggestions (
                    id TEXT PRIMARY KEY,
                    project_id TEXT,
                    title TEXT NOT NULL,
                    description TEXT,
                    contact TEXT,
                    vote_count INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
                );

                -- One row per (suggestion, voter); vote_type is +1 or -1
                CREATE TABLE IF NOT EXISTS votes (
                    id TEXT PRIMARY KEY,
                    suggestion_id TEXT NOT NULL,
                    voter_identifier TEXT NOT NULL,
                    vote_type INTEGER NOT NULL CHECK (vote_type IN (1, -1)),
                    created_at TEXT NOT NULL,
                    FOREIGN KEY (suggestion_id) REFERENCES suggestions(id) ON DELETE CASCADE
                );

                CREATE TABLE IF NOT EXISTS roadmap_items (
                    id TEXT PRIMARY KEY,
                    project_id TEXT NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT,
                    status TEXT NOT NULL CHECK (status IN ('planned', 'todo', 'doing', 'done')),
                    display_order INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
                );

                -- vote_count is the signed sum of the suggestion's votes
                CREATE TRIGGER IF NOT EXISTS trg_votes_insert AFTER INSERT ON votes
                BEGIN
                    UPDATE suggestions SET vote_count = vote_count + NEW.vote_type
                    WHERE id = NEW.suggestion_id;
                END;

                CREATE TRIGGER IF NOT EXISTS trg_votes_delete AFTER DELETE ON votes
                BEGIN
                    UPDATE suggestions SET vote_count = vote_count - OLD.vote_type
                    WHERE id = OLD.suggestion_id;
                END;

                CREATE UNIQUE INDEX IF NOT EXISTS idx_votes_suggestion_voter
                    ON votes(suggestion_id, voter_identifier);
                CREATE INDEX IF NOT EXISTS idx_votes_voter ON votes(voter_identifier);
                CREATE INDEX IF NOT EXISTS idx_suggestions_project ON suggestions(project_id);
                CREATE INDEX IF NOT EXISTS idx_roadmap_project ON roadmap_items(project_id);
                "#,
            )?;

            self.conn
                .execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;
        }

        self.conn.execute("PRAGMA foreign_keys = ON", [])?;

        Ok(())
    }

    // Projects
    pub fn create_project(&self, slug: &str) -> Result<String> {
        let id = new_id();
        self.conn.execute(
            "INSERT INTO projects (id, slug, created_at) VALUES (?1, ?2, ?3)",
            params![id, slug, now()],
        )?;
        Ok(id)
    }

    /// Returns the id of the project with this slug, creating it if needed.
    pub fn ensure_project(&self, slug: &str) -> Result<String> {
        match self.get_project(slug)? {
            Some(project) => Ok(project.id),
            None => self.create_project(slug),
        }
    }

    pub fn get_project(&self, slug: &str) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row(
                "SELECT id, slug FROM projects WHERE slug = ?1",
                [slug],
                |row| {
                    Ok(Project {
                        id: row.get(0)?,
                        slug: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(project)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare("SELECT id, slug FROM projects ORDER BY slug")?;
        let projects = stmt
            .query_map([], |row| {
                Ok(Project {
                    id: row.get(0)?,
                    slug: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    // Roadmap administration
    pub fn add_roadmap_item(
        &self,
        project_id: &str,
        title: &str,
        description: Option<&str>,
        status: RoadmapStatus,
        display_order: i64,
    ) -> Result<String> {
        let id = new_id();
        let now = now();
        self.conn.execute(
            "INSERT INTO roadmap_items (id, project_id, title, description, status, display_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![id, project_id, title, description, status.as_str(), display_order, now],
        )?;
        Ok(id)
    }

    pub fn set_roadmap_status(&self, id: &str, status: RoadmapStatus) -> Result<bool> {
        let rows = self.conn.execute(
            "UPDATE roadmap_items SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), now(), id],
        )?;
        Ok(rows > 0)
    }

    /// Sum of the vote rows of a suggestion, as the triggers should mirror it.
    pub fn vote_sum(&self, suggestion_id: &str) -> Result<i64> {
        let sum: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(vote_type), 0) FROM votes WHERE suggestion_id = ?1",
            [suggestion_id],
            |row| row.get(0),
        )?;
        Ok(sum)
    }
}

impl Repository for Database {
    fn project_id(&self, slug: &str) -> StoreResult<String> {
        self.conn
            .query_row("SELECT id FROM projects WHERE slug = ?1", [slug], |row| row.get(0))
            .optional()?
            .ok_or_else(|| StoreError::ProjectNotFound(slug.to_string()))
    }

    fn list_suggestions(
        &self,
        project_id: &str,
        sort: SortOrder,
        page: usize,
        page_size: usize,
    ) -> StoreResult<Vec<Suggestion>> {
        let order = match sort {
            SortOrder::Votes => "vote_count DESC, created_at DESC, id ASC",
            SortOrder::Recent => "created_at DESC, id ASC",
        };
        let sql = format!(
            "SELECT {} FROM suggestions WHERE project_id = ?1 ORDER BY {} LIMIT ?2 OFFSET ?3",
            SUGGESTION_COLUMNS, order
        );
        let offset = (page * page_size) as i64;

        let mut stmt = self.conn.prepare(&sql)?;
        let suggestions = stmt
            .query_map(params![project_id, page_size as i64, offset], suggestion_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(project_id, %sort, page, count = suggestions.len(), "listed suggestions");
        Ok(suggestions)
    }

    fn get_suggestion(&self, id: &str) -> StoreResult<Option<Suggestion>> {
        let sql = format!("SELECT {} FROM suggestions WHERE id = ?1", SUGGESTION_COLUMNS);
        let suggestion = self
            .conn
            .query_row(&sql, [id], suggestion_from_row)
            .optional()?;
        Ok(suggestion)
    }

    fn list_votes_for(&self, voter: &str, suggestion_ids: &[String]) -> StoreResult<Vec<Vote>> {
        if suggestion_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> = (0..suggestion_ids.len())
            .map(|i| format!("?{}", i + 2))
            .collect();
        let sql = format!(
            "SELECT id, suggestion_id, voter_identifier, vote_type, created_at FROM votes WHERE voter_identifier = ?1 AND suggestion_id IN ({})",
            placeholders.join(", ")
        );

        let mut params_vec: Vec<&dyn rusqlite::ToSql> = vec![&voter];
        for id in suggestion_ids {
            params_vec.push(id);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_vec.as_slice(), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let votes = rows
            .into_iter()
            .filter_map(|(id, suggestion_id, voter_identifier, vote_type, created_at)| {
                let direction = Direction::from_value(vote_type)?;
                Some(Vote {
                    id,
                    suggestion_id,
                    voter_identifier,
                    direction,
                    created_at: parse_datetime(created_at),
                })
            })
            .collect();
        Ok(votes)
    }

    fn delete_vote(&self, suggestion_id: &str, voter: &str) -> StoreResult<()> {
        let rows = self.conn.execute(
            "DELETE FROM votes WHERE suggestion_id = ?1 AND voter_identifier = ?2",
            params![suggestion_id, voter],
        )?;
        debug!(suggestion_id, rows, "deleted vote");
        Ok(())
    }

    fn insert_vote(&self, suggestion_id: &str, voter: &str, direction: Direction) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO votes (id, suggestion_id, voter_identifier, vote_type, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new_id(), suggestion_id, voter, direction.value(), now()],
        )?;
        debug!(suggestion_id, %direction, "inserted vote");
        Ok(())
    }

    fn replace_vote(&self, suggestion_id: &str, voter: &str, direction: Direction) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM votes WHERE suggestion_id = ?1 AND voter_identifier = ?2",
            params![suggestion_id, voter],
        )?;
        tx.execute(
            "INSERT INTO votes (id, suggestion_id, voter_identifier, vote_type, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new_id(), suggestion_id, voter, direction.value(), now()],
        )?;
        tx.commit()?;
        debug!(suggestion_id, %direction, "replaced vote");
        Ok(())
    }

    fn insert_suggestion(&self, project_id: &str, suggestion: &NewSuggestion) -> StoreResult<String> {
        let id = new_id();
        self.conn.execute(
            "INSERT INTO suggestions (id, project_id, title, description, contact, vote_count, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                id,
                project_id,
                suggestion.title,
                suggestion.description,
                suggestion.contact,
                now()
            ],
        )?;
        Ok(id)
    }

    fn list_roadmap_items(&self, project_id: &str) -> StoreResult<Vec<RoadmapItem>> {
        let sql = format!(
            "SELECT {} FROM roadmap_items WHERE project_id = ?1 ORDER BY display_order ASC, created_at ASC",
            ROADMAP_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map([project_id], |row| {
                let status: String = row.get(4)?;
                Ok(RoadmapItem {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    // The CHECK constraint keeps unknown statuses out of the table
                    status: status.parse().unwrap_or(RoadmapStatus::Planned),
                    display_order: row.get(5)?,
                    created_at: parse_datetime(row.get::<_, String>(6)?),
                    updated_at: parse_datetime(row.get::<_, String>(7)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

fn suggestion_from_row(row: &Row<'_>) -> rusqlite::Result<Suggestion> {
    Ok(Suggestion {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        vote_count: row.get(3)?,
        created_at: parse_datetime(row.get::<_, String>(4)?),
        project_id: row.get(5)?,
        contact: row.get(6)?,
    })
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// Fixed-width timestamps so text ordering matches time ordering.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn setup_test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(&db_path).unwrap();
        (db, dir)
    }

    fn new_suggestion(title: &str) -> NewSuggestion {
        NewSuggestion {
            title: title.to_string(),
            description: None,
            contact: None,
        }
    }

    // ==================== Unit Tests ====================

    #[test]
    fn test_project_lookup() {
        let (db, _dir) = setup_test_db();
        let id = db.create_project("demo").unwrap();

        assert_eq!(db.project_id("demo").unwrap(), id);
        assert!(matches!(
            db.project_id("missing"),
            Err(StoreError::ProjectNotFound(slug)) if slug == "missing"
        ));
    }

    #[test]
    fn test_ensure_project_is_idempotent() {
        let (db, _dir) = setup_test_db();
        let first = db.ensure_project("demo").unwrap();
        let second = db.ensure_project("demo").unwrap();
        assert_eq!(first, second);
        assert_eq!(db.list_projects().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let (db, _dir) = setup_test_db();
        db.create_project("demo").unwrap();
        assert!(db.create_project("demo").is_err());
    }

    #[test]
    fn test_insert_suggestion_keeps_optional_fields_absent() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let id = db.insert_suggestion(&project, &new_suggestion("Dark mode")).unwrap();

        let stored = db.get_suggestion(&id).unwrap().unwrap();
        assert_eq!(stored.title, "Dark mode");
        assert_eq!(stored.description, None);
        assert_eq!(stored.contact, None);
        assert_eq!(stored.vote_count, 0);
        assert_eq!(stored.project_id, Some(project));
    }

    #[test]
    fn test_vote_triggers_maintain_count() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let id = db.insert_suggestion(&project, &new_suggestion("Export")).unwrap();

        db.insert_vote(&id, "voter_a", Direction::Up).unwrap();
        db.insert_vote(&id, "voter_b", Direction::Up).unwrap();
        db.insert_vote(&id, "voter_c", Direction::Down).unwrap();
        assert_eq!(db.get_suggestion(&id).unwrap().unwrap().vote_count, 1);

        db.delete_vote(&id, "voter_c").unwrap();
        assert_eq!(db.get_suggestion(&id).unwrap().unwrap().vote_count, 2);
        assert_eq!(db.vote_sum(&id).unwrap(), 2);
    }

    #[test]
    fn test_second_vote_row_is_constraint_violation() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let id = db.insert_suggestion(&project, &new_suggestion("Export")).unwrap();

        db.insert_vote(&id, "voter_a", Direction::Up).unwrap();
        let err = db.insert_vote(&id, "voter_a", Direction::Down).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(db.get_suggestion(&id).unwrap().unwrap().vote_count, 1);
    }

    #[test]
    fn test_delete_missing_vote_is_ok() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let id = db.insert_suggestion(&project, &new_suggestion("Export")).unwrap();
        assert!(db.delete_vote(&id, "nobody").is_ok());
    }

    #[test]
    fn test_list_votes_for_filters_voter_and_ids() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let a = db.insert_suggestion(&project, &new_suggestion("A")).unwrap();
        let b = db.insert_suggestion(&project, &new_suggestion("B")).unwrap();
        let c = db.insert_suggestion(&project, &new_suggestion("C")).unwrap();

        db.insert_vote(&a, "me", Direction::Up).unwrap();
        db.insert_vote(&b, "me", Direction::Down).unwrap();
        db.insert_vote(&c, "me", Direction::Up).unwrap();
        db.insert_vote(&a, "someone", Direction::Down).unwrap();

        let votes = db.list_votes_for("me", &[a.clone(), b.clone()]).unwrap();
        assert_eq!(votes.len(), 2);
        assert!(votes.iter().all(|v| v.voter_identifier == "me"));
        assert!(votes.iter().any(|v| v.suggestion_id == a && v.direction == Direction::Up));
        assert!(votes.iter().any(|v| v.suggestion_id == b && v.direction == Direction::Down));

        assert!(db.list_votes_for("me", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_list_suggestions_sorted_by_votes() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let low = db.insert_suggestion(&project, &new_suggestion("Low")).unwrap();
        let high = db.insert_suggestion(&project, &new_suggestion("High")).unwrap();
        db.insert_vote(&high, "v1", Direction::Up).unwrap();
        db.insert_vote(&high, "v2", Direction::Up).unwrap();
        db.insert_vote(&low, "v1", Direction::Down).unwrap();

        let page = db.list_suggestions(&project, SortOrder::Votes, 0, 10).unwrap();
        let titles: Vec<&str> = page.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["High", "Low"]);
    }

    #[test]
    fn test_list_suggestions_sorted_by_recent() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        db.insert_suggestion(&project, &new_suggestion("First")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        db.insert_suggestion(&project, &new_suggestion("Second")).unwrap();

        let page = db.list_suggestions(&project, SortOrder::Recent, 0, 10).unwrap();
        assert_eq!(page[0].title, "Second");
        assert_eq!(page[1].title, "First");
    }

    #[test]
    fn test_list_suggestions_scoped_to_project() {
        let (db, _dir) = setup_test_db();
        let demo = db.create_project("demo").unwrap();
        let other = db.create_project("other").unwrap();
        db.insert_suggestion(&demo, &new_suggestion("Mine")).unwrap();
        db.insert_suggestion(&other, &new_suggestion("Theirs")).unwrap();

        let page = db.list_suggestions(&demo, SortOrder::Recent, 0, 10).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Mine");
    }

    #[test]
    fn test_roadmap_items_ordered_by_display_order() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        db.add_roadmap_item(&project, "Third", None, RoadmapStatus::Done, 3).unwrap();
        db.add_roadmap_item(&project, "First", Some("soon"), RoadmapStatus::Planned, 1).unwrap();
        db.add_roadmap_item(&project, "Second", None, RoadmapStatus::Doing, 2).unwrap();

        let items = db.list_roadmap_items(&project).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(items[0].description.as_deref(), Some("soon"));
        assert_eq!(items[2].status, RoadmapStatus::Done);
    }

    #[test]
    fn test_set_roadmap_status() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let id = db.add_roadmap_item(&project, "Ship it", None, RoadmapStatus::Todo, 0).unwrap();

        assert!(db.set_roadmap_status(&id, RoadmapStatus::Done).unwrap());
        assert!(!db.set_roadmap_status("missing", RoadmapStatus::Done).unwrap());
        assert_eq!(db.list_roadmap_items(&project).unwrap()[0].status, RoadmapStatus::Done);
    }

    #[test]
    fn test_reopen_existing_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("store.db");
        {
            let db = Database::open(&db_path).unwrap();
            db.create_project("demo").unwrap();
        }
        let db = Database::open(&db_path).unwrap();
        assert!(db.get_project("demo").unwrap().is_some());
    }

    #[test]
    fn test_sql_injection_in_title() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let malicious = "'; DROP TABLE suggestions; --";
        let id = db.insert_suggestion(&project, &new_suggestion(malicious)).unwrap();

        assert_eq!(db.get_suggestion(&id).unwrap().unwrap().title, malicious);
        assert_eq!(db.list_suggestions(&project, SortOrder::Votes, 0, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_replace_vote_flips_direction() {
        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let id = db.insert_suggestion(&project, &new_suggestion("Flip")).unwrap();

        db.insert_vote(&id, "voter_a", Direction::Up).unwrap();
        db.replace_vote(&id, "voter_a", Direction::Down).unwrap();

        let votes = db.list_votes_for("voter_a", &[id.clone()]).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].direction, Direction::Down);
        assert_eq!(db.get_suggestion(&id).unwrap().unwrap().vote_count, -1);
    }

    #[test]
    fn test_failed_vote_change_keeps_previous_vote() {
        use crate::vote::{LocalVote, VoteEngine, VoteState};

        let (db, _dir) = setup_test_db();
        let project = db.create_project("demo").unwrap();
        let id = db.insert_suggestion(&project, &new_suggestion("Flip")).unwrap();
        db.insert_vote(&id, "voter_a", Direction::Up).unwrap();

        // Reject every new vote row so the insert half fails after the delete
        db.conn
            .execute_batch(
                "CREATE TEMP TRIGGER block_votes BEFORE INSERT ON votes BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
            )
            .unwrap();

        assert!(db.replace_vote(&id, "voter_a", Direction::Down).is_err());

        let mut engine = VoteEngine::new();
        let mut local = LocalVote::new(1, VoteState::Up);
        let pending = engine.begin(&id, &mut local, Direction::Down).unwrap();
        assert!(engine.reconcile(&db, "voter_a", &pending, &mut local).is_err());
        assert_eq!(local, LocalVote::new(1, VoteState::Up));

        let votes = db.list_votes_for("voter_a", &[id.clone()]).unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].direction, Direction::Up);
        assert_eq!(db.get_suggestion(&id).unwrap().unwrap().vote_count, 1);
        assert_eq!(db.vote_sum(&id).unwrap(), 1);
    }

    // ==================== Property-Based Tests ====================

    proptest! {
        #[test]
        fn prop_vote_count_equals_vote_sum(ops in proptest::collection::vec((0usize..4, any::<bool>(), any::<bool>()), 0..30)) {
            let (db, _dir) = setup_test_db();
            let project = db.create_project("demo").unwrap();
            let id = db.insert_suggestion(&project, &new_suggestion("Prop")).unwrap();

            for (voter, up, delete) in ops {
                let voter = format!("voter_{}", voter);
                db.delete_vote(&id, &voter).unwrap();
                if !delete {
                    let direction = if up { Direction::Up } else { Direction::Down };
                    db.insert_vote(&id, &voter, direction).unwrap();
                }
            }

            let stored = db.get_suggestion(&id).unwrap().unwrap();
            prop_assert_eq!(stored.vote_count, db.vote_sum(&id).unwrap());
        }
    }
}
