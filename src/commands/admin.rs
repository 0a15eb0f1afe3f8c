use anyhow::{bail, Result};

use crate::db::Database;
use crate::models::RoadmapStatus;

pub fn project(db: &Database, slug: &str) -> Result<()> {
    if !is_valid_slug(slug) {
        bail!(
            "Invalid project slug '{}'. Use lowercase letters, digits and '-'",
            slug
        );
    }
    if db.get_project(slug)?.is_some() {
        println!("Project {} already exists", slug);
        return Ok(());
    }
    let id = db.create_project(slug)?;
    println!("Created project {} ({})", slug, id);
    Ok(())
}

pub fn list_projects(db: &Database) -> Result<()> {
    let projects = db.list_projects()?;
    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }
    for project in projects {
        println!("{:<24} {}", project.slug, project.id);
    }
    Ok(())
}

pub fn roadmap_add(
    db: &Database,
    project: &str,
    title: &str,
    description: Option<&str>,
    status: RoadmapStatus,
    display_order: i64,
) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        bail!("Title is required");
    }
    let project = match db.get_project(project)? {
        Some(p) => p,
        None => bail!("Project {} not found", project),
    };

    let id = db.add_roadmap_item(&project.id, title, description, status, display_order)?;
    println!("Added roadmap item {} [{}]", id, status);
    Ok(id)
}

pub fn roadmap_status(db: &Database, id: &str, status: RoadmapStatus) -> Result<()> {
    if !db.set_roadmap_status(id, status)? {
        bail!("Roadmap item {} not found", id);
    }
    println!("Roadmap item {} is now {}", id, status);
    Ok(())
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Repository;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn setup_test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(&db_path).unwrap();
        (db, dir)
    }

    // ==================== Unit Tests ====================

    #[test]
    fn test_project_create_is_idempotent() {
        let (db, _dir) = setup_test_db();
        project(&db, "acme").unwrap();
        project(&db, "acme").unwrap();
        assert_eq!(db.list_projects().unwrap().len(), 1);
        assert!(list_projects(&db).is_ok());
    }

    #[test]
    fn test_project_rejects_bad_slug() {
        let (db, _dir) = setup_test_db();
        assert!(project(&db, "Has Spaces").is_err());
        assert!(project(&db, "").is_err());
        assert!(project(&db, "-lead").is_err());
    }

    #[test]
    fn test_roadmap_add_and_update() {
        let (db, _dir) = setup_test_db();
        project(&db, "acme").unwrap();
        let id = roadmap_add(&db, "acme", "  Export  ", None, RoadmapStatus::Planned, 2).unwrap();

        roadmap_status(&db, &id, RoadmapStatus::Done).unwrap();

        let project_id = db.project_id("acme").unwrap();
        let items = db.list_roadmap_items(&project_id).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Export");
        assert_eq!(items[0].status, RoadmapStatus::Done);
    }

    #[test]
    fn test_roadmap_add_unknown_project() {
        let (db, _dir) = setup_test_db();
        assert!(roadmap_add(&db, "missing", "Export", None, RoadmapStatus::Todo, 0).is_err());
    }

    #[test]
    fn test_roadmap_status_unknown_item() {
        let (db, _dir) = setup_test_db();
        let err = roadmap_status(&db, "nope", RoadmapStatus::Doing).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    // ==================== Property-Based Tests ====================

    proptest! {
        #[test]
        fn prop_valid_slugs_accepted(slug in "[a-z0-9][a-z0-9-]{0,30}") {
            prop_assert!(is_valid_slug(&slug));
        }

        #[test]
        fn prop_uppercase_rejected(slug in "[a-z]{0,5}[A-Z][a-z]{0,5}") {
            prop_assert!(!is_valid_slug(&slug));
        }
    }
}
