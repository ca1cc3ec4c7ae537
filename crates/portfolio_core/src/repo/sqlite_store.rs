//! SQLite-backed project store.
//!
//! # Responsibility
//! - Satisfy the `ProjectStore` contract over a migrated SQLite connection.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `list()` order is insertion order (`seq` ascending).
//! - Read paths reject corrupt rows instead of masking them.
//! - `technologies` is persisted as a JSON array of strings.

use crate::clock::{format_timestamp, next_timestamp, parse_timestamp, Clock, SystemClock};
use crate::db::migrations::{latest_version, schema_version};
use crate::db::{open_db_in_memory, DbError};
use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::repo::project_store::{not_found, ProjectStore, StoreError, StoreResult};
use async_trait::async_trait;
use log::{debug, info};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    technologies,
    github_url,
    live_url,
    image_url,
    created_at,
    updated_at
FROM projects";

/// Project store persisted in SQLite.
pub struct SqliteProjectStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl SqliteProjectStore {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    ///
    /// # Errors
    /// - `StoreError::Db(DbError::SchemaMismatch)` when the connection was not
    ///   migrated to the schema this binary expects.
    pub fn new(conn: Connection) -> StoreResult<Self> {
        let db_version = schema_version(&conn)?;
        let expected = latest_version();
        if db_version != expected {
            return Err(DbError::SchemaMismatch {
                db_version,
                expected,
            }
            .into());
        }

        Ok(Self {
            conn: Mutex::new(conn),
            clock: Arc::new(SystemClock),
        })
    }

    /// Opens a fresh, migrated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::new(open_db_in_memory()?)
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();

        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }

        Ok(projects)
    }

    async fn get(&self, id: &str) -> StoreResult<Project> {
        let conn = self.conn();
        load_project(&conn, id)?.ok_or_else(|| not_found("project_get", id))
    }

    async fn create(&self, input: NewProject) -> StoreResult<Project> {
        let conn = self.conn();
        let project = Project::from_new(Uuid::new_v4().to_string(), input, self.clock.now());

        conn.execute(
            "INSERT INTO projects (
                id,
                title,
                description,
                technologies,
                github_url,
                live_url,
                image_url,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                project.id,
                project.title,
                project.description,
                technologies_to_db(&project.technologies)?,
                project.github_url,
                project.live_url,
                project.image_url,
                format_timestamp(project.created_at),
                format_timestamp(project.updated_at),
            ],
        )?;

        info!(
            "event=project_create module=sqlite_store status=ok id={}",
            project.id
        );
        Ok(project)
    }

    async fn update(&self, id: &str, patch: ProjectPatch) -> StoreResult<Project> {
        let conn = self.conn();
        let Some(mut project) = load_project(&conn, id)? else {
            return Err(not_found("project_update", id));
        };

        project.apply_patch(patch);
        project.updated_at = next_timestamp(self.clock.as_ref(), project.updated_at);

        let changed = conn.execute(
            "UPDATE projects
             SET
                title = ?1,
                description = ?2,
                technologies = ?3,
                github_url = ?4,
                live_url = ?5,
                image_url = ?6,
                updated_at = ?7
             WHERE id = ?8;",
            params![
                project.title,
                project.description,
                technologies_to_db(&project.technologies)?,
                project.github_url,
                project.live_url,
                project.image_url,
                format_timestamp(project.updated_at),
                project.id,
            ],
        )?;
        if changed == 0 {
            return Err(not_found("project_update", id));
        }

        debug!("event=project_update module=sqlite_store status=ok id={id}");
        Ok(project)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(not_found("project_delete", id));
        }

        info!("event=project_delete module=sqlite_store status=ok id={id}");
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM projects;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative project count `{count}`")))
    }
}

fn load_project(conn: &Connection, id: &str) -> StoreResult<Option<Project>> {
    let mut stmt = conn.prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_project_row(row)?)),
        None => Ok(None),
    }
}

fn parse_project_row(row: &Row<'_>) -> StoreResult<Project> {
    let id: String = row.get("id")?;

    let technologies_text: String = row.get("technologies")?;
    let technologies: Vec<String> = serde_json::from_str(&technologies_text).map_err(|err| {
        StoreError::InvalidData(format!(
            "invalid technologies `{technologies_text}` for project {id}: {err}"
        ))
    })?;

    let created_at = parse_column_timestamp(row, "created_at", &id)?;
    let updated_at = parse_column_timestamp(row, "updated_at", &id)?;

    Ok(Project {
        title: row.get("title")?,
        description: row.get("description")?,
        technologies,
        github_url: row.get("github_url")?,
        live_url: row.get("live_url")?,
        image_url: row.get("image_url")?,
        created_at,
        updated_at,
        id,
    })
}

fn parse_column_timestamp(
    row: &Row<'_>,
    column: &'static str,
    id: &str,
) -> StoreResult<chrono::DateTime<chrono::Utc>> {
    let text: String = row.get(column)?;
    parse_timestamp(&text).map_err(|err| {
        StoreError::InvalidData(format!(
            "invalid {column} `{text}` for project {id}: {err}"
        ))
    })
}

fn technologies_to_db(technologies: &[String]) -> StoreResult<String> {
    serde_json::to_string(technologies)
        .map_err(|err| StoreError::InvalidData(format!("unencodable technologies: {err}")))
}
