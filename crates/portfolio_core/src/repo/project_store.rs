//! Project store contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the async CRUD contract every project backend satisfies.
//! - Provide the process-lifetime in-memory store.
//!
//! # Invariants
//! - Every returned project is an owned copy; callers never alias store state.
//! - `NotFound` is the only failure of in-memory store operations.
//! - Ids are unique among live records.
//! - Each mutation strictly advances the record's `updated_at`.

use crate::clock::{next_timestamp, Clock, SystemClock};
use crate::db::DbError;
use crate::model::project::{NewProject, Project, ProjectId, ProjectPatch};
use crate::seed::sample_projects;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for project store operations.
#[derive(Debug)]
pub enum StoreError {
    /// No live record has the requested id.
    NotFound(ProjectId),
    /// Storage backend failure (SQLite store only).
    Db(DbError),
    /// Rejected seed records or an undecodable persisted row.
    InvalidData(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid project data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Backend-agnostic project store.
///
/// Services call this trait, never a concrete implementation, so the
/// in-memory store can be swapped for a persistent or remote one.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Snapshot of all projects in insertion order.
    async fn list(&self) -> StoreResult<Vec<Project>>;

    /// Copy of the project with `id`, or `NotFound(id)`.
    async fn get(&self, id: &str) -> StoreResult<Project>;

    /// Stores a new project. Assigns id and sets both timestamps to now.
    async fn create(&self, input: NewProject) -> StoreResult<Project>;

    /// Merges `patch` over the project with `id` and refreshes `updated_at`.
    async fn update(&self, id: &str, patch: ProjectPatch) -> StoreResult<Project>;

    /// Removes the project with `id`.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// Number of live projects.
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.list().await?.len())
    }
}

#[async_trait]
impl<S: ProjectStore + ?Sized> ProjectStore for Arc<S> {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        (**self).list().await
    }

    async fn get(&self, id: &str) -> StoreResult<Project> {
        (**self).get(id).await
    }

    async fn create(&self, input: NewProject) -> StoreResult<Project> {
        (**self).create(input).await
    }

    async fn update(&self, id: &str, patch: ProjectPatch) -> StoreResult<Project> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id).await
    }

    async fn count(&self) -> StoreResult<usize> {
        (**self).count().await
    }
}

/// Process-lifetime project store over an insertion-ordered `Vec`.
///
/// Lookups are linear scans. The mutex is held only inside non-awaiting
/// sections, which serializes read-modify-write sequences across tasks.
pub struct InMemoryProjectStore {
    records: Mutex<Vec<Project>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryProjectStore {
    /// Empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty store on a caller-provided clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::from_parts(Vec::new(), clock)
    }

    /// Store holding `records` in the given order, on the system clock.
    ///
    /// # Errors
    /// - `StoreError::InvalidData` when two records share an id or a record
    ///   has `updated_at` earlier than `created_at`.
    pub fn with_records(records: Vec<Project>) -> StoreResult<Self> {
        Self::with_records_and_clock(records, Arc::new(SystemClock))
    }

    /// Same as `with_records`, on a caller-provided clock.
    pub fn with_records_and_clock(
        records: Vec<Project>,
        clock: Arc<dyn Clock>,
    ) -> StoreResult<Self> {
        check_records(&records)?;
        Ok(Self::from_parts(records, clock))
    }

    /// Store pre-filled with the illustrative sample projects.
    pub fn seeded() -> Self {
        Self::seeded_with_clock(Arc::new(SystemClock))
    }

    /// Sample-filled store on a caller-provided clock.
    pub fn seeded_with_clock(clock: Arc<dyn Clock>) -> Self {
        // Sample ids are fresh v4 uuids with created_at == updated_at.
        Self::from_parts(sample_projects(), clock)
    }

    fn from_parts(records: Vec<Project>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(records),
            clock,
        }
    }

    fn records(&self) -> MutexGuard<'_, Vec<Project>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn list(&self) -> StoreResult<Vec<Project>> {
        Ok(self.records().clone())
    }

    async fn get(&self, id: &str) -> StoreResult<Project> {
        self.records()
            .iter()
            .find(|project| project.id == id)
            .cloned()
            .ok_or_else(|| not_found("project_get", id))
    }

    async fn create(&self, input: NewProject) -> StoreResult<Project> {
        let mut records = self.records();
        let mut id = Uuid::new_v4().to_string();
        while records.iter().any(|project| project.id == id) {
            id = Uuid::new_v4().to_string();
        }

        let project = Project::from_new(id, input, self.clock.now());
        records.push(project.clone());
        info!(
            "event=project_create module=store status=ok id={} total={}",
            project.id,
            records.len()
        );
        Ok(project)
    }

    async fn update(&self, id: &str, patch: ProjectPatch) -> StoreResult<Project> {
        let mut records = self.records();
        let Some(project) = records.iter_mut().find(|project| project.id == id) else {
            return Err(not_found("project_update", id));
        };

        let noop = patch.is_empty();
        project.apply_patch(patch);
        project.updated_at = next_timestamp(self.clock.as_ref(), project.updated_at);
        debug!("event=project_update module=store status=ok id={id} noop={noop}");
        Ok(project.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut records = self.records();
        let Some(index) = records.iter().position(|project| project.id == id) else {
            return Err(not_found("project_delete", id));
        };

        records.remove(index);
        info!(
            "event=project_delete module=store status=ok id={id} total={}",
            records.len()
        );
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.records().len())
    }
}

fn check_records(records: &[Project]) -> StoreResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for project in records {
        if !seen.insert(project.id.as_str()) {
            return Err(StoreError::InvalidData(format!(
                "duplicate project id {}",
                project.id
            )));
        }
        if project.updated_at < project.created_at {
            return Err(StoreError::InvalidData(format!(
                "project {} has updated_at before created_at",
                project.id
            )));
        }
    }
    Ok(())
}

pub(crate) fn not_found(event: &str, id: &str) -> StoreError {
    warn!("event={event} module=store status=error error_code=not_found id={id}");
    StoreError::NotFound(id.to_string())
}
