//! Project use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for view-layer callers.
//! - Back the dashboard summary and create/edit form submission flows.
//!
//! # Invariants
//! - Service APIs never bypass the store contract.
//! - Service layer remains storage-agnostic.
//! - A vanished record is a normal outcome, reported as `NotFound`.

use crate::form::{FormErrors, ProjectDraft};
use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::repo::project_store::{ProjectStore, StoreError};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Draft failed validation; nothing was written.
    Form(FormErrors),
    /// Target project does not exist.
    NotFound(String),
    /// Any other store failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form(errors) => write!(f, "invalid project form: {errors}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(errors) => Some(errors),
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<FormErrors> for ServiceError {
    fn from(value: FormErrors) -> Self {
        Self::Form(value)
    }
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_projects: usize,
}

/// Use-case service over any project store.
pub struct ProjectService<S: ProjectStore> {
    store: S,
}

impl<S: ProjectStore> ProjectService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow of the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        self.store.list().await.map_err(|err| {
            warn!("event=projects_list module=service status=error error={err}");
            err.into()
        })
    }

    pub async fn get_project(&self, id: &str) -> ServiceResult<Project> {
        Ok(self.store.get(id).await?)
    }

    pub async fn create_project(&self, input: NewProject) -> ServiceResult<Project> {
        Ok(self.store.create(input).await?)
    }

    pub async fn update_project(&self, id: &str, patch: ProjectPatch) -> ServiceResult<Project> {
        Ok(self.store.update(id, patch).await?)
    }

    pub async fn delete_project(&self, id: &str) -> ServiceResult<()> {
        Ok(self.store.delete(id).await?)
    }

    /// Deletes `id`, treating an already-removed record as success.
    ///
    /// Returns whether this call removed the record.
    pub async fn delete_if_present(&self, id: &str) -> ServiceResult<bool> {
        match self.store.delete(id).await {
            Ok(()) => Ok(true),
            Err(StoreError::NotFound(_)) => {
                info!("event=project_delete module=service status=ok already_gone=true id={id}");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn dashboard(&self) -> ServiceResult<DashboardSummary> {
        let total_projects = self.store.count().await?;
        Ok(DashboardSummary { total_projects })
    }

    /// Submits the create/edit form.
    ///
    /// # Contract
    /// - `id = None` creates a project from the draft.
    /// - `id = Some(..)` replaces every mutable field of that project.
    /// - Validation failures return `ServiceError::Form` without touching
    ///   the store.
    pub async fn submit_form(
        &self,
        id: Option<&str>,
        draft: ProjectDraft,
    ) -> ServiceResult<Project> {
        let result = match id {
            None => {
                let input = draft.validate()?;
                self.store.create(input).await
            }
            Some(id) => {
                let patch = draft.into_patch()?;
                self.store.update(id, patch).await
            }
        };

        let project = result?;
        info!(
            "event=project_form_submit module=service status=ok mode={} id={}",
            if id.is_some() { "edit" } else { "create" },
            project.id
        );
        Ok(project)
    }
}
