//! Core domain logic for the Portfolio Backoffice.
//! This crate is the single source of truth for project records.

pub mod clock;
pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{default_log_level, ConfigError, LoggingConfig};
pub use form::{parse_technologies, FieldError, FormErrors, FormField, ProjectDraft};
pub use logging::{init_logging, logging_status};
pub use model::project::{NewProject, Project, ProjectId, ProjectPatch};
pub use repo::project_store::{InMemoryProjectStore, ProjectStore, StoreError, StoreResult};
pub use repo::sqlite_store::SqliteProjectStore;
pub use service::project_service::{
    DashboardSummary, ProjectService, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
