//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `portfolio_core` wiring end to end on a seeded in-memory store.
//! - Print the dashboard count and project list in a stable line format.
//! - Mirror each outcome as a `module=cli` log event when file logging is on.

use log::{error, info};
use portfolio_core::{
    core_version, init_logging, InMemoryProjectStore, LoggingConfig, Project, ProjectService,
    ProjectStore, ServiceError,
};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match LoggingConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("portfolio_cli config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    match init_logging(&config) {
        Ok(true) => info!("event=cli_start module=cli status=ok version={}", core_version()),
        Ok(false) => {}
        Err(err) => eprintln!("portfolio_cli logging disabled: {err}"),
    }

    let service = ProjectService::new(InMemoryProjectStore::seeded());
    println!("portfolio_core version={}", core_version());

    match run(&service).await {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("portfolio_cli failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Collects the dashboard line followed by one line per project.
async fn run<S: ProjectStore>(service: &ProjectService<S>) -> Result<Vec<String>, ServiceError> {
    let summary = service.dashboard().await.map_err(|err| {
        error!("event=cli_dashboard module=cli status=error error={err}");
        err
    })?;
    info!(
        "event=cli_dashboard module=cli status=ok total_projects={}",
        summary.total_projects
    );

    let projects = service.list_projects().await.map_err(|err| {
        error!("event=cli_list module=cli status=error error={err}");
        err
    })?;
    info!("event=cli_list module=cli status=ok count={}", projects.len());

    let mut lines = Vec::with_capacity(projects.len() + 1);
    lines.push(format!("total_projects={}", summary.total_projects));
    lines.extend(projects.iter().map(project_line));
    Ok(lines)
}

fn project_line(project: &Project) -> String {
    format!(
        "{} title={:?} technologies={:?}",
        project.id,
        project.title,
        project.technologies.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::run;
    use portfolio_core::{InMemoryProjectStore, NewProject, ProjectService};

    #[tokio::test]
    async fn run_reports_count_then_one_line_per_project() {
        let service = ProjectService::new(InMemoryProjectStore::new());
        let created = service
            .create_project(NewProject::new("Demo", "d", ["Rust", "SQLite"]))
            .await
            .unwrap();

        let lines = run(&service).await.unwrap();
        assert_eq!(
            lines,
            vec![
                "total_projects=1".to_string(),
                format!("{} title=\"Demo\" technologies=\"Rust, SQLite\"", created.id),
            ]
        );
    }

    #[tokio::test]
    async fn run_on_seeded_store_lists_every_sample() {
        let service = ProjectService::new(InMemoryProjectStore::seeded());
        let lines = run(&service).await.unwrap();

        assert_eq!(lines[0], "total_projects=3");
        assert_eq!(lines.len(), 4);
    }
}
