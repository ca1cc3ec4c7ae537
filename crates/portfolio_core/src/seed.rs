//! Illustrative sample projects for a freshly started backoffice.
//!
//! The content is placeholder data; only its shape matters.

use crate::model::project::Project;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Returns the sample projects with fresh ids, oldest first.
pub fn sample_projects() -> Vec<Project> {
    vec![
        sample(
            "E-Commerce Platform",
            "A full-stack e-commerce platform with cart, checkout, and payment integration.",
            &["React", "Node.js", "PostgreSQL", "Stripe"],
            Some("https://github.com/example/ecommerce"),
            Some("https://ecommerce.example.com"),
            seed_date(2024, 1, 15),
        ),
        sample(
            "Portfolio Website",
            "Personal portfolio website showcasing projects and skills.",
            &["React", "TypeScript", "Vite", "MUI"],
            Some("https://github.com/example/portfolio"),
            Some("https://portfolio.example.com"),
            seed_date(2024, 2, 10),
        ),
        sample(
            "Task Management App",
            "A kanban-style task management application with drag-and-drop support.",
            &["React", "Redux", "Firebase", "DnD Kit"],
            Some("https://github.com/example/taskmanager"),
            None,
            seed_date(2024, 3, 5),
        ),
    ]
}

fn sample(
    title: &str,
    description: &str,
    technologies: &[&str],
    github_url: Option<&str>,
    live_url: Option<&str>,
    created_at: DateTime<Utc>,
) -> Project {
    Project {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        technologies: technologies.iter().map(|tech| tech.to_string()).collect(),
        github_url: github_url.map(str::to_string),
        live_url: live_url.map(str::to_string),
        image_url: None,
        created_at,
        updated_at: created_at,
    }
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid seed date")
}
