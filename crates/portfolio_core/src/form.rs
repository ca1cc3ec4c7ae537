//! Create/edit form drafts for projects.
//!
//! # Responsibility
//! - Hold the raw string state of the project form.
//! - Validate required fields and convert drafts into store payloads.
//!
//! # Invariants
//! - Required means non-empty after trimming.
//! - Validation reports every failing field, not only the first.
//! - Empty optional URLs never reach the store as empty strings.

use crate::model::project::{NewProject, Project, ProjectPatch};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Title,
    Description,
    Technologies,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Technologies => "technologies",
        }
    }
}

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

/// All validation failures of a draft, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Message for `field`, if it failed.
    pub fn message_for(&self, field: FormField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    fn push(&mut self, field: FormField, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field.as_str(), error.message)?;
        }
        Ok(())
    }
}

impl Error for FormErrors {}

/// Raw form state as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    /// Comma-separated technology names.
    pub technologies_input: String,
    pub github_url: String,
    pub live_url: String,
    pub image_url: String,
}

impl ProjectDraft {
    /// Prefills a draft for editing an existing project.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            technologies_input: project.technologies.join(", "),
            github_url: project.github_url.clone().unwrap_or_default(),
            live_url: project.live_url.clone().unwrap_or_default(),
            image_url: project.image_url.clone().unwrap_or_default(),
        }
    }

    /// Validates the draft and builds a creation payload.
    ///
    /// # Errors
    /// - Returns every failed rule when title, description or technologies
    ///   are missing.
    pub fn validate(&self) -> Result<NewProject, FormErrors> {
        let technologies = parse_technologies(&self.technologies_input);

        let mut errors = FormErrors::default();
        if self.title.trim().is_empty() {
            errors.push(FormField::Title, "Title is required");
        }
        if self.description.trim().is_empty() {
            errors.push(FormField::Description, "Description is required");
        }
        if technologies.is_empty() {
            errors.push(
                FormField::Technologies,
                "At least one technology is required",
            );
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewProject {
            title: self.title.clone(),
            description: self.description.clone(),
            technologies,
            github_url: optional_url(&self.github_url),
            live_url: optional_url(&self.live_url),
            image_url: optional_url(&self.image_url),
        })
    }

    /// Validates the draft and builds a full-replacement edit patch.
    ///
    /// URLs left empty clear the stored value.
    pub fn into_patch(self) -> Result<ProjectPatch, FormErrors> {
        let input = self.validate()?;
        Ok(ProjectPatch {
            title: Some(input.title),
            description: Some(input.description),
            technologies: Some(input.technologies),
            github_url: Some(input.github_url),
            live_url: Some(input.live_url),
            image_url: Some(input.image_url),
        })
    }
}

/// Splits comma-separated input into trimmed, non-empty technology names.
pub fn parse_technologies(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tech| !tech.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional_url(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
