//! Project domain model.
//!
//! # Responsibility
//! - Define the portfolio project record and its create/patch payloads.
//! - Fix the external JSON shape (camelCase, ISO-8601 timestamps).
//!
//! # Invariants
//! - `id`, `created_at` and `updated_at` are written only by stores.
//! - `ProjectPatch` has no `id`; an `id` key in incoming JSON is ignored.
//! - `created_at <= updated_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned project identifier (UUID v4 text).
pub type ProjectId = String;

/// One portfolio project as held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    /// Display order is insertion order.
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Builds a stored record from a creation payload.
    ///
    /// Only stores call this; `id` and `now` come from the store.
    pub(crate) fn from_new(id: ProjectId, input: NewProject, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            technologies: input.technologies,
            github_url: input.github_url,
            live_url: input.live_url,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges supplied patch fields over this record.
    ///
    /// Store-managed fields are untouched; callers refresh `updated_at`.
    pub(crate) fn apply_patch(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(technologies) = patch.technologies {
            self.technologies = technologies;
        }
        if let Some(github_url) = patch.github_url {
            self.github_url = github_url;
        }
        if let Some(live_url) = patch.live_url {
            self.live_url = live_url;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
    }
}

/// Creation payload: every field except the store-managed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewProject {
    pub fn new<I, T>(
        title: impl Into<String>,
        description: impl Into<String>,
        technologies: I,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            title: title.into(),
            description: description.into(),
            technologies: technologies.into_iter().map(Into::into).collect(),
            github_url: None,
            live_url: None,
            image_url: None,
        }
    }
}

/// Partial update payload. `None` means "leave unchanged".
///
/// URL fields are doubly optional: `Some(None)` (JSON `null`) clears the
/// stored value, `Some(Some(url))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub github_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub live_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Option<String>>,
}

impl ProjectPatch {
    /// Returns true when the patch changes no field.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.technologies.is_none()
            && self.github_url.is_none()
            && self.live_url.is_none()
            && self.image_url.is_none()
    }
}

// A key that is present maps to `Some(..)` even when its value is `null`;
// absent keys fall back to `default` (`None`).
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

mod iso_millis {
    use crate::clock::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(D::Error::custom)
    }
}
