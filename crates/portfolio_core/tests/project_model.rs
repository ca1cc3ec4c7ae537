use chrono::{TimeZone, Utc};
use portfolio_core::{NewProject, Project, ProjectPatch};

fn sample_project() -> Project {
    let at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    Project {
        id: "11111111-2222-4333-8444-555555555555".to_string(),
        title: "Portfolio Website".to_string(),
        description: "Personal site".to_string(),
        technologies: vec!["React".to_string(), "Vite".to_string()],
        github_url: Some("https://github.com/example/portfolio".to_string()),
        live_url: None,
        image_url: None,
        created_at: at,
        updated_at: at,
    }
}

#[test]
fn project_serialization_uses_expected_wire_fields() {
    let project = sample_project();

    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["githubUrl"], "https://github.com/example/portfolio");
    assert!(json.get("liveUrl").is_none());
    assert!(json.get("imageUrl").is_none());
    assert_eq!(json["technologies"], serde_json::json!(["React", "Vite"]));
    assert_eq!(json["createdAt"], "2024-01-15T00:00:00.000Z");
    assert_eq!(json["updatedAt"], "2024-01-15T00:00:00.000Z");

    let decoded: Project = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, project);
}

#[test]
fn project_deserialize_rejects_bad_timestamp() {
    let mut json = serde_json::to_value(sample_project()).unwrap();
    json["createdAt"] = serde_json::json!("last tuesday");

    assert!(serde_json::from_value::<Project>(json).is_err());
}

#[test]
fn new_project_defaults_optional_fields() {
    let input: NewProject = serde_json::from_value(serde_json::json!({ "title": "Demo" })).unwrap();

    assert_eq!(input, NewProject::new("Demo", "", Vec::<String>::new()));
}

#[test]
fn patch_distinguishes_absent_null_and_value() {
    let patch: ProjectPatch = serde_json::from_value(serde_json::json!({
        "githubUrl": null,
        "liveUrl": "https://live.example.com"
    }))
    .unwrap();

    assert_eq!(patch.github_url, Some(None));
    assert_eq!(
        patch.live_url,
        Some(Some("https://live.example.com".to_string()))
    );
    assert_eq!(patch.image_url, None);
    assert_eq!(patch.title, None);
    assert!(!patch.is_empty());
}

#[test]
fn patch_without_known_fields_is_empty() {
    let patch: ProjectPatch =
        serde_json::from_value(serde_json::json!({ "id": "other", "createdAt": "x" })).unwrap();

    assert!(patch.is_empty());
    assert_eq!(patch, ProjectPatch::default());
}
