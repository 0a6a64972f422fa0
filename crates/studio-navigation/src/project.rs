use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    #[default]
    Chat,
    Image,
    Video,
    Copywriting,
    #[serde(other)]
    Other,
}

/// The fields of a project record the navigation layer relies on. Anything
/// else the backend sends rides along in `extra` so a cached copy keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveProject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActiveProject {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ProjectKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Records without an id cannot be addressed by URL and are rejected.
    #[must_use]
    pub fn has_valid_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_kind_decodes_as_other() {
        let project: ActiveProject = serde_json::from_value(json!({
            "id": "p1",
            "name": "Launch copy",
            "type": "podcast"
        }))
        .expect("decode project");
        assert_eq!(project.kind, ProjectKind::Other);
    }

    #[test]
    fn extra_fields_survive_a_round_trip() {
        let raw = json!({
            "id": "p1",
            "name": "Brand kit",
            "type": "image",
            "updated_at": "2026-01-02T03:04:05Z",
            "owner_id": "user-9",
            "tags": ["a", "b"]
        });
        let project: ActiveProject = serde_json::from_value(raw.clone()).expect("decode project");
        assert_eq!(project.kind, ProjectKind::Image);
        assert_eq!(project.extra.get("owner_id"), Some(&json!("user-9")));
        assert_eq!(serde_json::to_value(&project).expect("encode project"), raw);
    }

    #[test]
    fn blank_ids_are_invalid() {
        assert!(!ActiveProject::new("  ", "x", ProjectKind::Chat).has_valid_id());
        assert!(ActiveProject::new("p1", "x", ProjectKind::Chat).has_valid_id());
    }
}
