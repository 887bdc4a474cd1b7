//! Entities of the ordering model.

use serde::{Deserialize, Serialize};

/// A named, colored track representing one narrative thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plotline {
    /// Plotline identifier, unique within its book.
    pub id: String,
    /// Display name.
    pub name: String,
    /// CSS color used as a display hint.
    pub color: String,
}

/// The atomic unit of manuscript content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene identifier, unique within its book.
    pub id: String,
    /// The plotline this scene belongs to.
    pub plotline_id: String,
    /// Scene title.
    #[serde(default)]
    pub title: String,
    /// Manuscript text.
    #[serde(default)]
    pub content: String,
    /// Global zero-based position, shared across all plotlines of the book.
    pub position: usize,
    /// Whether the author marked the scene as finished.
    #[serde(default)]
    pub is_completed: bool,
}

/// A shallow update of the editable scene fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl ScenePatch {
    /// A patch that only replaces the content.
    #[must_use]
    pub fn content(content: String) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.is_completed.is_none()
    }

    /// Names of the fields this patch sets, in wire form.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.content.is_some() {
            fields.push("content");
        }
        if self.is_completed.is_some() {
            fields.push("isCompleted");
        }
        fields
    }

    pub(crate) fn apply_to(self, scene: &mut Scene) {
        if let Some(title) = self.title {
            scene.title = title;
        }
        if let Some(content) = self.content {
            scene.content = content;
        }
        if let Some(is_completed) = self.is_completed {
            scene.is_completed = is_completed;
        }
    }
}

/// Title and content of a scene that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDraft {
    /// Scene title.
    #[serde(default)]
    pub title: String,
    /// Manuscript text.
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene {
            id: "s1".into(),
            plotline_id: "p1".into(),
            title: "Opening".into(),
            content: "Once".into(),
            position: 0,
            is_completed: false,
        }
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        // Arrange
        let mut target = scene();
        let patch = ScenePatch {
            is_completed: Some(true),
            ..ScenePatch::default()
        };

        // Act
        patch.apply_to(&mut target);

        // Assert
        assert!(target.is_completed);
        assert_eq!(target.title, "Opening");
        assert_eq!(target.content, "Once");
    }

    #[test]
    fn test_empty_patch_reports_empty() {
        assert!(ScenePatch::default().is_empty());
        assert!(!ScenePatch::content("x".into()).is_empty());
    }

    #[test]
    fn test_field_names_use_wire_form() {
        let patch = ScenePatch {
            title: Some("T".into()),
            content: None,
            is_completed: Some(false),
        };

        assert_eq!(patch.field_names(), vec!["title", "isCompleted"]);
    }

    #[test]
    fn test_scene_without_completion_flag_defaults_to_open() {
        let json = r#"{ "id": "s1", "plotlineId": "p1", "title": "A", "content": "", "position": 4 }"#;

        let scene: Scene = serde_json::from_str(json).unwrap();

        assert!(!scene.is_completed);
        assert_eq!(scene.position, 4);
    }

    #[test]
    fn test_patch_deserializes_camel_case_subset() {
        let patch: ScenePatch = serde_json::from_str(r#"{ "isCompleted": true }"#).unwrap();

        assert_eq!(patch.is_completed, Some(true));
        assert!(patch.title.is_none());
    }
}
