//! Character relationship map types.

use serde::{Deserialize, Serialize};

/// Default label for a new node.
pub const DEFAULT_NODE_NAME: &str = "דמות חדשה";
/// Default description for a new connection.
pub const DEFAULT_CONNECTION_DESCRIPTION: &str = "תיאור הקשר...";

/// A character placed on the map canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMapNode {
    /// Node identifier.
    pub id: String,
    /// Character name.
    pub name: String,
    /// Horizontal canvas coordinate.
    pub x: f64,
    /// Vertical canvas coordinate.
    pub y: f64,
    /// Portrait image as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// An undirected relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMapConnection {
    /// Connection identifier.
    pub id: String,
    /// One end of the relationship.
    pub from_id: String,
    /// The other end of the relationship.
    pub to_id: String,
    /// Free-text description of the relationship.
    pub description: String,
}

impl CharacterMapConnection {
    /// Returns `true` if this connection links `a` and `b`, in either direction.
    #[must_use]
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.from_id == a && self.to_id == b) || (self.from_id == b && self.to_id == a)
    }

    /// Returns `true` if either end is `node_id`.
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.from_id == node_id || self.to_id == node_id
    }
}
