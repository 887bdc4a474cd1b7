//! The world-building collections carried by a book, and their edits.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storylines_core::error::DomainError;
use storylines_core::id::IdGenerator;
use tracing::debug;

use crate::character_map::{
    CharacterMapConnection, CharacterMapNode, DEFAULT_CONNECTION_DESCRIPTION, DEFAULT_NODE_NAME,
};
use crate::questionnaire::{CustomField, QuestionnaireEntry, QuestionnaireKind};

const NEW_NODE_X: f64 = 200.0;
const NEW_NODE_Y: f64 = 200.0;

/// Questionnaires and the character map of one book.
///
/// Every collection defaults to empty so that books saved before a
/// collection existed, and partial backup files, still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldbuildingNotes {
    /// Character sheets.
    #[serde(default)]
    pub characters: Vec<QuestionnaireEntry>,
    /// Place sheets.
    #[serde(default)]
    pub places: Vec<QuestionnaireEntry>,
    /// Period sheets.
    #[serde(default)]
    pub periods: Vec<QuestionnaireEntry>,
    /// Twist sheets.
    #[serde(default)]
    pub twists: Vec<QuestionnaireEntry>,
    /// Fantasy world sheets.
    #[serde(default)]
    pub fantasy_worlds: Vec<QuestionnaireEntry>,
    /// Characters placed on the relationship map.
    #[serde(default)]
    pub character_map_nodes: Vec<CharacterMapNode>,
    /// Relationships drawn between characters.
    #[serde(default)]
    pub character_map_connections: Vec<CharacterMapConnection>,
}

impl WorldbuildingNotes {
    /// Returns the entries of one questionnaire collection.
    #[must_use]
    pub fn entries(&self, kind: QuestionnaireKind) -> &[QuestionnaireEntry] {
        match kind {
            QuestionnaireKind::Characters => &self.characters,
            QuestionnaireKind::Places => &self.places,
            QuestionnaireKind::Periods => &self.periods,
            QuestionnaireKind::Twists => &self.twists,
            QuestionnaireKind::FantasyWorlds => &self.fantasy_worlds,
        }
    }

    fn entries_mut(&mut self, kind: QuestionnaireKind) -> &mut Vec<QuestionnaireEntry> {
        match kind {
            QuestionnaireKind::Characters => &mut self.characters,
            QuestionnaireKind::Places => &mut self.places,
            QuestionnaireKind::Periods => &mut self.periods,
            QuestionnaireKind::Twists => &mut self.twists,
            QuestionnaireKind::FantasyWorlds => &mut self.fantasy_worlds,
        }
    }

    /// Looks up one entry.
    #[must_use]
    pub fn entry(&self, kind: QuestionnaireKind, entry_id: &str) -> Option<&QuestionnaireEntry> {
        self.entries(kind).iter().find(|e| e.id == entry_id)
    }

    fn entry_mut(
        &mut self,
        kind: QuestionnaireKind,
        entry_id: &str,
    ) -> Result<&mut QuestionnaireEntry, DomainError> {
        self.entries_mut(kind)
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| DomainError::not_found("questionnaire entry", entry_id))
    }

    /// Appends a new entry with the defaults for `kind` and returns its id.
    pub fn add_entry(&mut self, kind: QuestionnaireKind, ids: &dyn IdGenerator) -> String {
        let entry = QuestionnaireEntry::new(ids.next_id("q"), kind);
        let id = entry.id.clone();
        debug!(%kind, entry_id = %id, "questionnaire entry added");
        self.entries_mut(kind).push(entry);
        id
    }

    /// Renames an entry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the entry does not exist.
    pub fn rename_entry(
        &mut self,
        kind: QuestionnaireKind,
        entry_id: &str,
        name: String,
    ) -> Result<(), DomainError> {
        self.entry_mut(kind, entry_id)?.name = name;
        Ok(())
    }

    /// Stores the answer to one question. A `null` value clears it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the entry does not exist.
    pub fn set_answer(
        &mut self,
        kind: QuestionnaireKind,
        entry_id: &str,
        key: &str,
        value: Value,
    ) -> Result<(), DomainError> {
        let entry = self.entry_mut(kind, entry_id)?;
        if value.is_null() {
            entry.data.remove(key);
        } else {
            entry.data.insert(key.to_owned(), value);
        }
        Ok(())
    }

    /// Attaches or clears the portrait of an entry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the entry does not exist.
    pub fn set_entry_image(
        &mut self,
        kind: QuestionnaireKind,
        entry_id: &str,
        image_url: Option<String>,
    ) -> Result<(), DomainError> {
        self.entry_mut(kind, entry_id)?.image_url = image_url;
        Ok(())
    }

    /// Deletes an entry. Deleting a character sheet also drops any map
    /// connection that still names it, which only older files can carry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the entry does not exist.
    pub fn delete_entry(&mut self, kind: QuestionnaireKind, entry_id: &str) -> Result<(), DomainError> {
        let entries = self.entries_mut(kind);
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        if entries.len() == before {
            return Err(DomainError::not_found("questionnaire entry", entry_id));
        }
        if kind == QuestionnaireKind::Characters {
            self.character_map_connections
                .retain(|c| !c.touches(entry_id));
        }
        Ok(())
    }

    /// Adds a custom question to one entry and returns the new field id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the label is blank, or
    /// `DomainError::EntityNotFound` if the entry does not exist.
    pub fn add_custom_question(
        &mut self,
        kind: QuestionnaireKind,
        entry_id: &str,
        label: &str,
        ids: &dyn IdGenerator,
    ) -> Result<String, DomainError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(DomainError::Validation(
                "custom question label must not be empty".to_owned(),
            ));
        }
        let entry = self.entry_mut(kind, entry_id)?;
        let field = CustomField {
            id: ids.next_id("custom"),
            label: label.to_owned(),
        };
        let field_id = field.id.clone();
        entry.custom_fields.push(field);
        Ok(field_id)
    }

    /// Removes a custom question together with its answer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the entry or the field does
    /// not exist.
    pub fn remove_custom_question(
        &mut self,
        kind: QuestionnaireKind,
        entry_id: &str,
        field_id: &str,
    ) -> Result<(), DomainError> {
        let entry = self.entry_mut(kind, entry_id)?;
        if !entry.is_custom_field(field_id) {
            return Err(DomainError::not_found("custom question", field_id));
        }
        entry.custom_fields.retain(|f| f.id != field_id);
        entry.data.remove(field_id);
        Ok(())
    }

    /// Places a new character on the map and returns its id.
    pub fn add_node(&mut self, ids: &dyn IdGenerator) -> String {
        let node = CharacterMapNode {
            id: ids.next_id("node"),
            name: DEFAULT_NODE_NAME.to_owned(),
            x: NEW_NODE_X,
            y: NEW_NODE_Y,
            image_url: None,
        };
        let id = node.id.clone();
        self.character_map_nodes.push(node);
        id
    }

    fn node_mut(&mut self, node_id: &str) -> Result<&mut CharacterMapNode, DomainError> {
        self.character_map_nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| DomainError::not_found("map node", node_id))
    }

    /// Moves a node on the canvas.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the node does not exist.
    pub fn move_node(&mut self, node_id: &str, x: f64, y: f64) -> Result<(), DomainError> {
        let node = self.node_mut(node_id)?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    /// Renames a node.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the node does not exist.
    pub fn rename_node(&mut self, node_id: &str, name: String) -> Result<(), DomainError> {
        self.node_mut(node_id)?.name = name;
        Ok(())
    }

    /// Attaches or clears a node portrait.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the node does not exist.
    pub fn set_node_image(
        &mut self,
        node_id: &str,
        image_url: Option<String>,
    ) -> Result<(), DomainError> {
        self.node_mut(node_id)?.image_url = image_url;
        Ok(())
    }

    /// Removes a node and every connection that touches it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the node does not exist.
    pub fn remove_node(&mut self, node_id: &str) -> Result<(), DomainError> {
        let before = self.character_map_nodes.len();
        self.character_map_nodes.retain(|n| n.id != node_id);
        if self.character_map_nodes.len() == before {
            return Err(DomainError::not_found("map node", node_id));
        }
        self.character_map_connections.retain(|c| !c.touches(node_id));
        Ok(())
    }

    fn has_map_node(&self, id: &str) -> bool {
        self.character_map_nodes.iter().any(|n| n.id == id)
    }

    /// Connects two map nodes and returns the connection id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for self-links and for pairs that
    /// are already connected (in either direction), and
    /// `DomainError::EntityNotFound` for unknown endpoints.
    pub fn connect(
        &mut self,
        from_id: &str,
        to_id: &str,
        ids: &dyn IdGenerator,
    ) -> Result<String, DomainError> {
        if from_id == to_id {
            return Err(DomainError::Validation(
                "a character cannot be connected to itself".to_owned(),
            ));
        }
        for endpoint in [from_id, to_id] {
            if !self.has_map_node(endpoint) {
                return Err(DomainError::not_found("map node", endpoint));
            }
        }
        if self
            .character_map_connections
            .iter()
            .any(|c| c.links(from_id, to_id))
        {
            return Err(DomainError::Validation(format!(
                "{from_id} and {to_id} are already connected"
            )));
        }
        let connection = CharacterMapConnection {
            id: ids.next_id("conn"),
            from_id: from_id.to_owned(),
            to_id: to_id.to_owned(),
            description: DEFAULT_CONNECTION_DESCRIPTION.to_owned(),
        };
        let id = connection.id.clone();
        self.character_map_connections.push(connection);
        Ok(id)
    }

    /// Replaces the description of a connection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the connection does not exist.
    pub fn describe_connection(
        &mut self,
        connection_id: &str,
        description: String,
    ) -> Result<(), DomainError> {
        let connection = self
            .character_map_connections
            .iter_mut()
            .find(|c| c.id == connection_id)
            .ok_or_else(|| DomainError::not_found("connection", connection_id))?;
        connection.description = description;
        Ok(())
    }

    /// Removes a connection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntityNotFound` if the connection does not exist.
    pub fn remove_connection(&mut self, connection_id: &str) -> Result<(), DomainError> {
        let before = self.character_map_connections.len();
        self.character_map_connections
            .retain(|c| c.id != connection_id);
        if self.character_map_connections.len() == before {
            return Err(DomainError::not_found("connection", connection_id));
        }
        Ok(())
    }
}
