//! Domain events for the Board context.

use serde::{Deserialize, Serialize};
use storylines_core::event::{DomainEvent, EventMetadata};

/// Event type for `SceneAdded`.
pub const SCENE_ADDED_EVENT_TYPE: &str = "board.scene_added";
/// Event type for `SceneMoved`.
pub const SCENE_MOVED_EVENT_TYPE: &str = "board.scene_moved";
/// Event type for `SceneUpdated`.
pub const SCENE_UPDATED_EVENT_TYPE: &str = "board.scene_updated";
/// Event type for `SceneDeleted`.
pub const SCENE_DELETED_EVENT_TYPE: &str = "board.scene_deleted";
/// Event type for `PlotlineAdded`.
pub const PLOTLINE_ADDED_EVENT_TYPE: &str = "board.plotline_added";
/// Event type for `PlotlineRenamed`.
pub const PLOTLINE_RENAMED_EVENT_TYPE: &str = "board.plotline_renamed";
/// Event type for `PlotlineRecolored`.
pub const PLOTLINE_RECOLORED_EVENT_TYPE: &str = "board.plotline_recolored";
/// Event type for `PlotlineDeleted`.
pub const PLOTLINE_DELETED_EVENT_TYPE: &str = "board.plotline_deleted";
/// Event type for `BookRetitled`.
pub const BOOK_RETITLED_EVENT_TYPE: &str = "book.retitled";
/// Event type for `NotesEdited`.
pub const NOTES_EDITED_EVENT_TYPE: &str = "book.notes_edited";

/// Emitted when a scene is inserted into the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAdded {
    /// The new scene.
    pub scene_id: String,
    /// Its plotline.
    pub plotline_id: String,
    /// The column it landed in.
    pub position: usize,
}

/// Emitted when a scene changes column and/or plotline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMoved {
    /// The moved scene.
    pub scene_id: String,
    /// Plotline before the move.
    pub from_plotline_id: String,
    /// Plotline after the move.
    pub to_plotline_id: String,
    /// Position before the move.
    pub from_position: usize,
    /// Position after the move.
    pub to_position: usize,
}

/// Emitted when scene fields are edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneUpdated {
    /// The edited scene.
    pub scene_id: String,
    /// Wire names of the fields that were set.
    pub fields: Vec<String>,
}

/// Emitted when a single scene is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDeleted {
    /// The deleted scene.
    pub scene_id: String,
    /// The plotline it belonged to.
    pub plotline_id: String,
}

/// Emitted when a plotline is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotlineAdded {
    /// The new plotline.
    pub plotline_id: String,
    /// Its name.
    pub name: String,
    /// Its color.
    pub color: String,
}

/// Emitted when a plotline is renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotlineRenamed {
    /// The plotline.
    pub plotline_id: String,
    /// The new name.
    pub name: String,
}

/// Emitted when a plotline gets a new color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotlineRecolored {
    /// The plotline.
    pub plotline_id: String,
    /// The new color.
    pub color: String,
}

/// Emitted when a plotline and all of its scenes are deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotlineDeleted {
    /// The deleted plotline.
    pub plotline_id: String,
    /// Scenes removed with it.
    pub removed_scene_ids: Vec<String>,
}

/// Emitted when the book title changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRetitled {
    /// The new title.
    pub title: String,
}

/// Emitted when questionnaires or the character map change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesEdited {
    /// The collection that changed, e.g. `characters` or `characterMap`.
    pub section: String,
    /// Id of the entity created by the edit, if any.
    pub created_id: Option<String>,
}

/// Event payload variants for the Board context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BoardEventKind {
    /// A scene has been added.
    SceneAdded(SceneAdded),
    /// A scene has been moved.
    SceneMoved(SceneMoved),
    /// A scene has been edited.
    SceneUpdated(SceneUpdated),
    /// A scene has been deleted.
    SceneDeleted(SceneDeleted),
    /// A plotline has been added.
    PlotlineAdded(PlotlineAdded),
    /// A plotline has been renamed.
    PlotlineRenamed(PlotlineRenamed),
    /// A plotline has been recolored.
    PlotlineRecolored(PlotlineRecolored),
    /// A plotline has been deleted.
    PlotlineDeleted(PlotlineDeleted),
    /// The book has been retitled.
    BookRetitled(BookRetitled),
    /// World-building notes have been edited.
    NotesEdited(NotesEdited),
}

impl BoardEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SceneAdded(_) => SCENE_ADDED_EVENT_TYPE,
            Self::SceneMoved(_) => SCENE_MOVED_EVENT_TYPE,
            Self::SceneUpdated(_) => SCENE_UPDATED_EVENT_TYPE,
            Self::SceneDeleted(_) => SCENE_DELETED_EVENT_TYPE,
            Self::PlotlineAdded(_) => PLOTLINE_ADDED_EVENT_TYPE,
            Self::PlotlineRenamed(_) => PLOTLINE_RENAMED_EVENT_TYPE,
            Self::PlotlineRecolored(_) => PLOTLINE_RECOLORED_EVENT_TYPE,
            Self::PlotlineDeleted(_) => PLOTLINE_DELETED_EVENT_TYPE,
            Self::BookRetitled(_) => BOOK_RETITLED_EVENT_TYPE,
            Self::NotesEdited(_) => NOTES_EDITED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Board context.
#[derive(Debug, Clone)]
pub struct BoardEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: BoardEventKind,
}

impl BoardEvent {
    /// The id of the entity this event created, if it created one.
    #[must_use]
    pub fn created_id(&self) -> Option<&str> {
        match &self.kind {
            BoardEventKind::SceneAdded(e) => Some(&e.scene_id),
            BoardEventKind::PlotlineAdded(e) => Some(&e.plotline_id),
            BoardEventKind::NotesEdited(e) => e.created_id.as_deref(),
            _ => None,
        }
    }
}

impl DomainEvent for BoardEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("BoardEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
