//! Commands for the Board context.

use serde::Deserialize;
use serde_json::Value;
use storylines_worldbuilding::QuestionnaireKind;
use uuid::Uuid;

use super::model::{SceneDraft, ScenePatch};

/// Command to create a new book in the library.
#[derive(Debug, Clone)]
pub struct CreateBook {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Title; a default is used when absent.
    pub title: Option<String>,
}

/// Command to change a book's title.
#[derive(Debug, Clone)]
pub struct RetitleBook {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The book to retitle.
    pub book_id: String,
    /// The new title.
    pub title: String,
}

/// Command to delete a book.
#[derive(Debug, Clone)]
pub struct DeleteBook {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The book to delete.
    pub book_id: String,
}

/// Command to append a plotline.
#[derive(Debug, Clone)]
pub struct AddPlotline {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// Name; a default is used when absent.
    pub name: Option<String>,
}

/// Command to rename a plotline.
#[derive(Debug, Clone)]
pub struct RenamePlotline {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The plotline to rename.
    pub plotline_id: String,
    /// The new name.
    pub name: String,
}

/// Command to recolor a plotline.
#[derive(Debug, Clone)]
pub struct RecolorPlotline {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The plotline to recolor.
    pub plotline_id: String,
    /// The new CSS color.
    pub color: String,
}

/// Command to delete a plotline together with its scenes.
#[derive(Debug, Clone)]
pub struct DeletePlotline {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The plotline to delete.
    pub plotline_id: String,
}

/// Command to insert an empty scene.
#[derive(Debug, Clone)]
pub struct AddScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The plotline the scene joins.
    pub plotline_id: String,
    /// Column to insert at; appends when absent.
    pub at_position: Option<usize>,
}

/// Command to append several scenes to one plotline, in order.
#[derive(Debug, Clone)]
pub struct AddScenes {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The plotline the scenes join.
    pub plotline_id: String,
    /// Titles and contents of the new scenes.
    pub drafts: Vec<SceneDraft>,
}

/// Command to move a scene to another column and/or plotline.
#[derive(Debug, Clone)]
pub struct MoveScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The scene to move.
    pub scene_id: String,
    /// Destination index among the remaining scenes.
    pub target_index: usize,
    /// Destination plotline.
    pub target_plotline_id: String,
}

/// Command to edit scene fields.
#[derive(Debug, Clone)]
pub struct UpdateScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The scene to edit.
    pub scene_id: String,
    /// The fields to replace.
    pub patch: ScenePatch,
}

/// Command to delete a single scene.
#[derive(Debug, Clone)]
pub struct DeleteScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The scene to delete.
    pub scene_id: String,
}

/// Command to apply one edit to a book's world-building notes.
#[derive(Debug, Clone)]
pub struct EditNotes {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The edit to apply.
    pub edit: NotesEdit,
}

/// A single edit of questionnaires or the character map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NotesEdit {
    AddEntry {
        kind: QuestionnaireKind,
    },
    RenameEntry {
        kind: QuestionnaireKind,
        entry_id: String,
        name: String,
    },
    SetAnswer {
        kind: QuestionnaireKind,
        entry_id: String,
        key: String,
        value: Value,
    },
    SetEntryImage {
        kind: QuestionnaireKind,
        entry_id: String,
        image_url: Option<String>,
    },
    DeleteEntry {
        kind: QuestionnaireKind,
        entry_id: String,
    },
    AddCustomQuestion {
        kind: QuestionnaireKind,
        entry_id: String,
        label: String,
    },
    RemoveCustomQuestion {
        kind: QuestionnaireKind,
        entry_id: String,
        field_id: String,
    },
    AddNode,
    MoveNode {
        node_id: String,
        x: f64,
        y: f64,
    },
    RenameNode {
        node_id: String,
        name: String,
    },
    SetNodeImage {
        node_id: String,
        image_url: Option<String>,
    },
    RemoveNode {
        node_id: String,
    },
    Connect {
        from_id: String,
        to_id: String,
    },
    DescribeConnection {
        connection_id: String,
        description: String,
    },
    RemoveConnection {
        connection_id: String,
    },
}

impl NotesEdit {
    /// The collection this edit touches.
    #[must_use]
    pub fn section(&self) -> &'static str {
        match self {
            Self::AddEntry { kind }
            | Self::RenameEntry { kind, .. }
            | Self::SetAnswer { kind, .. }
            | Self::SetEntryImage { kind, .. }
            | Self::DeleteEntry { kind, .. }
            | Self::AddCustomQuestion { kind, .. }
            | Self::RemoveCustomQuestion { kind, .. } => kind.as_str(),
            _ => "characterMap",
        }
    }
}
