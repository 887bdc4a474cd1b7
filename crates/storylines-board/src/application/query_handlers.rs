//! Query handlers for the Board context.
//!
//! Read-only view DTOs built from the in-memory library.

use std::collections::HashSet;

use serde::Serialize;
use storylines_core::error::DomainError;

use super::library::Library;
use crate::domain::aggregates::Book;
use crate::domain::model::Scene;

/// Summary of one book for the library switcher.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummaryView {
    /// The book identifier.
    pub id: String,
    /// The book title.
    pub title: String,
    /// Last modification time in milliseconds since the epoch.
    pub last_modified: i64,
    /// Number of plotlines.
    pub plotline_count: usize,
    /// Number of scenes.
    pub scene_count: usize,
    /// Number of scenes marked as finished.
    pub completed_count: usize,
}

/// One cell of the board grid.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSlotView {
    /// Global column index.
    pub position: usize,
    /// The scene in this cell, or `None` for an "add here" slot.
    pub scene: Option<Scene>,
}

/// One row of the board grid.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRowView {
    /// The plotline of this row.
    pub plotline_id: String,
    /// Plotline name.
    pub name: String,
    /// Plotline color.
    pub color: String,
    /// `column_count` cells, one per column.
    pub slots: Vec<BoardSlotView>,
}

/// The board grid: one row per plotline, one column per scene plus a
/// trailing column for appending.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    /// The book identifier.
    pub book_id: String,
    /// The book title.
    pub title: String,
    /// Scene count plus one.
    pub column_count: usize,
    /// Rows in plotline display order.
    pub rows: Vec<BoardRowView>,
}

/// One scene of the continuous manuscript.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManuscriptEntryView {
    /// One-based reading index among the visible scenes.
    pub index: usize,
    /// The scene identifier.
    pub scene_id: String,
    /// Scene title.
    pub title: String,
    /// Manuscript text.
    pub content: String,
    /// Whether the scene is finished.
    pub is_completed: bool,
    /// The scene's plotline.
    pub plotline_id: String,
    /// Name of the scene's plotline.
    pub plotline_name: String,
    /// Color of the scene's plotline.
    pub plotline_color: String,
}

/// The manuscript in reading order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManuscriptView {
    /// The book identifier.
    pub book_id: String,
    /// The book title.
    pub title: String,
    /// Visible scenes in position order.
    pub entries: Vec<ManuscriptEntryView>,
}

/// Lists every book of the library.
#[must_use]
pub fn list_books(library: &Library) -> Vec<BookSummaryView> {
    library
        .books()
        .iter()
        .map(|book| BookSummaryView {
            id: book.id.clone(),
            title: book.title().to_owned(),
            last_modified: book.last_modified(),
            plotline_count: book.plotlines().len(),
            scene_count: book.scenes().len(),
            completed_count: book.scenes().iter().filter(|s| s.is_completed).count(),
        })
        .collect()
}

/// Builds the board grid of a book.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the book does not exist.
pub fn get_board(library: &Library, book_id: &str) -> Result<BoardView, DomainError> {
    let book = library.book(book_id)?;
    let column_count = book.scenes().len() + 1;
    let rows = book
        .plotlines()
        .iter()
        .map(|plotline| BoardRowView {
            plotline_id: plotline.id.clone(),
            name: plotline.name.clone(),
            color: plotline.color.clone(),
            slots: (0..column_count)
                .map(|position| BoardSlotView {
                    position,
                    scene: book.scene_at(&plotline.id, position).cloned(),
                })
                .collect(),
        })
        .collect();
    Ok(BoardView {
        book_id: book.id.clone(),
        title: book.title().to_owned(),
        column_count,
        rows,
    })
}

/// Scenes of `book` in position order, restricted to `visible` plotlines
/// when given.
pub fn visible_scenes<'a>(
    book: &'a Book,
    visible: Option<&'a [String]>,
) -> impl Iterator<Item = &'a Scene> + 'a {
    let visible: Option<HashSet<&str>> =
        visible.map(|ids| ids.iter().map(String::as_str).collect());
    book.scenes().iter().filter(move |scene| {
        visible
            .as_ref()
            .is_none_or(|ids| ids.contains(scene.plotline_id.as_str()))
    })
}

/// Builds the manuscript of a book.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the book does not exist.
pub fn get_manuscript(
    library: &Library,
    book_id: &str,
    visible: Option<&[String]>,
) -> Result<ManuscriptView, DomainError> {
    let book = library.book(book_id)?;
    let entries = visible_scenes(book, visible)
        .enumerate()
        .map(|(offset, scene)| {
            let plotline = book.plotline(&scene.plotline_id);
            ManuscriptEntryView {
                index: offset + 1,
                scene_id: scene.id.clone(),
                title: scene.title.clone(),
                content: scene.content.clone(),
                is_completed: scene.is_completed,
                plotline_id: scene.plotline_id.clone(),
                plotline_name: plotline.map(|p| p.name.clone()).unwrap_or_default(),
                plotline_color: plotline.map(|p| p.color.clone()).unwrap_or_default(),
            }
        })
        .collect();
    Ok(ManuscriptView {
        book_id: book.id.clone(),
        title: book.title().to_owned(),
        entries,
    })
}
