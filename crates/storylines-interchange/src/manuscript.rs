//! Plain-text manuscript export.

use storylines_board::application::query_handlers::visible_scenes;
use storylines_board::domain::aggregates::Book;
use storylines_worldbuilding::export::safe_file_stem;

const SCENE_SEPARATOR: &str = "\n\n---\n\n";
const COMPLETED_MARK: &str = " [הושלם]";
const FALLBACK_STEM: &str = "my-story";

/// Renders the scenes of `book` in reading order, one `## title` block per
/// scene, restricted to `visible` plotlines when given.
#[must_use]
pub fn render_manuscript(book: &Book, visible: Option<&[String]>) -> String {
    visible_scenes(book, visible)
        .map(|scene| {
            let mark = if scene.is_completed { COMPLETED_MARK } else { "" };
            format!("## {}{mark}\n\n{}", scene.title, scene.content)
        })
        .collect::<Vec<_>>()
        .join(SCENE_SEPARATOR)
}

/// File name for the manuscript of a book titled `title`.
#[must_use]
pub fn manuscript_file_name(title: &str) -> String {
    format!("{}.txt", safe_file_stem(title, FALLBACK_STEM))
}
