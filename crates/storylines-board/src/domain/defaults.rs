//! Seed content for new libraries and books.
//!
//! Copy is in Hebrew, the product's working language.

use super::model::{Plotline, Scene};

/// Title of the book created for a fresh library.
pub const FIRST_BOOK_TITLE: &str = "הספר הראשון שלי";
/// Title used when a book is created without one.
pub const NEW_BOOK_TITLE: &str = "ספר חדש";
/// Title used for imported backups that carry none.
pub const IMPORTED_BOOK_TITLE: &str = "ספר מיובא";
/// Name used when a plotline is created without one.
pub const NEW_PLOTLINE_NAME: &str = "קו חדש";
/// Name of the first plotline of a new book.
pub const MAIN_PLOTLINE_NAME: &str = "עלילה ראשית";
/// Color of the first plotline of a new book.
pub const MAIN_PLOTLINE_COLOR: &str = "#ef4444";
/// Name of the seeded secondary plotline.
pub const SUBPLOT_NAME: &str = "עלילת משנה";
/// Color of the seeded secondary plotline.
pub const SUBPLOT_COLOR: &str = "#3b82f6";

/// The two plotlines of the sample book.
#[must_use]
pub fn sample_plotlines() -> Vec<Plotline> {
    vec![
        Plotline {
            id: "p1".to_owned(),
            name: MAIN_PLOTLINE_NAME.to_owned(),
            color: MAIN_PLOTLINE_COLOR.to_owned(),
        },
        Plotline {
            id: "p2".to_owned(),
            name: SUBPLOT_NAME.to_owned(),
            color: SUBPLOT_COLOR.to_owned(),
        },
    ]
}

/// The three scenes of the sample book, alternating between its plotlines.
#[must_use]
pub fn sample_scenes() -> Vec<Scene> {
    let seed = [
        ("s1", "p1", "התחלה", "הגיבור יוצא לדרך...", true),
        ("s2", "p2", "מזימה", "הנבל מתכנן משהו...", false),
        ("s3", "p1", "מכשול ראשון", "הדרך נחסמת...", false),
    ];
    seed.into_iter()
        .enumerate()
        .map(|(position, (id, plotline_id, title, content, is_completed))| Scene {
            id: id.to_owned(),
            plotline_id: plotline_id.to_owned(),
            title: title.to_owned(),
            content: content.to_owned(),
            position,
            is_completed,
        })
        .collect()
}
