//! StoryLines: Interchange.
//!
//! The files a book leaves the application as: the plain-text manuscript and
//! the JSON backup, plus the import path that turns a backup back into a
//! book.

pub mod backup;
pub mod manuscript;
