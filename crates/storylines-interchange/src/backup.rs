//! JSON backup files of a single book.

use serde_json::{Map, Value};
use storylines_board::domain::aggregates::Book;
use storylines_board::domain::defaults::IMPORTED_BOOK_TITLE;
use storylines_core::clock::Clock;
use storylines_core::error::DomainError;
use storylines_core::id::IdGenerator;
use storylines_worldbuilding::export::safe_file_stem;
use tracing::warn;

const FALLBACK_STEM: &str = "storylines-backup";

/// Serializes a book as pretty-printed JSON.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if serialization fails.
pub fn export_backup(book: &Book) -> Result<String, DomainError> {
    serde_json::to_string_pretty(book)
        .map_err(|e| DomainError::Infrastructure(format!("backup serialization failed: {e}")))
}

/// File name for the backup of a book titled `title`.
#[must_use]
pub fn backup_file_name(title: &str) -> String {
    format!("{}.json", safe_file_stem(title, FALLBACK_STEM))
}

fn shell(clock: &dyn Clock, ids: &dyn IdGenerator) -> Map<String, Value> {
    let mut shell = Map::new();
    shell.insert("title".to_owned(), Value::from(IMPORTED_BOOK_TITLE));
    for collection in [
        "characters",
        "places",
        "periods",
        "twists",
        "fantasyWorlds",
        "characterMapNodes",
        "characterMapConnections",
    ] {
        shell.insert(collection.to_owned(), Value::Array(Vec::new()));
    }
    shell.insert("id".to_owned(), Value::from(ids.next_id("book")));
    shell.insert("lastModified".to_owned(), Value::from(clock.now_millis()));
    shell
}

fn invalid(reason: impl Into<String>) -> DomainError {
    let reason = reason.into();
    warn!(%reason, "Rejected backup import");
    DomainError::Validation(reason)
}

/// Turns a backup file into a new book.
///
/// The file must be a JSON object with array-valued `plotlines` and
/// `scenes`. Its fields are laid over a fresh shell, so missing collections
/// start empty, and the book always gets a new id and the current time.
/// Scenes are ordered by their stored position.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the text is not JSON, does not have
/// the expected shape, or breaks referential integrity. Nothing is created in
/// that case.
pub fn import_backup(
    text: &str,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<Book, DomainError> {
    let parsed: Value =
        serde_json::from_str(text).map_err(|e| invalid(format!("backup is not valid JSON: {e}")))?;
    let Value::Object(fields) = parsed else {
        return Err(invalid("backup must be a JSON object"));
    };
    for required in ["plotlines", "scenes"] {
        if !fields.get(required).is_some_and(Value::is_array) {
            return Err(invalid(format!("backup must contain a `{required}` array")));
        }
    }

    let mut merged = shell(clock, ids);
    for (key, value) in fields {
        if key != "id" && key != "lastModified" {
            merged.insert(key, value);
        }
    }

    let mut book: Book = serde_json::from_value(Value::Object(merged))
        .map_err(|e| invalid(format!("backup does not describe a book: {e}")))?;
    book.validate().map_err(|e| invalid(e.to_string()))?;
    book.normalize_positions();
    Ok(book)
}
