//! The library repository: the ordered collection of books, its snapshot
//! format and its persistence.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storylines_core::clock::Clock;
use storylines_core::error::DomainError;
use storylines_core::id::IdGenerator;
use storylines_core::repository::SnapshotStore;
use tracing::{debug, error, info, warn};

use crate::domain::aggregates::Book;
use crate::domain::defaults::{FIRST_BOOK_TITLE, NEW_BOOK_TITLE};

/// Storage key of the library snapshot.
pub const LIBRARY_KEY: &str = "storylines_books_v3";

/// Storage key of the single-project format that predates books.
pub const LEGACY_PROJECT_KEY: &str = "storylines_project_data_v2";

/// All books of the author, in display order. Never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    /// A library holding only the sample book.
    #[must_use]
    pub fn with_default_book(clock: &dyn Clock, ids: &dyn IdGenerator) -> Self {
        Self {
            books: vec![Book::sample(
                ids.next_id("book"),
                FIRST_BOOK_TITLE.to_owned(),
                clock,
            )],
        }
    }

    /// Returns the books in display order.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Looks up a book.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if no book has this id.
    pub fn book(&self, book_id: &str) -> Result<&Book, DomainError> {
        self.books
            .iter()
            .find(|b| b.id == book_id)
            .ok_or_else(|| DomainError::AggregateNotFound(book_id.to_owned()))
    }

    /// Looks up a book for mutation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if no book has this id.
    pub fn book_mut(&mut self, book_id: &str) -> Result<&mut Book, DomainError> {
        self.books
            .iter_mut()
            .find(|b| b.id == book_id)
            .ok_or_else(|| DomainError::AggregateNotFound(book_id.to_owned()))
    }

    /// Appends an empty book and returns its id.
    pub fn create_book(
        &mut self,
        title: Option<String>,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> String {
        let book = Book::blank(
            ids.next_id("book"),
            title.unwrap_or_else(|| NEW_BOOK_TITLE.to_owned()),
            clock,
            ids,
        );
        let id = book.id.clone();
        self.books.push(book);
        id
    }

    /// Appends an already built book, e.g. one restored from a backup.
    pub fn append_book(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Deletes a book.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the book does not exist and
    /// `DomainError::Validation` if it is the only book left.
    pub fn delete_book(&mut self, book_id: &str) -> Result<(), DomainError> {
        let index = self
            .books
            .iter()
            .position(|b| b.id == book_id)
            .ok_or_else(|| DomainError::AggregateNotFound(book_id.to_owned()))?;
        if self.books.len() <= 1 {
            return Err(DomainError::Validation(
                "the library must keep at least one book".to_owned(),
            ));
        }
        self.books.remove(index);
        Ok(())
    }

    /// Serializes the whole library.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if serialization fails.
    pub fn to_snapshot(&self) -> Result<String, DomainError> {
        serde_json::to_string(self)
            .map_err(|e| DomainError::Infrastructure(format!("library serialization failed: {e}")))
    }

    /// Parses a library snapshot and repairs every book so the ordering
    /// invariants hold.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the snapshot is not a JSON
    /// array of books, or `DomainError::Validation` if it holds no book.
    pub fn from_snapshot(snapshot: &str, ids: &dyn IdGenerator) -> Result<Self, DomainError> {
        let mut library: Self = serde_json::from_str(snapshot).map_err(|e| {
            DomainError::Infrastructure(format!("library deserialization failed: {e}"))
        })?;
        if library.books.is_empty() {
            return Err(DomainError::Validation("library snapshot holds no book".to_owned()));
        }
        for book in &mut library.books {
            let repairs = book.restore_invariants(ids);
            if repairs > 0 {
                warn!(book_id = %book.id, repairs, "Repaired stored book");
            }
        }
        Ok(library)
    }

    /// Converts a single-project snapshot (plotlines, scenes and notes at
    /// top level) into a library of one book.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the snapshot is not a JSON
    /// object with the project fields.
    pub fn from_legacy_project(
        snapshot: &str,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Self, DomainError> {
        let mut project: Value = serde_json::from_str(snapshot).map_err(|e| {
            DomainError::Infrastructure(format!("legacy project deserialization failed: {e}"))
        })?;
        let fields = project.as_object_mut().ok_or_else(|| {
            DomainError::Infrastructure("legacy project is not a JSON object".to_owned())
        })?;
        fields.insert("id".to_owned(), Value::String(ids.next_id("book")));
        fields.insert("title".to_owned(), Value::String(FIRST_BOOK_TITLE.to_owned()));
        fields.insert("lastModified".to_owned(), Value::from(clock.now_millis()));

        let mut book: Book = serde_json::from_value(project).map_err(|e| {
            DomainError::Infrastructure(format!("legacy project deserialization failed: {e}"))
        })?;
        book.restore_invariants(ids);
        Ok(Self { books: vec![book] })
    }
}

/// Loads the library from `store`.
///
/// Falls back to the legacy single-project key when no library was saved,
/// and to the default library when nothing usable is stored. Never fails.
pub async fn load_library(
    store: &dyn SnapshotStore,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Library {
    match store.load(LIBRARY_KEY).await {
        Ok(Some(snapshot)) => match Library::from_snapshot(&snapshot, ids) {
            Ok(library) => {
                info!(books = library.books.len(), "Loaded library");
                return library;
            }
            Err(e) => warn!(error = %e, "Stored library unreadable; starting from default"),
        },
        Ok(None) => match store.load(LEGACY_PROJECT_KEY).await {
            Ok(Some(snapshot)) => match Library::from_legacy_project(&snapshot, clock, ids) {
                Ok(library) => {
                    info!("Migrated legacy project into a one-book library");
                    return library;
                }
                Err(e) => warn!(error = %e, "Legacy project unreadable; starting from default"),
            },
            Ok(None) => debug!("No stored library; starting from default"),
            Err(e) => warn!(error = %e, "Failed to read legacy project; starting from default"),
        },
        Err(e) => warn!(error = %e, "Failed to read library; starting from default"),
    }
    Library::with_default_book(clock, ids)
}

/// Saves the whole library under [`LIBRARY_KEY`]. Failures are logged and
/// swallowed: the in-memory library stays authoritative.
pub async fn persist(library: &Library, store: &dyn SnapshotStore) {
    let result = match library.to_snapshot() {
        Ok(snapshot) => store.save(LIBRARY_KEY, &snapshot).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        error!(error = %e, "Failed to persist library");
    }
}
