//! StoryLines: World-building notes bounded context.
//!
//! Questionnaires about characters, places, periods, twists and fantasy
//! worlds, plus the character relationship map. These collections travel with
//! a book but never influence scene ordering.

pub mod character_map;
pub mod export;
pub mod notes;
pub mod questionnaire;

pub use character_map::{CharacterMapConnection, CharacterMapNode};
pub use notes::WorldbuildingNotes;
pub use questionnaire::{CustomField, QuestionnaireEntry, QuestionnaireKind};
