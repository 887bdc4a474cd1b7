//! Questionnaire entries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Answer key holding a character's grammatical gender (`"female"`/`"male"`).
pub const GENDER_KEY: &str = "gender";
/// Answer key holding a place's scale (`"macro"`/`"micro"`).
pub const PLACE_TYPE_KEY: &str = "placeType";

/// The five questionnaire collections a book carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionnaireKind {
    /// Character sheets.
    Characters,
    /// Locations, from planets down to single rooms.
    Places,
    /// Historical or fictional periods.
    Periods,
    /// Plot twists.
    Twists,
    /// Fantasy world building.
    FantasyWorlds,
}

impl QuestionnaireKind {
    /// All kinds, in tab order.
    pub const ALL: [Self; 5] = [
        Self::Characters,
        Self::Places,
        Self::Periods,
        Self::Twists,
        Self::FantasyWorlds,
    ];

    /// The name given to a freshly created entry.
    #[must_use]
    pub fn default_entry_name(self) -> &'static str {
        match self {
            Self::Characters => "דמות חדשה",
            Self::Places => "מקום חדש",
            Self::Periods => "תקופה חדשה",
            Self::Twists => "טוויסט חדש",
            Self::FantasyWorlds => "עולם פנטזיה חדש",
        }
    }

    /// Answers pre-filled on a freshly created entry.
    #[must_use]
    pub fn default_data(self) -> BTreeMap<String, Value> {
        let mut data = BTreeMap::new();
        match self {
            Self::Characters => {
                data.insert(GENDER_KEY.to_owned(), Value::from("female"));
            }
            Self::Places => {
                data.insert(PLACE_TYPE_KEY.to_owned(), Value::from("macro"));
            }
            Self::Periods | Self::Twists | Self::FantasyWorlds => {}
        }
        data
    }

    /// The wire name, as used in JSON and URLs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Characters => "characters",
            Self::Places => "places",
            Self::Periods => "periods",
            Self::Twists => "twists",
            Self::FantasyWorlds => "fantasyWorlds",
        }
    }
}

impl fmt::Display for QuestionnaireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined question added to a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Field identifier; also the key of its answer in `data`.
    pub id: String,
    /// The question text.
    pub label: String,
}

/// One filled-in questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireEntry {
    /// Entry identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Answers keyed by question id.
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
    /// Questions added by the author on top of the built-in catalog.
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    /// Portrait image as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl QuestionnaireEntry {
    /// Creates an entry with the defaults for `kind`.
    #[must_use]
    pub fn new(id: String, kind: QuestionnaireKind) -> Self {
        Self {
            id,
            name: kind.default_entry_name().to_owned(),
            data: kind.default_data(),
            custom_fields: Vec::new(),
            image_url: None,
        }
    }

    /// Returns the answer for `key` rendered as text, if it is non-empty.
    #[must_use]
    pub fn answer_text(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Returns `true` if `key` belongs to one of this entry's custom fields.
    #[must_use]
    pub fn is_custom_field(&self, key: &str) -> bool {
        self.custom_fields.iter().any(|f| f.id == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_character_defaults_to_female() {
        let entry = QuestionnaireEntry::new("q-1".into(), QuestionnaireKind::Characters);

        assert_eq!(entry.name, "דמות חדשה");
        assert_eq!(entry.answer_text(GENDER_KEY).as_deref(), Some("female"));
    }

    #[test]
    fn test_new_place_defaults_to_macro() {
        let entry = QuestionnaireEntry::new("q-1".into(), QuestionnaireKind::Places);

        assert_eq!(entry.answer_text(PLACE_TYPE_KEY).as_deref(), Some("macro"));
    }

    #[test]
    fn test_new_twist_has_no_answers() {
        let entry = QuestionnaireEntry::new("q-1".into(), QuestionnaireKind::Twists);

        assert!(entry.data.is_empty());
    }

    #[test]
    fn test_answer_text_skips_blank_strings() {
        let mut entry = QuestionnaireEntry::new("q-1".into(), QuestionnaireKind::Periods);
        entry.data.insert("era".into(), Value::from("   "));
        entry.data.insert("year".into(), Value::from(1492));

        assert_eq!(entry.answer_text("era"), None);
        assert_eq!(entry.answer_text("year").as_deref(), Some("1492"));
        assert_eq!(entry.answer_text("missing"), None);
    }

    #[test]
    fn test_entry_deserializes_without_optional_collections() {
        let json = r#"{ "id": "q-9", "name": "Ruth" }"#;

        let entry: QuestionnaireEntry = serde_json::from_str(json).unwrap();

        assert!(entry.data.is_empty());
        assert!(entry.custom_fields.is_empty());
        assert!(entry.image_url.is_none());
    }

    #[test]
    fn test_kind_uses_camel_case_wire_names() {
        let json = serde_json::to_string(&QuestionnaireKind::FantasyWorlds).unwrap();

        assert_eq!(json, "\"fantasyWorlds\"");
        assert_eq!(QuestionnaireKind::FantasyWorlds.to_string(), "fantasyWorlds");
    }
}
