//! Plain-text export of a single questionnaire entry.

use std::fmt::Write as _;

use crate::questionnaire::{GENDER_KEY, PLACE_TYPE_KEY, QuestionnaireEntry, QuestionnaireKind};

const RULE: &str = "-----------------------------------";
const EMPTY_ANSWER: &str = "---";

fn kind_label(kind: QuestionnaireKind, entry: &QuestionnaireEntry) -> &'static str {
    match kind {
        QuestionnaireKind::Characters => {
            if entry.answer_text(GENDER_KEY).as_deref() == Some("male") {
                "זכר"
            } else {
                "נקבה"
            }
        }
        QuestionnaireKind::Places => {
            if entry.answer_text(PLACE_TYPE_KEY).as_deref() == Some("micro") {
                "מקום ספציפי"
            } else {
                "מיקום גאוגרפי"
            }
        }
        QuestionnaireKind::Periods => "תקופה",
        QuestionnaireKind::Twists => "טוויסט",
        QuestionnaireKind::FantasyWorlds => "עולם פנטזיה",
    }
}

/// Renders an entry as a plain-text sheet.
///
/// Built-in answers come first in key order, then the author's custom
/// questions in the order they were added.
#[must_use]
pub fn render_entry(kind: QuestionnaireKind, entry: &QuestionnaireEntry) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "שאלון: {}", entry.name);
    let _ = writeln!(text, "סוג: {}", kind_label(kind, entry));
    let _ = writeln!(text, "{RULE}\n");

    for key in entry.data.keys() {
        if key == GENDER_KEY || key == PLACE_TYPE_KEY || entry.is_custom_field(key) {
            continue;
        }
        let answer = entry.answer_text(key);
        let _ = writeln!(text, "{key}\n{}\n", answer.as_deref().unwrap_or(EMPTY_ANSWER));
    }

    if !entry.custom_fields.is_empty() {
        let _ = writeln!(text, "\nשאלות נוספות:\n{RULE}");
        for field in &entry.custom_fields {
            let answer = entry.answer_text(&field.id);
            let _ = writeln!(
                text,
                "{}\n{}\n",
                field.label,
                answer.as_deref().unwrap_or(EMPTY_ANSWER)
            );
        }
    }

    text
}

/// Turns a display name into something safe to use as a file name stem,
/// using `fallback` when nothing is left.
#[must_use]
pub fn safe_file_stem(name: &str, fallback: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            other => other,
        })
        .collect();
    if stem.is_empty() {
        fallback.to_owned()
    } else {
        stem
    }
}

/// File name for an exported entry, e.g. `Ruth-characters-export.txt`.
#[must_use]
pub fn entry_file_name(kind: QuestionnaireKind, entry: &QuestionnaireEntry) -> String {
    let stem = safe_file_stem(&entry.name, "entry");
    format!("{stem}-{kind}-export.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::CustomField;
    use serde_json::Value;

    fn ruth() -> QuestionnaireEntry {
        let mut entry = QuestionnaireEntry::new("q-1".into(), QuestionnaireKind::Characters);
        entry.name = "Ruth".into();
        entry.data.insert("age".into(), Value::from("31"));
        entry.data.insert("goal".into(), Value::from(""));
        entry.custom_fields.push(CustomField {
            id: "custom-1".into(),
            label: "Favourite song?".into(),
        });
        entry
    }

    #[test]
    fn test_render_entry_lists_answers_and_custom_questions() {
        let text = render_entry(QuestionnaireKind::Characters, &ruth());

        assert!(text.starts_with("שאלון: Ruth\nסוג: נקבה\n"));
        assert!(text.contains("age\n31\n\n"));
        assert!(text.contains("goal\n---\n\n"));
        assert!(text.contains("שאלות נוספות:"));
        assert!(text.contains("Favourite song?\n---\n\n"));
        assert!(!text.contains("gender"));
    }

    #[test]
    fn test_render_entry_without_custom_fields_has_no_extra_section() {
        let entry = QuestionnaireEntry::new("q-2".into(), QuestionnaireKind::Twists);

        let text = render_entry(QuestionnaireKind::Twists, &entry);

        assert!(text.contains("סוג: טוויסט"));
        assert!(!text.contains("שאלות נוספות"));
    }

    #[test]
    fn test_micro_place_label() {
        let mut entry = QuestionnaireEntry::new("q-3".into(), QuestionnaireKind::Places);
        entry.data.insert(PLACE_TYPE_KEY.into(), Value::from("micro"));

        let text = render_entry(QuestionnaireKind::Places, &entry);

        assert!(text.contains("סוג: מקום ספציפי"));
    }

    #[test]
    fn test_entry_file_name_replaces_path_separators() {
        let mut entry = ruth();
        entry.name = "Ruth/Naomi".into();

        assert_eq!(
            entry_file_name(QuestionnaireKind::Characters, &entry),
            "Ruth_Naomi-characters-export.txt"
        );
    }
}
