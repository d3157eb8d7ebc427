//! Whole-document backup export and restore.
//!
//! An export is the pretty-printed JSON of the [`Document`]. An import must be
//! a JSON object carrying at least the four collection keys; anything else is
//! refused before the current document is touched. Fields the backup does not
//! carry fall back to their defaults and unknown fields are ignored.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::ImportError;
use crate::planner_model::Document;

pub const BACKUP_MIME_TYPE: &str = "application/json";

/// Keys a backup must contain to be accepted.
pub const REQUIRED_KEYS: [&str; 4] = ["subjects", "todos", "notes", "customWords"];

/// A backup ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

impl BackupFile {
    pub fn as_bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }
}

/// `<app-name>-backup-<YYYY-MM-DD>.json`
pub fn backup_file_name(app_name: &str, date: NaiveDate) -> String {
    format!("{app_name}-backup-{}.json", date.format("%Y-%m-%d"))
}

pub fn export(doc: &Document, app_name: &str, today: NaiveDate) -> Result<BackupFile, serde_json::Error> {
    Ok(BackupFile {
        file_name: backup_file_name(app_name, today),
        mime_type: BACKUP_MIME_TYPE.to_string(),
        contents: serde_json::to_string_pretty(doc)?,
    })
}

/// Validates an uploaded backup and decodes it into a document.
pub fn parse_backup(bytes: &[u8]) -> Result<Document, ImportError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ImportError::NotUtf8)?;
    let value: JsonValue =
        serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;
    validate_shape(&value)?;
    serde_json::from_value(value).map_err(|e| ImportError::Shape(e.to_string()))
}

fn validate_shape(value: &JsonValue) -> Result<(), ImportError> {
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;
    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(ImportError::MissingKey(key));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner_model::{CustomWord, Subject};
    use serde_json::json;

    fn sample() -> Document {
        Document {
            subjects: vec![Subject { id: "1".into(), name: "한국사".into(), count: 3 }],
            custom_words: vec![CustomWord { id: "2".into(), eng: "ubiquitous".into(), kor: "어디에나 있는".into() }],
            exam_date1: NaiveDate::from_ymd_opt(2025, 4, 5),
            ..Document::default()
        }
    }

    #[test]
    fn test_file_name_and_mime() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let file = export(&sample(), "gong-gallery-planner", today).unwrap();
        assert_eq!(file.file_name, "gong-gallery-planner-backup-2024-01-09.json");
        assert_eq!(file.mime_type, "application/json");
        assert!(file.contents.contains("\n  \"subjects\""));
        assert!(file.contents.contains("\"examDate1\": \"2025-04-05\""));
    }

    #[test]
    fn test_export_then_import_is_identity() {
        let doc = sample();
        let file = export(&doc, "app", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();
        assert_eq!(parse_backup(file.as_bytes()).unwrap(), doc);
    }

    #[test]
    fn test_each_required_key_is_enforced() {
        for missing in REQUIRED_KEYS {
            let mut value = json!({"subjects": [], "todos": [], "notes": [], "customWords": []});
            value.as_object_mut().unwrap().remove(missing);
            let bytes = serde_json::to_vec(&value).unwrap();
            assert_eq!(parse_backup(&bytes).unwrap_err(), ImportError::MissingKey(missing));
        }
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let doc = parse_backup(br#"{"subjects":[],"todos":[],"notes":[],"customWords":[],"extra":1}"#).unwrap();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_rejects_non_object_and_garbage() {
        assert_eq!(parse_backup(b"[1,2]").unwrap_err(), ImportError::NotAnObject);
        assert_eq!(parse_backup(b"null").unwrap_err(), ImportError::NotAnObject);
        assert!(matches!(parse_backup(b"{oops").unwrap_err(), ImportError::Malformed(_)));
        assert_eq!(parse_backup(&[0xff, 0xfe]).unwrap_err(), ImportError::NotUtf8);
    }

    #[test]
    fn test_rejects_wrong_field_types() {
        let err = parse_backup(br#"{"subjects":"no","todos":[],"notes":[],"customWords":[]}"#).unwrap_err();
        assert!(matches!(err, ImportError::Shape(_)));
    }

    #[test]
    fn test_accepts_browser_timestamps() {
        let raw = r#"{
            "subjects": [{"id": "1714560000000", "name": "행정법", "count": 2}],
            "todos": [{"id": "1714560000001", "text": "복습", "completed": true}],
            "notes": [{"id": "1714560000002", "subjectId": "1714560000000", "content": "판례", "image": null, "createdAt": "2024-05-01T11:20:00.000Z"}],
            "customWords": [],
            "examDate1": "2024-12-07",
            "examDate2": null
        }"#;
        let doc = parse_backup(raw.as_bytes()).unwrap();
        assert_eq!(doc.notes[0].subject_id, "1714560000000");
        assert_eq!(doc.exam_date1, NaiveDate::from_ymd_opt(2024, 12, 7));
        assert!(doc.todos[0].completed);
    }
}
