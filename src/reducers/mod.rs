//! Pure state transitions for each document collection.
//!
//! A reducer takes the current collection and an action and returns the next
//! collection together with an optional success notice, or a
//! [`ValidationError`] describing why the action was rejected. Reducers never
//! touch storage; the planner writes the resulting document back.
//!
//! Identifiers and timestamps are supplied inside the actions so that every
//! reducer stays deterministic.

pub mod notes;
pub mod subjects;
pub mod todos;
pub mod vocab;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::planner_model::Document;

pub use notes::NoteAction;
pub use subjects::SubjectAction;
pub use todos::TodoAction;
pub use vocab::WordAction;

/// Outcome of a successful reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction<T> {
    pub value: T,
    /// Success message for the notification channel, if the action has one.
    pub notice: Option<String>,
    /// `false` when the action targeted a missing id and nothing changed.
    pub changed: bool,
}

impl<T> Reduction<T> {
    pub(crate) fn changed(value: T, notice: Option<String>) -> Self {
        Self {
            value,
            notice,
            changed: true,
        }
    }

    pub(crate) fn unchanged(value: T) -> Self {
        Self {
            value,
            notice: None,
            changed: false,
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Reduction<U> {
        Reduction {
            value: f(self.value),
            notice: self.notice,
            changed: self.changed,
        }
    }
}

pub type ReduceResult<T> = Result<Reduction<T>, ValidationError>;

/// Any collection action, routed to its reducer by [`apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "collection", rename_all = "camelCase")]
pub enum Action {
    Subject(SubjectAction),
    Todo(TodoAction),
    Note(NoteAction),
    Word(WordAction),
}

/// Applies `action` to a copy of `doc`.
///
/// Deleting a subject also removes every note that references it.
pub fn apply(doc: &Document, action: Action) -> ReduceResult<Document> {
    match action {
        Action::Subject(SubjectAction::Delete { id }) => {
            let reduced = subjects::reduce(&doc.subjects, SubjectAction::Delete { id: id.clone() })?;
            if !reduced.changed {
                return Ok(Reduction::unchanged(doc.clone()));
            }
            let notes = notes::remove_for_subject(&doc.notes, &id);
            Ok(reduced.map(|subjects| Document {
                subjects,
                notes,
                ..doc.clone()
            }))
        }
        Action::Subject(action) => Ok(subjects::reduce(&doc.subjects, action)?.map(|subjects| Document {
            subjects,
            ..doc.clone()
        })),
        Action::Todo(action) => Ok(todos::reduce(&doc.todos, action)?.map(|todos| Document {
            todos,
            ..doc.clone()
        })),
        Action::Note(action) => Ok(notes::reduce(&doc.notes, action)?.map(|notes| Document {
            notes,
            ..doc.clone()
        })),
        Action::Word(action) => Ok(vocab::reduce(&doc.custom_words, action)?.map(|custom_words| Document {
            custom_words,
            ..doc.clone()
        })),
    }
}

fn require(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner_model::{Note, Subject};
    use chrono::{TimeZone, Utc};

    fn note(id: &str, subject_id: &str) -> Note {
        Note {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            content: format!("content {id}"),
            image: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    fn subject(id: &str, name: &str) -> Subject {
        Subject {
            id: id.to_string(),
            name: name.to_string(),
            count: 0,
        }
    }

    #[test]
    fn test_delete_subject_cascades_to_its_notes_only() {
        let doc = Document {
            subjects: vec![subject("s1", "행정법"), subject("s2", "한국사")],
            notes: vec![note("n1", "s1"), note("n2", "s2"), note("n3", "s1"), note("n4", "gone")],
            ..Document::default()
        };

        let out = apply(&doc, Action::Subject(SubjectAction::Delete { id: "s1".into() })).unwrap();

        assert!(out.changed);
        assert_eq!(out.value.subjects, vec![subject("s2", "한국사")]);
        let ids: Vec<_> = out.value.notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n2", "n4"]);
    }

    #[test]
    fn test_delete_missing_subject_keeps_notes() {
        let doc = Document {
            notes: vec![note("n1", "s9")],
            ..Document::default()
        };
        let out = apply(&doc, Action::Subject(SubjectAction::Delete { id: "s9".into() })).unwrap();
        assert!(!out.changed);
        assert_eq!(out.value, doc);
    }

    #[test]
    fn test_action_json_shape() {
        let action: Action = serde_json::from_str(
            r#"{"collection":"todo","type":"toggle","id":"42"}"#,
        )
        .unwrap();
        assert_eq!(action, Action::Todo(TodoAction::Toggle { id: "42".into() }));
    }
}
