//! Data model definitions for the planner document.
//!
//! This module defines the records persisted by the planner. The root
//! aggregate is [`Document`], which holds every user collection and is
//! written back to storage as one unit after each mutation. [`Theme`] is a
//! separate preference with its own key and lifecycle.
//!
//! Wire names are camelCase (`customWords`, `subjectId`, `createdAt`,
//! `examDate1`) so that backups written by earlier versions of the planner
//! load unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Display name used for notes whose subject has been deleted.
pub const DELETED_SUBJECT_LABEL: &str = "삭제된 과목";

/// The single aggregate holding all user data.
///
/// Every field defaults to empty, so a stored or imported object that lacks
/// a field falls back to the default for that field only.
///
/// ```rust,ignore
/// use study_planner_core::planner_model::Document;
///
/// let doc = Document::default();
/// assert!(doc.subjects.is_empty());
/// assert!(doc.exam_date1.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub subjects: Vec<Subject>,
    pub todos: Vec<Todo>,
    pub notes: Vec<Note>,
    pub custom_words: Vec<CustomWord>,
    pub exam_date1: Option<NaiveDate>,
    pub exam_date2: Option<NaiveDate>,
}

impl Document {
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Resolves the display name for a note's subject, falling back to
    /// [`DELETED_SUBJECT_LABEL`] when the reference dangles.
    pub fn subject_name_for(&self, note: &Note) -> &str {
        self.subject(&note.subject_id)
            .map(|s| s.name.as_str())
            .unwrap_or(DELETED_SUBJECT_LABEL)
    }

    pub fn exam_date(&self, slot: ExamSlot) -> Option<NaiveDate> {
        match slot {
            ExamSlot::First => self.exam_date1,
            ExamSlot::Second => self.exam_date2,
        }
    }

    pub fn set_exam_date(&mut self, slot: ExamSlot, date: Option<NaiveDate>) {
        match slot {
            ExamSlot::First => self.exam_date1 = date,
            ExamSlot::Second => self.exam_date2 = date,
        }
    }
}

/// A study subject and how many review passes have been completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Timestamp-derived unique identifier.
    pub id: String,
    /// Unique among subjects, compared case-insensitively.
    pub name: String,
    /// Completed review passes. Never negative.
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// A mistake note attached to a subject.
///
/// `subject_id` is a weak reference: it is not checked against the subject
/// list and may dangle after the subject is removed by other means than a
/// cascading delete (for example a hand-edited backup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub subject_id: String,
    pub content: String,
    /// Inline `data:` URI, see [`crate::attachment::Attachment`].
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user-defined vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomWord {
    pub id: String,
    pub eng: String,
    pub kor: String,
}

/// A word as shown on the word-of-the-day card. Built-in entries have no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub eng: String,
    pub kor: String,
}

impl From<&CustomWord> for VocabularyWord {
    fn from(word: &CustomWord) -> Self {
        Self {
            eng: word.eng.clone(),
            kor: word.kor.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Which of the two exam countdown slots a date belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamSlot {
    First,
    Second,
}

impl ExamSlot {
    pub fn label(self) -> &'static str {
        match self {
            ExamSlot::First => "시험 1",
            ExamSlot::Second => "시험 2",
        }
    }
}
