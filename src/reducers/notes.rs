//! Mistake note transitions, plus the read-side helpers the note list uses
//! (newest-first ordering and search).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ReduceResult, Reduction};
use crate::attachment::Attachment;
use crate::error::ValidationError;
use crate::planner_model::{Document, Note};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NoteAction {
    Add {
        id: String,
        subject_id: String,
        content: String,
        #[serde(default)]
        image: Option<String>,
        created_at: DateTime<Utc>,
    },
    Update {
        id: String,
        subject_id: String,
        content: String,
        #[serde(default)]
        image: Option<String>,
    },
    Delete {
        id: String,
    },
}

pub fn reduce(notes: &[Note], action: NoteAction) -> ReduceResult<Vec<Note>> {
    match action {
        NoteAction::Add {
            id,
            subject_id,
            content,
            image,
            created_at,
        } => {
            validate(&subject_id, &content, image.as_deref())?;
            let mut next = Vec::with_capacity(notes.len() + 1);
            next.push(Note {
                id,
                subject_id,
                content,
                image,
                created_at,
            });
            next.extend_from_slice(notes);
            Ok(Reduction::changed(next, Some("노트가 저장되었습니다.".to_string())))
        }
        NoteAction::Update {
            id,
            subject_id,
            content,
            image,
        } => {
            let Some(pos) = notes.iter().position(|n| n.id == id) else {
                return Ok(Reduction::unchanged(notes.to_vec()));
            };
            validate(&subject_id, &content, image.as_deref())?;
            let mut next = notes.to_vec();
            let note = &mut next[pos];
            note.subject_id = subject_id;
            note.content = content;
            note.image = image;
            Ok(Reduction::changed(next, Some("노트가 수정되었습니다.".to_string())))
        }
        NoteAction::Delete { id } => {
            if !notes.iter().any(|n| n.id == id) {
                return Ok(Reduction::unchanged(notes.to_vec()));
            }
            let next = notes.iter().filter(|n| n.id != id).cloned().collect();
            Ok(Reduction::changed(next, Some("노트가 삭제되었습니다.".to_string())))
        }
    }
}

fn validate(subject_id: &str, content: &str, image: Option<&str>) -> Result<(), ValidationError> {
    if subject_id.trim().is_empty() || content.trim().is_empty() {
        return Err(ValidationError::IncompleteNote);
    }
    if let Some(uri) = image {
        Attachment::from_data_uri(uri)?;
    }
    Ok(())
}

/// Notes whose subject is `subject_id` are dropped; all others are kept in
/// their original order.
pub fn remove_for_subject(notes: &[Note], subject_id: &str) -> Vec<Note> {
    notes
        .iter()
        .filter(|n| n.subject_id != subject_id)
        .cloned()
        .collect()
}

/// Notes ordered by creation time, newest first.
pub fn newest_first(notes: &[Note]) -> Vec<&Note> {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Case-insensitive search over note content and the resolved subject name
/// (notes of a deleted subject match its fallback label), newest first. An empty term matches every note.
pub fn search<'a>(doc: &'a Document, term: &str) -> Vec<&'a Note> {
    let term = term.to_lowercase();
    newest_first(&doc.notes)
        .into_iter()
        .filter(|note| {
            doc.subject_name_for(note).to_lowercase().contains(&term)
                || note.content.to_lowercase().contains(&term)
        })
        .collect()
}
