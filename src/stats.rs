//! Dashboard aggregates. Everything here is recomputed from the document on
//! each call and nothing is stored.

use serde::Serialize;

use crate::planner_model::{Document, Subject, Todo};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTally {
    pub subject_id: String,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_reviews: u64,
    pub completed_todos: usize,
    pub pending_todos: usize,
    /// Completed share of todos in `[0, 1]`.
    pub todo_completion: f64,
    /// `todo_completion` as a rounded whole percentage.
    pub todo_completion_percent: u32,
    pub total_notes: usize,
    pub total_custom_words: usize,
    /// Subjects with at least one review, in list order.
    pub review_distribution: Vec<SubjectTally>,
    /// Subjects with at least one note, most notes first.
    pub notes_by_subject: Vec<SubjectTally>,
}

pub fn total_reviews(subjects: &[Subject]) -> u64 {
    subjects.iter().map(|s| u64::from(s.count)).sum()
}

/// Completed todos over all todos; 0 when there are none.
pub fn todo_completion(todos: &[Todo]) -> f64 {
    if todos.is_empty() {
        return 0.0;
    }
    let done = todos.iter().filter(|t| t.completed).count();
    done as f64 / todos.len() as f64
}

pub fn review_distribution(subjects: &[Subject]) -> Vec<SubjectTally> {
    subjects
        .iter()
        .filter(|s| s.count > 0)
        .map(|s| SubjectTally {
            subject_id: s.id.clone(),
            name: s.name.clone(),
            count: s.count as usize,
        })
        .collect()
}

/// Ties keep subject list order.
pub fn notes_by_subject(doc: &Document) -> Vec<SubjectTally> {
    let mut tallies: Vec<SubjectTally> = doc
        .subjects
        .iter()
        .map(|s| SubjectTally {
            subject_id: s.id.clone(),
            name: s.name.clone(),
            count: doc.notes.iter().filter(|n| n.subject_id == s.id).count(),
        })
        .filter(|t| t.count > 0)
        .collect();
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies
}

pub fn compute(doc: &Document) -> StudyStats {
    let completed_todos = doc.todos.iter().filter(|t| t.completed).count();
    let completion = todo_completion(&doc.todos);
    StudyStats {
        total_reviews: total_reviews(&doc.subjects),
        completed_todos,
        pending_todos: doc.todos.len() - completed_todos,
        todo_completion: completion,
        todo_completion_percent: (completion * 100.0).round() as u32,
        total_notes: doc.notes.len(),
        total_custom_words: doc.custom_words.len(),
        review_distribution: review_distribution(&doc.subjects),
        notes_by_subject: notes_by_subject(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner_model::Note;
    use chrono::Utc;

    fn subject(id: &str, count: u32) -> Subject {
        Subject { id: id.into(), name: format!("subject {id}"), count }
    }

    fn todo(done: bool) -> Todo {
        Todo { id: String::new(), text: "t".into(), completed: done }
    }

    fn note(subject_id: &str) -> Note {
        Note {
            id: String::new(),
            subject_id: subject_id.into(),
            content: "c".into(),
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_document() {
        let stats = compute(&Document::default());
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.todo_completion, 0.0);
        assert_eq!(stats.todo_completion_percent, 0);
        assert!(stats.notes_by_subject.is_empty());
    }

    #[test]
    fn test_totals_and_percentages() {
        let doc = Document {
            subjects: vec![subject("a", 2), subject("b", 0), subject("c", 5)],
            todos: vec![todo(true), todo(false), todo(false)],
            ..Document::default()
        };
        let stats = compute(&doc);
        assert_eq!(stats.total_reviews, 7);
        assert_eq!(stats.completed_todos, 1);
        assert_eq!(stats.pending_todos, 2);
        assert_eq!(stats.todo_completion_percent, 33);
        let names: Vec<_> = stats.review_distribution.iter().map(|t| t.subject_id.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_notes_grouped_and_sorted_descending() {
        let doc = Document {
            subjects: vec![subject("a", 0), subject("b", 0), subject("c", 0)],
            notes: vec![note("b"), note("c"), note("b"), note("deleted"), note("c"), note("c")],
            ..Document::default()
        };
        let tallies = notes_by_subject(&doc);
        let got: Vec<_> = tallies.iter().map(|t| (t.subject_id.as_str(), t.count)).collect();
        assert_eq!(got, vec![("c", 3), ("b", 2)]);
    }
}
