//! Subject list transitions: add, rename, delete, and review counting.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{require, ReduceResult, Reduction};
use crate::error::ValidationError;
use crate::planner_model::Subject;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SubjectAction {
    Add { id: String, name: String },
    Rename { id: String, name: String },
    Delete { id: String },
    Increment { id: String },
    Decrement { id: String },
}

pub fn reduce(subjects: &[Subject], action: SubjectAction) -> ReduceResult<Vec<Subject>> {
    match action {
        SubjectAction::Add { id, name } => add(subjects, id, &name),
        SubjectAction::Rename { id, name } => rename(subjects, &id, &name),
        SubjectAction::Delete { id } => delete(subjects, &id),
        SubjectAction::Increment { id } => increment(subjects, &id),
        SubjectAction::Decrement { id } => decrement(subjects, &id),
    }
}

fn name_taken(subjects: &[Subject], name: &str, except: Option<&str>) -> bool {
    let wanted = name.to_lowercase();
    subjects
        .iter()
        .filter(|s| Some(s.id.as_str()) != except)
        .any(|s| s.name.to_lowercase() == wanted)
}

fn add(subjects: &[Subject], id: String, name: &str) -> ReduceResult<Vec<Subject>> {
    let name = require(name, "과목 이름")?;
    if name_taken(subjects, &name, None) {
        debug!("Rejected duplicate subject '{name}'");
        return Err(ValidationError::DuplicateSubject);
    }

    let mut next = subjects.to_vec();
    next.push(Subject { id, name, count: 0 });
    Ok(Reduction::changed(next, Some("과목이 추가되었습니다.".to_string())))
}

fn rename(subjects: &[Subject], id: &str, name: &str) -> ReduceResult<Vec<Subject>> {
    let Some(current) = subjects.iter().find(|s| s.id == id) else {
        return Ok(Reduction::unchanged(subjects.to_vec()));
    };
    let name = require(name, "과목 이름")?;
    if current.name == name {
        return Ok(Reduction::unchanged(subjects.to_vec()));
    }
    if name_taken(subjects, &name, Some(id)) {
        debug!("Rejected rename of {id} to duplicate '{name}'");
        return Err(ValidationError::DuplicateSubjectRename);
    }

    let next = subjects
        .iter()
        .map(|s| {
            if s.id == id {
                Subject { name: name.clone(), ..s.clone() }
            } else {
                s.clone()
            }
        })
        .collect();
    Ok(Reduction::changed(next, Some("과목 이름이 수정되었습니다.".to_string())))
}

fn delete(subjects: &[Subject], id: &str) -> ReduceResult<Vec<Subject>> {
    if !subjects.iter().any(|s| s.id == id) {
        return Ok(Reduction::unchanged(subjects.to_vec()));
    }
    let next = subjects.iter().filter(|s| s.id != id).cloned().collect();
    Ok(Reduction::changed(next, Some("과목이 삭제되었습니다.".to_string())))
}

fn increment(subjects: &[Subject], id: &str) -> ReduceResult<Vec<Subject>> {
    let Some(pos) = subjects.iter().position(|s| s.id == id) else {
        return Ok(Reduction::unchanged(subjects.to_vec()));
    };
    let mut next = subjects.to_vec();
    let subject = &mut next[pos];
    subject.count = subject.count.saturating_add(1);
    let notice = format!("{} {}회독 완료!", subject.name, subject.count);
    Ok(Reduction::changed(next, Some(notice)))
}

fn decrement(subjects: &[Subject], id: &str) -> ReduceResult<Vec<Subject>> {
    let Some(pos) = subjects.iter().position(|s| s.id == id) else {
        return Ok(Reduction::unchanged(subjects.to_vec()));
    };
    if subjects[pos].count == 0 {
        return Err(ValidationError::CountBelowZero);
    }
    let mut next = subjects.to_vec();
    next[pos].count -= 1;
    Ok(Reduction::changed(next, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_action(id: &str, name: &str) -> SubjectAction {
        SubjectAction::Add {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn seeded() -> Vec<Subject> {
        let out = reduce(&[], add_action("1", "History")).unwrap();
        reduce(&out.value, add_action("2", "행정법")).unwrap().value
    }

    #[test]
    fn test_add_trims_and_appends() {
        let out = reduce(&seeded(), add_action("3", "  Math  ")).unwrap();
        assert!(out.changed);
        assert_eq!(out.value.last().map(|s| s.name.as_str()), Some("Math"));
        assert_eq!(out.value.last().map(|s| s.count), Some(0));
        assert_eq!(out.notice.as_deref(), Some("과목이 추가되었습니다."));
    }

    #[test]
    fn test_add_rejects_case_insensitive_duplicate() {
        let before = seeded();
        let err = reduce(&before, add_action("3", "HISTORY")).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateSubject);
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let err = reduce(&[], add_action("1", "   ")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("과목 이름"));
    }

    #[test]
    fn test_rename() {
        let out = reduce(
            &seeded(),
            SubjectAction::Rename { id: "1".into(), name: "World History".into() },
        )
        .unwrap();
        assert_eq!(out.value[0].name, "World History");
        assert_eq!(out.value[1].name, "행정법");
    }

    #[test]
    fn test_rename_to_other_subjects_name_rejected() {
        let err = reduce(
            &seeded(),
            SubjectAction::Rename { id: "2".into(), name: "history".into() },
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateSubjectRename);
    }

    #[test]
    fn test_rename_own_case_change_allowed() {
        let out = reduce(
            &seeded(),
            SubjectAction::Rename { id: "1".into(), name: "HISTORY".into() },
        )
        .unwrap();
        assert!(out.changed);
        assert_eq!(out.value[0].name, "HISTORY");
    }

    #[test]
    fn test_rename_missing_id_is_noop() {
        let before = seeded();
        let out = reduce(
            &before,
            SubjectAction::Rename { id: "99".into(), name: "Other".into() },
        )
        .unwrap();
        assert!(!out.changed);
        assert_eq!(out.value, before);
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let before = seeded();
        let out = reduce(
            &before,
            SubjectAction::Rename { id: "1".into(), name: "  History ".into() },
        )
        .unwrap();
        assert!(!out.changed);
        assert!(out.notice.is_none());
        assert_eq!(out.value, before);
    }

    #[test]
    fn test_rename_missing_id_ignores_blank_name() {
        let before = seeded();
        let out = reduce(&before, SubjectAction::Rename { id: "99".into(), name: "   ".into() }).unwrap();
        assert!(!out.changed);

        let err = reduce(&before, SubjectAction::Rename { id: "1".into(), name: "   ".into() }).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("과목 이름"));
    }

    #[test]
    fn test_increment_and_decrement() {
        let once = reduce(&seeded(), SubjectAction::Increment { id: "1".into() }).unwrap();
        assert_eq!(once.notice.as_deref(), Some("History 1회독 완료!"));
        let twice = reduce(&once.value, SubjectAction::Increment { id: "1".into() }).unwrap();
        assert_eq!(twice.value[0].count, 2);

        let back = reduce(&twice.value, SubjectAction::Decrement { id: "1".into() }).unwrap();
        assert_eq!(back.value[0].count, 1);
        assert!(back.notice.is_none());
    }

    #[test]
    fn test_decrement_at_zero_rejected() {
        let err = reduce(&seeded(), SubjectAction::Decrement { id: "2".into() }).unwrap_err();
        assert_eq!(err, ValidationError::CountBelowZero);
    }

    #[test]
    fn test_delete() {
        let out = reduce(&seeded(), SubjectAction::Delete { id: "1".into() }).unwrap();
        assert_eq!(out.value.len(), 1);
        assert_eq!(out.value[0].id, "2");
    }
}
