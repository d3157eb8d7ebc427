//! Custom vocabulary transitions. New words go to the front of the list.

use serde::{Deserialize, Serialize};

use super::{require, ReduceResult, Reduction};
use crate::planner_model::CustomWord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WordAction {
    Add { id: String, eng: String, kor: String },
    Delete { id: String },
}

pub fn reduce(words: &[CustomWord], action: WordAction) -> ReduceResult<Vec<CustomWord>> {
    match action {
        WordAction::Add { id, eng, kor } => {
            let eng = require(&eng, "영어 단어")?;
            let kor = require(&kor, "한글 뜻")?;
            let mut next = Vec::with_capacity(words.len() + 1);
            next.push(CustomWord { id, eng, kor });
            next.extend_from_slice(words);
            Ok(Reduction::changed(next, Some("단어가 추가되었습니다.".to_string())))
        }
        WordAction::Delete { id } => {
            if !words.iter().any(|w| w.id == id) {
                return Ok(Reduction::unchanged(words.to_vec()));
            }
            let next = words.iter().filter(|w| w.id != id).cloned().collect();
            Ok(Reduction::changed(next, Some("단어가 삭제되었습니다.".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn add(words: &[CustomWord], id: &str, eng: &str, kor: &str) -> Vec<CustomWord> {
        reduce(
            words,
            WordAction::Add {
                id: id.into(),
                eng: eng.into(),
                kor: kor.into(),
            },
        )
        .unwrap()
        .value
    }

    #[test]
    fn test_add_prepends() {
        let words = add(&[], "w1", "diligent", "부지런한");
        let words = add(&words, "w2", "ubiquitous", "어디에나 있는");
        assert_eq!(words[0].eng, "ubiquitous");
        assert_eq!(words[1].eng, "diligent");
    }

    #[test]
    fn test_add_requires_both_sides() {
        let err = reduce(
            &[],
            WordAction::Add { id: "w1".into(), eng: "word".into(), kor: " ".into() },
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("한글 뜻"));
    }

    #[test]
    fn test_delete() {
        let words = add(&[], "w1", "diligent", "부지런한");
        let out = reduce(&words, WordAction::Delete { id: "w1".into() }).unwrap();
        assert!(out.value.is_empty());
    }
}
