//! To-do list transitions.

use serde::{Deserialize, Serialize};

use super::{require, ReduceResult, Reduction};
use crate::planner_model::Todo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TodoAction {
    Add { id: String, text: String },
    Toggle { id: String },
    Delete { id: String },
}

pub fn reduce(todos: &[Todo], action: TodoAction) -> ReduceResult<Vec<Todo>> {
    match action {
        TodoAction::Add { id, text } => {
            let text = require(&text, "할 일")?;
            let mut next = todos.to_vec();
            next.push(Todo {
                id,
                text,
                completed: false,
            });
            Ok(Reduction::changed(next, None))
        }
        TodoAction::Toggle { id } => {
            let Some(pos) = todos.iter().position(|t| t.id == id) else {
                return Ok(Reduction::unchanged(todos.to_vec()));
            };
            let mut next = todos.to_vec();
            next[pos].completed = !next[pos].completed;
            // Only completing a task is celebrated.
            let notice = next[pos].completed.then(|| "할 일 완료!".to_string());
            Ok(Reduction::changed(next, notice))
        }
        TodoAction::Delete { id } => {
            if !todos.iter().any(|t| t.id == id) {
                return Ok(Reduction::unchanged(todos.to_vec()));
            }
            let next = todos.iter().filter(|t| t.id != id).cloned().collect();
            Ok(Reduction::changed(next, Some("할 일이 삭제되었습니다.".to_string())))
        }
    }
}
