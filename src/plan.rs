//! Typed to-do plan and opt-in shape validation.

use serde::Deserialize;
use serde_json::Value;

/// A to-do list as requested from the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TodoPlan {
    pub goal: String,
    pub tasks: Vec<TodoTask>,
}

/// One task with its ordered steps.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TodoTask {
    pub task: String,
    pub steps: Vec<String>,
}

impl TodoPlan {
    pub fn step_count(&self) -> usize {
        self.tasks.iter().map(|t| t.steps.len()).sum()
    }
}

/// Check a decoded value against the to-do shape.
///
/// Extra fields are tolerated; missing or mistyped `goal`, `tasks`, `task`
/// and `steps` are not.
pub fn validate_plan(value: &Value) -> Result<TodoPlan, String> {
    TodoPlan::deserialize(value).map_err(|e| e.to_string())
}
