//! Prompt construction for the to-do planner.

/// Build the planning prompt for a goal.
///
/// The goal is interpolated verbatim; quotes or braces inside it are not
/// escaped. The output is deterministic for a given goal.
pub fn build_prompt(goal: &str) -> String {
    format!(
        r#"
You are an AI task planner.

Break down the following goal into a structured to-do list with steps.

Respond ONLY in pure JSON in this format:

{{
  "goal": "...",
  "tasks": [
    {{
      "task": "...",
      "steps": ["...", "..."]
    }}
  ]
}}

Goal: "{goal}"
Return only valid JSON, no explanation.
"#
    )
}
