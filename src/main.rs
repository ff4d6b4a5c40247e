//! taskplan - CLI entry point.

use std::io::{self, BufRead, IsTerminal};

use anyhow::{Context, Result, bail};
use clap::Parser;
use dialoguer::Input;
use tracing::{debug, warn};

use taskplan::ollama::{OllamaExecutor, check_ollama_installed};
use taskplan::{
    ExtractMode, ExtractOptions, ExtractionResult, ModelConfig, create_todo_plan_until, logging,
};

/// Break a goal into a structured to-do list using a local LLM.
#[derive(Parser, Debug)]
#[command(name = "taskplan")]
#[command(about = "Break a goal into a structured to-do list using a local LLM")]
#[command(version)]
struct Cli {
    /// Goal to plan (prompts interactively when omitted)
    #[arg(short, long)]
    goal: Option<String>,

    /// Model identifier passed to the runtime [env: TASKPLAN_MODEL] [default: llama3.1:latest]
    #[arg(short, long)]
    model: Option<String>,

    /// Model runtime executable [env: TASKPLAN_OLLAMA_BIN] [default: ollama]
    #[arg(long = "ollama-bin")]
    ollama_bin: Option<String>,

    /// Model invocation timeout in seconds [env: TASKPLAN_TIMEOUT] [default: 300]
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// JSON extraction strategy: greedy (first '{' to last '}') or balanced
    #[arg(long, default_value = "greedy")]
    extract: ExtractMode,

    /// Validate the decoded JSON against the to-do list shape
    #[arg(long)]
    strict: bool,

    /// Skip the model runtime installation check
    #[arg(long)]
    skip_check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = ModelConfig::from_env().with_overrides(cli.ollama_bin, cli.model, cli.timeout);
    debug!(?config, "Resolved model configuration");

    // Step 1: Check prerequisites
    if !cli.skip_check {
        check_ollama_installed(&config.executable)
            .await
            .context("A local model runtime is required")?;
    }

    // Step 2: Read the goal
    let goal = match cli.goal {
        Some(goal) => goal,
        None => read_goal().context("Failed to read goal")?,
    };

    // Step 3: Ask the model and extract the plan
    let options = ExtractOptions {
        mode: cli.extract,
        strict: cli.strict,
    };
    let executor = OllamaExecutor::new(config);

    let result = create_todo_plan_until(&goal, &executor, options, ctrl_c())
        .await
        .context("Failed to get a reply from the model")?;

    // Step 4: Print, errors included
    print!("{}", render_result(&result).context("Failed to format result")?);

    Ok(())
}

/// Banner plus the result pretty-printed with two-space indentation.
fn render_result(result: &ExtractionResult) -> serde_json::Result<String> {
    let json = serde_json::to_string_pretty(result)?;
    Ok(format!("\n✅ Final Parsed TODO JSON:\n\n{json}\n"))
}

/// Prompt for a goal on a terminal, or read one line from piped stdin.
fn read_goal() -> Result<String> {
    if io::stdin().is_terminal() {
        let goal = Input::<String>::new()
            .with_prompt("Enter your goal")
            .allow_empty(true)
            .interact_text()?;
        return Ok(goal);
    }

    read_goal_from(io::stdin().lock())
}

/// Read one line as the goal. End of input before any byte is an error.
fn read_goal_from<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        bail!("No goal provided: stdin closed");
    }
    Ok(strip_line_ending(&line).to_string())
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("goal\n"), "goal");
        assert_eq!(strip_line_ending("goal\r\n"), "goal");
        assert_eq!(strip_line_ending("goal"), "goal");
        assert_eq!(strip_line_ending("\n"), "");
        assert_eq!(strip_line_ending("  spaced goal  \n"), "  spaced goal  ");
    }

    #[test]
    fn test_read_goal_from_line() {
        let goal = read_goal_from("Learn Rust\nignored second line\n".as_bytes()).unwrap();
        assert_eq!(goal, "Learn Rust");
    }

    #[test]
    fn test_read_goal_without_trailing_newline() {
        assert_eq!(read_goal_from("Learn Rust".as_bytes()).unwrap(), "Learn Rust");
    }

    #[test]
    fn test_read_goal_blank_line_is_empty_goal() {
        assert_eq!(read_goal_from("\n".as_bytes()).unwrap(), "");
    }

    #[test]
    fn test_read_goal_at_eof_fails() {
        let err = read_goal_from("".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("stdin closed"), "unexpected error: {err}");
    }

    #[test]
    fn test_render_parsed_result() {
        let result = taskplan::extract_json(
            r#"ok {"goal": "g", "tasks": [{"task": "t", "steps": ["s"]}]}"#,
            ExtractMode::Greedy,
        );
        let rendered = render_result(&result).unwrap();
        let expected = "\n✅ Final Parsed TODO JSON:\n\n{\n  \"goal\": \"g\",\n  \"tasks\": [\n    {\n      \"task\": \"t\",\n      \"steps\": [\n        \"s\"\n      ]\n    }\n  ]\n}\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_error_record() {
        let result = taskplan::extract_json("no braces", ExtractMode::Greedy);
        let rendered = render_result(&result).unwrap();
        let expected = "\n✅ Final Parsed TODO JSON:\n\n{\n  \"error\": \"No JSON found\",\n  \"raw_output\": \"no braces\"\n}\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["taskplan"]).unwrap();
        assert!(cli.goal.is_none());
        assert_eq!(cli.extract, ExtractMode::Greedy);
        assert!(!cli.strict);
        assert!(!cli.skip_check);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "taskplan",
            "--goal",
            "Learn Rust",
            "-m",
            "mistral",
            "--timeout",
            "30",
            "--extract",
            "balanced",
            "--strict",
        ])
        .unwrap();
        assert_eq!(cli.goal.as_deref(), Some("Learn Rust"));
        assert_eq!(cli.model.as_deref(), Some("mistral"));
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.extract, ExtractMode::Balanced);
        assert!(cli.strict);
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        assert!(Cli::try_parse_from(["taskplan", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_extract_mode() {
        assert!(Cli::try_parse_from(["taskplan", "--extract", "lenient"]).is_err());
    }
}
