//! JSON extraction from free-text model output.
//!
//! Models tend to wrap their JSON in prose or markdown. Two strategies are
//! offered:
//!
//! - [`ExtractMode::Greedy`] takes everything from the first `{` to the last
//!   `}` and decodes it. Prose containing braces, or several objects, make the
//!   span undecodable even when a valid object is present.
//! - [`ExtractMode::Balanced`] walks forward from each `{` with string-aware
//!   brace matching and returns the first span that decodes. On multi-object
//!   output this yields the first object rather than a parse error.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::error::ExtractError;

/// Span selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    #[default]
    Greedy,
    Balanced,
}

impl ExtractMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractMode::Greedy => "greedy",
            ExtractMode::Balanced => "balanced",
        }
    }
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(ExtractMode::Greedy),
            "balanced" => Ok(ExtractMode::Balanced),
            other => Err(format!(
                "unknown extract mode '{other}' (expected 'greedy' or 'balanced')"
            )),
        }
    }
}

/// Outcome of extracting JSON from model output.
///
/// Serializes to the decoded value itself on success, or to
/// `{"error": ..., "raw_output": ...}` on failure.
#[derive(Debug)]
pub enum ExtractionResult {
    Parsed(Value),
    Failed {
        error: ExtractError,
        raw_output: String,
    },
}

impl ExtractionResult {
    pub fn failed(error: ExtractError, raw_output: &str) -> Self {
        ExtractionResult::Failed {
            error,
            raw_output: raw_output.to_string(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ExtractionResult::Parsed(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ExtractionResult::Parsed(value) => Some(value),
            ExtractionResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ExtractError> {
        match self {
            ExtractionResult::Parsed(_) => None,
            ExtractionResult::Failed { error, .. } => Some(error),
        }
    }

    pub fn raw_output(&self) -> Option<&str> {
        match self {
            ExtractionResult::Parsed(_) => None,
            ExtractionResult::Failed { raw_output, .. } => Some(raw_output),
        }
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ExtractionResult::Parsed(value) => value.serialize(serializer),
            ExtractionResult::Failed { error, raw_output } => {
                let mut record = serializer.serialize_struct("ExtractionFailure", 2)?;
                record.serialize_field("error", &error.to_string())?;
                record.serialize_field("raw_output", raw_output)?;
                record.end()
            }
        }
    }
}

/// Extract and decode a JSON value from model output.
///
/// Never fails: decoding problems come back as [`ExtractionResult::Failed`]
/// carrying the full, unmodified `text`.
pub fn extract_json(text: &str, mode: ExtractMode) -> ExtractionResult {
    let decoded = match mode {
        ExtractMode::Greedy => decode_greedy(text),
        ExtractMode::Balanced => decode_balanced(text),
    };

    match decoded {
        Ok(value) => ExtractionResult::Parsed(value),
        Err(error) => {
            debug!(mode = %mode, "Extraction failed: {}", error);
            ExtractionResult::failed(error, text)
        }
    }
}

fn greedy_span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("greedy span regex is valid"))
}

/// The substring from the first `{` to the last `}` after it, if any.
pub fn greedy_span(text: &str) -> Option<&str> {
    greedy_span_regex().find(text).map(|m| m.as_str())
}

fn decode_greedy(text: &str) -> Result<Value, ExtractError> {
    let span = greedy_span(text).ok_or(ExtractError::NoJson)?;
    serde_json::from_str(span).map_err(ExtractError::Parse)
}

fn decode_balanced(text: &str) -> Result<Value, ExtractError> {
    let mut first_error = None;

    // Rescans from every `{`; quadratic on brace-heavy text, fine at reply sizes.
    for (start_idx, _) in text.match_indices('{') {
        let Some(span) = balanced_span(&text[start_idx..]) else {
            continue;
        };

        match serde_json::from_str::<Value>(span) {
            Ok(value) => return Ok(value),
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    Err(first_error.map_or(ExtractError::NoJson, ExtractError::Parse))
}

/// Return the prefix of `text` (which starts at a `{`) that closes the
/// opening brace, tracking JSON string literals and escapes.
pub fn balanced_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (idx, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                // A stray closer before any opener cannot start a span.
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}
