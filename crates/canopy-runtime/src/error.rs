//! Parse failures and their rendering.

use canopy_types::RuleName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The furthest failure seen during a parse.
///
/// `offset` is a byte offset into `input`. `expected` is the quoted
/// description of what would have matched there, as it appears in the
/// grammar (`'"a"'`, `[0-9]`, `<EOF>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub input: String,
    pub offset: usize,
    pub expected: String,
}

impl ErrorRecord {
    pub fn new(input: &str, offset: usize, expected: &str) -> Self {
        Self {
            input: input.to_string(),
            offset,
            expected: expected.to_string(),
        }
    }
}

/// Runtime error from a parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The entry rule failed or stopped short of the end of input.
    #[error("{message}")]
    Failed {
        record: ErrorRecord,
        message: String,
    },

    /// A rule read a rule the grammar does not define.
    #[error("unknown rule: {0}")]
    UnknownRule(RuleName),
}

impl ParseError {
    pub(crate) fn failed(record: ErrorRecord) -> Self {
        let message = format_error(&record);
        Self::Failed { record, message }
    }

    /// The failure record, if this is a parse failure.
    pub fn record(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Failed { record, .. } => Some(record),
            Self::UnknownRule(_) => None,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Render a failure as `Line <n>: expected <expected>`, followed by the
/// offending line and a caret under the failure column.
///
/// Lines are located by byte offset; the caret column counts characters.
pub fn format_error(error: &ErrorRecord) -> String {
    let lines: Vec<&str> = error.input.split('\n').collect();
    let mut line_no = 0;
    let mut offset = 0;

    while offset <= error.offset && line_no < lines.len() {
        offset += lines[line_no].len() + 1;
        line_no += 1;
    }
    let line = line_no
        .checked_sub(1)
        .and_then(|i| lines.get(i))
        .copied()
        .unwrap_or_default();
    let mut message = format!("Line {line_no}: expected {}\n{line}\n", error.expected);

    let line_start = offset.saturating_sub(line.len() + 1);
    let column = error.offset.saturating_sub(line_start);
    let width = line
        .char_indices()
        .take_while(|&(i, _)| i < column)
        .count()
        + column.saturating_sub(line.len());
    message.extend(std::iter::repeat(' ').take(width));
    message.push('^');
    message
}
