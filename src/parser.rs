//! Streaming JSON5 parsing for edit scripts
//!
//! An edit script is a sequence of [`Edit`] objects, either one per line
//! (JSONL) or spread over several lines. JSON5 extras are accepted:
//! comments, trailing commas, unquoted keys and single-quoted strings.

use crate::session::Edit;
use std::io::Read;
use thiserror::Error;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// A non-fatal problem found while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

/// An edit together with the line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEdit {
    pub edit: Edit,
    pub line: usize,
}

/// Result of parsing an edit script.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub edits: Vec<ScriptEdit>,
    pub warnings: Vec<Warning>,
}

/// Parse a single JSON5 string into an Edit.
pub fn parse_line(line: &str, line_number: usize) -> Result<Edit, ParseError> {
    json5::from_str(line).map_err(|e| ParseError { message: e.to_string(), line: line_number })
}

/// Parse a stream of JSON5 edit objects.
///
/// Objects are split by tracking brace and bracket depth outside of string
/// literals. A malformed object produces a warning and stops parsing, since
/// the next object boundary can't be found reliably.
pub fn parse_stream<R: Read>(reader: R) -> ParseResult {
    use std::io::BufRead;

    let mut result = ParseResult::default();
    let buf_reader = std::io::BufReader::new(reader);

    let mut accumulator = String::new();
    let mut start_line = 1;
    let mut current_line = 1;
    let mut brace_depth = 0i32;
    let mut bracket_depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escape_next = false;

    for line in buf_reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                result.warnings.push(Warning { message: e.to_string(), line: current_line });
                return result;
            }
        };

        // Skip empty lines and whole-line comments between objects
        if accumulator.is_empty() && (line.trim().is_empty() || line.trim_start().starts_with("//")) {
            current_line += 1;
            start_line = current_line;
            continue;
        }

        if !accumulator.is_empty() {
            accumulator.push('\n');
        }
        accumulator.push_str(&line);

        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            if escape_next {
                escape_next = false;
                continue;
            }

            // JSON5 strings may use either quote; only the opening one closes
            match (quote, ch) {
                (Some(_), '\\') => escape_next = true,
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '/') if chars.peek() == Some(&'/') => break,
                (None, '"' | '\'') => quote = Some(ch),
                (None, '{') => brace_depth += 1,
                (None, '}') => brace_depth -= 1,
                (None, '[') => bracket_depth += 1,
                (None, ']') => bracket_depth -= 1,
                (None, _) => {}
            }
        }

        if brace_depth == 0 && bracket_depth == 0 && !accumulator.trim().is_empty() {
            match parse_line(&accumulator, start_line) {
                Ok(edit) => result.edits.push(ScriptEdit { edit, line: start_line }),
                Err(e) => {
                    result.warnings.push(Warning { message: e.message, line: e.line });
                    return result;
                }
            }

            accumulator.clear();
            start_line = current_line + 1;
            quote = None;
            escape_next = false;
        }

        current_line += 1;
    }

    // Unbalanced trailing content
    if !accumulator.trim().is_empty() {
        match parse_line(&accumulator, start_line) {
            Ok(edit) => result.edits.push(ScriptEdit { edit, line: start_line }),
            Err(e) => result.warnings.push(Warning { message: e.message, line: e.line }),
        }
    }

    result
}
