//! The command session: one command per input line, one JSON response per
//! output line.
//!
//! An input line is either a JSON command (`{"type": "login", "data":
//! {"index": 1}}`), a bare command word for commands without data
//! (`undo`), the word `state` to print the current display state, or a
//! blank or `#` comment line, which is skipped.

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::warn;

use huddle_core::{Command, CommandStatus, DisplayState, Model};

use crate::error::EngineError;

/// Session word that prints the display state instead of running a command.
const STATE_WORD: &str = "state";

/// What a single input line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedLine {
    /// Nothing: blank or comment.
    Blank,
    /// Print the display state.
    State,
    /// Run a command.
    Command(Command),
}

/// Parse one input line.
///
/// # Errors
///
/// Returns the JSON error if the line is neither a valid command object
/// nor the word of a command without data.
pub fn parse_line(line: &str) -> Result<ParsedLine, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(ParsedLine::Blank);
    }
    if line == STATE_WORD {
        return Ok(ParsedLine::State);
    }
    if line.starts_with('{') {
        return serde_json::from_str(line).map(ParsedLine::Command);
    }
    serde_json::from_value(serde_json::json!({ "type": line })).map(ParsedLine::Command)
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
enum Response<'a> {
    Ok {
        command: &'static str,
        status: CommandStatus,
        feedback: &'a str,
    },
    Rejected {
        command: &'static str,
        error: String,
    },
    Malformed {
        error: String,
    },
    State {
        state: DisplayState<'a>,
    },
}

/// Counts of what a session did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Commands that succeeded.
    pub executed: usize,
    /// Successful commands that committed or moved the history cursor.
    pub committed: usize,
    /// Commands rejected by a failed precondition.
    pub rejected: usize,
    /// Lines that could not be parsed.
    pub malformed: usize,
}

/// Run every command in `input` against `model`, writing one response line
/// per command to `output`.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if reading or writing fails. Rejected and
/// malformed commands are reported on `output` and do not stop the session.
pub fn run<R: BufRead, W: Write>(
    model: &mut Model,
    input: R,
    mut output: W,
) -> Result<SessionSummary, EngineError> {
    let mut summary = SessionSummary::default();

    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(ParsedLine::Blank) => {}
            Ok(ParsedLine::State) => {
                let response = Response::State {
                    state: model.display_state(),
                };
                write_response(&mut output, &response)?;
            }
            Ok(ParsedLine::Command(command)) => {
                let word = command.word();
                match model.execute(command) {
                    Ok(result) => {
                        summary.executed = summary.executed.saturating_add(1);
                        if result.status == CommandStatus::Committed {
                            summary.committed = summary.committed.saturating_add(1);
                        }
                        let response = Response::Ok {
                            command: word,
                            status: result.status,
                            feedback: &result.feedback,
                        };
                        write_response(&mut output, &response)?;
                    }
                    Err(err) => {
                        summary.rejected = summary.rejected.saturating_add(1);
                        let response = Response::Rejected {
                            command: word,
                            error: err.to_string(),
                        };
                        write_response(&mut output, &response)?;
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "malformed command line");
                summary.malformed = summary.malformed.saturating_add(1);
                let response = Response::Malformed {
                    error: err.to_string(),
                };
                write_response(&mut output, &response)?;
            }
        }
    }

    output.flush()?;
    Ok(summary)
}

fn write_response<W: Write>(output: &mut W, response: &Response<'_>) -> Result<(), EngineError> {
    serde_json::to_writer(&mut *output, response)?;
    output.write_all(b"\n")?;
    Ok(())
}
