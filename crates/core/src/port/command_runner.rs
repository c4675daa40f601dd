// Command Runner Port
// Abstraction for running the external browser tool

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Maximum bytes captured from each output stream
pub const MAX_LINE_BYTES: usize = 1024;

/// One bounded line read from a process stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapturedLine {
    pub text: String,
    /// The line was longer than MAX_LINE_BYTES and was cut
    pub truncated: bool,
}

impl CapturedLine {
    /// Build from raw bytes read off a stream (trailing `\n` or `\r\n` removed)
    pub fn from_raw(raw: &[u8], truncated: bool) -> Self {
        Self::from_raw_capped(raw, truncated, MAX_LINE_BYTES)
    }

    /// Same as `from_raw`, guaranteeing `text.len() <= cap`
    ///
    /// A multi-byte character cut by the cap is dropped rather than decoded
    /// as U+FFFD. If lossy decoding of invalid bytes would still grow past
    /// `cap`, the text is cut at a char boundary and marked truncated.
    pub fn from_raw_capped(raw: &[u8], truncated: bool, cap: usize) -> Self {
        let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
        let mut raw = raw.strip_suffix(b"\r").unwrap_or(raw);

        if truncated {
            if let Err(e) = std::str::from_utf8(raw) {
                // error_len() is None only for an incomplete sequence at the end
                if e.error_len().is_none() {
                    raw = &raw[..e.valid_up_to()];
                }
            }
        }

        let mut text = String::from_utf8_lossy(raw).into_owned();
        let mut truncated = truncated;
        if text.len() > cap {
            let mut end = cap;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
            truncated = true;
        }

        Self { text, truncated }
    }

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// What a finished process left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: CapturedLine,
    pub stderr: CapturedLine,
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
}

/// Runner errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Command Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns the external process
/// - mocks::RecordingRunner: scripted responses for tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, capture one bounded line per output stream,
    /// and wait for the process to exit
    ///
    /// # Errors
    /// - RunError::SpawnFailed if the process cannot be started
    /// - RunError::Io if reading a stream or waiting fails
    /// - RunError::InvalidCommand if `program` is empty
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, RunError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted runner that records every call
    ///
    /// Replies are consumed in order; once exhausted every call returns an
    /// empty successful output.
    #[derive(Default)]
    pub struct RecordingRunner {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        replies: Mutex<VecDeque<Result<CommandOutput, RunError>>>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a reply with the given stdout / stderr lines and exit code 0
        pub fn reply(self, stdout: &str, stderr: &str) -> Self {
            self.reply_with(Ok(CommandOutput {
                stdout: CapturedLine::new(stdout),
                stderr: CapturedLine::new(stderr),
                exit_code: Some(0),
                duration_ms: 1,
            }))
        }

        pub fn reply_with(self, reply: Result<CommandOutput, RunError>) -> Self {
            self.replies.lock().unwrap().push_back(reply);
            self
        }

        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, RunError> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));

            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(CommandOutput {
                        stdout: CapturedLine::default(),
                        stderr: CapturedLine::default(),
                        exit_code: Some(0),
                        duration_ms: 0,
                    })
                })
        }
    }
}
