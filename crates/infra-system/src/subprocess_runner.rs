// Subprocess runner implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{info, warn};

use illdb_core::port::command_runner::{
    CapturedLine, CommandOutput, CommandRunner, RunError, MAX_LINE_BYTES,
};
use illdb_core::port::TimeProvider;

/// Subprocess runner
/// Spawns the browser tool with an argument vector (no shell involved)
pub struct SubprocessRunner {
    time_provider: Arc<dyn TimeProvider>,
    max_line_bytes: usize,
}

impl SubprocessRunner {
    /// Create a new subprocess runner capturing up to MAX_LINE_BYTES per stream
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::new(Arc::new(SystemTimeProvider));
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }

    /// Spawn child process, read one line per stream, wait for exit
    ///
    /// The child is killed if this future is dropped or fails before `wait`.
    async fn spawn_and_capture(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<(CapturedLine, CapturedLine, Option<i32>), RunError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunError::SpawnFailed(format!("{}: {}", program, e)))?;

        // Nothing is ever written; closing stdin gives the child EOF
        drop(child.stdin.take());

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunError::Io("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunError::Io("stderr was not captured".to_string()))?;

        // Both streams concurrently: the child may fill either pipe first
        let (response, error) = tokio::try_join!(
            read_bounded_line(stdout, self.max_line_bytes),
            read_bounded_line(stderr, self.max_line_bytes),
        )
        .map_err(|e| RunError::Io(e.to_string()))?;

        let status = child
            .wait()
            .await
            .map_err(|e| RunError::Io(e.to_string()))?;

        Ok((response, error, status.code()))
    }
}

/// Read at most `cap` bytes of the first line, then drain the rest of the stream
///
/// The newline is not counted against `cap`. A line with more than `cap`
/// bytes comes back cut at `cap` with `truncated` set.
async fn read_bounded_line<R>(stream: R, cap: usize) -> io::Result<CapturedLine>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut line: Vec<u8> = Vec::with_capacity(cap.min(4096));
    let mut truncated = false;

    loop {
        if line.len() == cap {
            // Line is exactly `cap` long unless more content follows
            truncated = !at_line_end(&mut reader).await?;
            break;
        }

        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            break;
        }

        let room = cap - line.len();
        if let Some(pos) = buf.iter().take(room).position(|b| *b == b'\n') {
            line.extend_from_slice(&buf[..pos]);
            reader.consume(pos + 1);
            break;
        }

        let take = buf.len().min(room);
        line.extend_from_slice(&buf[..take]);
        reader.consume(take);
    }

    // Keep the pipe flowing so the child never blocks on a full buffer
    tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;

    Ok(CapturedLine::from_raw_capped(&line, truncated, cap))
}

/// Consume a `\n` or `\r\n` terminator if one comes next; EOF also ends the line
async fn at_line_end<R>(reader: &mut BufReader<R>) -> io::Result<bool>
where
    R: AsyncRead + Unpin,
{
    match reader.fill_buf().await?.first().copied() {
        None => Ok(true),
        Some(b'\n') => {
            reader.consume(1);
            Ok(true)
        }
        Some(b'\r') => {
            reader.consume(1);
            match reader.fill_buf().await?.first().copied() {
                None => Ok(true),
                Some(b'\n') => {
                    reader.consume(1);
                    Ok(true)
                }
                Some(_) => Ok(false),
            }
        }
        Some(_) => Ok(false),
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, RunError> {
        if program.trim().is_empty() {
            return Err(RunError::InvalidCommand("empty program".to_string()));
        }

        let start_time = self.time_provider.now_millis();

        info!(
            program = %program,
            arg_count = args.len(),
            "Starting browser subprocess"
        );

        let (stdout, stderr, exit_code) = self.spawn_and_capture(program, args).await?;

        let duration_ms = self.time_provider.now_millis() - start_time;

        if stdout.truncated || stderr.truncated {
            warn!(
                program = %program,
                stdout_truncated = stdout.truncated,
                stderr_truncated = stderr.truncated,
                max_line_bytes = self.max_line_bytes,
                "Browser output line exceeded capture limit"
            );
        }

        info!(
            program = %program,
            duration_ms = %duration_ms,
            exit_code = ?exit_code,
            "Browser subprocess completed"
        );

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code,
            duration_ms,
        })
    }
}
