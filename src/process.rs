//! Synchronous subprocess execution. Every toolchain invocation in the
//! tool (build steps and harness runs alike) goes through [`run_process`],
//! which captures both output streams line by line and keeps "the tool
//! could not be started" distinct from "the tool ran and failed".

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

/// A command to execute: either a whole line that still needs splitting,
/// or an already-split argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    Line(String),
    Argv(Vec<String>),
}

impl CommandLine {
    pub fn argv(parts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        CommandLine::Argv(parts.into_iter().map(Into::into).collect())
    }

    fn resolve(&self) -> Result<Vec<String>, ProcessError> {
        let parts = match self {
            CommandLine::Line(line) => shell_words::split(line)?,
            CommandLine::Argv(parts) => parts.clone(),
        };
        if parts.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }
        Ok(parts)
    }

    /// The program name, for diagnostics. Empty commands report as `<empty>`.
    pub fn program(&self) -> String {
        match self {
            CommandLine::Line(line) => line
                .split_whitespace()
                .next()
                .unwrap_or("<empty>")
                .to_string(),
            CommandLine::Argv(parts) => parts
                .first()
                .map(String::as_str)
                .unwrap_or("<empty>")
                .to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("command is empty")]
    EmptyCommand,

    #[error("malformed command line: {0}")]
    Split(#[from] shell_words::ParseError),

    /// The executable was absent or not startable. Deliberately separate
    /// from a non-zero exit, which is reported through [`ProcessResult`].
    #[error("could not start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to capture output of '{program}': {source}")]
    Capture {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exceeded the {limit_secs}s time limit and was killed")]
    Timeout { program: String, limit_secs: u64 },
}

/// Captured result of a completed subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: Option<i32>,
    /// Stdout, split into lines with trailing whitespace removed.
    pub output: Vec<String>,
    /// Stderr lines, kept separate so harness errors can be attached at
    /// suite level without disturbing the positional stdout mapping.
    pub err_lines: Vec<String>,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Both streams in one sequence, stdout first. Used when surfacing
    /// build diagnostics, where attribution does not matter.
    pub fn combined_lines(&self) -> impl Iterator<Item = &str> {
        self.output
            .iter()
            .chain(self.err_lines.iter())
            .map(String::as_str)
    }
}

/// Optional execution time limit, off unless `CRYSTALBOX_TIMEOUT_SECS` is
/// set. A hung harness otherwise hangs the run.
pub fn execution_timeout() -> Option<Duration> {
    std::env::var("CRYSTALBOX_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Run `command` to completion and capture its streams.
///
/// Blocks the calling thread. Returns `Err` only when the process could
/// not be spawned, its output could not be collected, or it overran the
/// configured time limit; exiting non-zero is an `Ok` result.
pub fn run_process(command: &CommandLine) -> Result<ProcessResult, ProcessError> {
    let parts = command.resolve()?;
    let program = parts[0].clone();

    let mut cmd = Command::new(&parts[0]);
    cmd.args(&parts[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;

    if let Some(limit) = execution_timeout() {
        let start = Instant::now();
        let poll_interval = Duration::from_millis(50);
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) => {
                    if start.elapsed() > limit {
                        let _ = child.kill();
                        let _ = child.wait(); // reap
                        return Err(ProcessError::Timeout {
                            program,
                            limit_secs: limit.as_secs(),
                        });
                    }
                    std::thread::sleep(poll_interval);
                }
                Err(source) => return Err(ProcessError::Capture { program, source }),
            }
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|source| ProcessError::Capture {
            program: program.clone(),
            source,
        })?;

    Ok(ProcessResult {
        exit_code: output.status.code(),
        output: split_lines(&output.stdout),
        err_lines: split_lines(&output.stderr),
    })
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}
