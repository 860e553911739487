//! Raw output sources.
//!
//! The engine never talks to a device itself. It asks an [`OutputSource`]
//! for the text printed by a command string and parses whatever comes back.

use std::collections::HashMap;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use wait_timeout::ChildExt;

/// Default timeout for one external command.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Errors raised while obtaining raw command output.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to run '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' did not finish within {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("no output registered for command '{0}'")]
    UnknownCommand(String),
}

/// Produces the raw text a device prints for a show command.
pub trait OutputSource {
    fn fetch(&self, command: &str) -> Result<String, SourceError>;
}

impl<F> OutputSource for F
where
    F: Fn(&str) -> Result<String, SourceError>,
{
    fn fetch(&self, command: &str) -> Result<String, SourceError> {
        self(command)
    }
}

/// Returns the same captured text for every command.
#[derive(Debug, Clone)]
pub struct StaticSource(pub String);

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl OutputSource for StaticSource {
    fn fetch(&self, _command: &str) -> Result<String, SourceError> {
        Ok(self.0.clone())
    }
}

/// Replays captured output keyed by the exact command string.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    outputs: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `output` as the reply to `command`.
    pub fn with(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }

    pub fn insert(&mut self, command: impl Into<String>, output: impl Into<String>) {
        self.outputs.insert(command.into(), output.into());
    }
}

impl OutputSource for MapSource {
    fn fetch(&self, command: &str) -> Result<String, SourceError> {
        self.outputs
            .get(command)
            .cloned()
            .ok_or_else(|| SourceError::UnknownCommand(command.to_string()))
    }
}

/// How to reach a device through an external program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSourceConfig {
    /// Program to execute, e.g. an SSH wrapper.
    pub program: String,
    /// Arguments placed before the show command.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Runs an external program with the show command as its final argument
/// and returns its stdout.
#[derive(Debug, Clone)]
pub struct ProcessSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessSource {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &ProcessSourceConfig) -> Self {
        Self::new(&config.program)
            .args(config.args.iter().cloned())
            .timeout(Duration::from_millis(config.timeout_ms))
    }

    fn io_error(&self, source: io::Error) -> SourceError {
        SourceError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

impl OutputSource for ProcessSource {
    fn fetch(&self, command: &str) -> Result<String, SourceError> {
        debug!(program = %self.program, command, "Running output source");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.io_error(e))?;

        // Drain both pipes in the background so a chatty child cannot block
        // on a full pipe buffer before it exits.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                debug!(program = %self.program, command, "Output source timed out, killing it");
                let _ = child.kill();
                let _ = child.wait();
                return Err(SourceError::Timeout {
                    program: self.program.clone(),
                    timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.io_error(e));
            }
        };

        let stdout = collect(stdout).map_err(|e| self.io_error(e))?;
        let stderr = collect(stderr).unwrap_or_default();
        if !status.success() {
            return Err(SourceError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

type Drain = JoinHandle<io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Drain {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(handle: Option<Drain>) -> io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("pipe reader panicked"))?,
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_source_replays_by_command() {
        let source = MapSource::new().with("show ip pim rp mapping", "Group(s) 224.0.0.0/4\n");
        assert_eq!(
            source.fetch("show ip pim rp mapping").unwrap(),
            "Group(s) 224.0.0.0/4\n"
        );
        assert!(matches!(
            source.fetch("show ip pim bsr-router"),
            Err(SourceError::UnknownCommand(command)) if command == "show ip pim bsr-router"
        ));
    }

    #[test]
    fn test_closure_is_a_source() {
        let source = |command: &str| Ok::<_, SourceError>(format!("echo {command}"));
        assert_eq!(source.fetch("show x").unwrap(), "echo show x");
    }

    #[test]
    fn test_static_source_ignores_command() {
        let source = StaticSource::new("text");
        assert_eq!(source.fetch("anything").unwrap(), "text");
    }

    #[test]
    fn test_config_defaults_timeout() {
        let config: ProcessSourceConfig = serde_yaml::from_str("program: ssh\n").unwrap();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(config.args.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_source_passes_command_as_last_argument() {
        let source = ProcessSource::new("sh").args(["-c", "printf '%s' \"$0\""]);
        assert_eq!(source.fetch("show ip pim interface").unwrap(), "show ip pim interface");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_source_reports_non_zero_exit() {
        let source = ProcessSource::new("sh").args(["-c", "echo boom >&2; exit 3"]);
        let err = source.fetch("show ip pim interface").unwrap_err();
        match err {
            SourceError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_process_source_times_out() {
        let source = ProcessSource::new("sh")
            .args(["-c", "sleep 5"])
            .timeout(Duration::from_millis(100));
        assert!(matches!(
            source.fetch("show ip pim interface"),
            Err(SourceError::Timeout { timeout_ms: 100, .. })
        ));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let source = ProcessSource::new("pim-show-definitely-not-a-program");
        assert!(matches!(source.fetch("show"), Err(SourceError::Io { .. })));
    }
}
