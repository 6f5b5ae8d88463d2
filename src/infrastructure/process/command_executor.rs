use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tracing::{debug, info, trace, warn};

/// Process runner errors
///
/// A process that runs and exits non-zero is not an error at this layer;
/// callers inspect [`ProcessOutput::exit_code`] themselves.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

/// Whether a process's output is echoed through the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// Emit output lines as `info` (stdout) and `warn` (stderr) events
    On,
    /// Emit output lines as `trace` events only
    Off,
}

/// A program invocation: program, arguments and optional working directory
///
/// Arguments are passed to the program verbatim, no shell is involved unless
/// the command line was built with [`CommandLine::shell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    working_directory: Option<PathBuf>,
}

impl CommandLine {
    /// Create a command line for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_directory: None,
        }
    }

    /// Run a user-supplied command string through the platform shell
    pub fn shell(command: &str) -> Result<Self, ProcessError> {
        if command.trim().is_empty() {
            return Err(ProcessError::InvalidCommand("Command is empty".to_string()));
        }

        let (shell, shell_flag) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        Ok(Self::new(shell).arg(shell_flag).arg(command))
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a filesystem path as an argument
    ///
    /// Paths that are not valid UTF-8 are rejected, never rendered lossily.
    pub fn path_arg(self, path: &Path) -> Result<Self, ProcessError> {
        let rendered = path
            .to_str()
            .ok_or_else(|| ProcessError::NonUtf8Path(path.to_path_buf()))?;
        Ok(self.arg(rendered))
    }

    /// Set working directory
    pub fn with_working_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of one process invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code of the process (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Standard output, one entry per line, trailing newline stripped
    pub lines: Vec<String>,

    /// Standard error, one entry per line
    pub stderr_lines: Vec<String>,
}

impl ProcessOutput {
    pub fn new(exit_code: i32, lines: Vec<String>) -> Self {
        Self {
            exit_code,
            lines,
            stderr_lines: Vec::new(),
        }
    }

    pub fn with_stderr(mut self, stderr_lines: Vec<String>) -> Self {
        self.stderr_lines = stderr_lines;
        self
    }

    /// Whether the process exited with zero
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    /// Best available explanation of a failure, for error messages
    pub fn error_summary(&self) -> String {
        let source = if self.stderr_lines.is_empty() {
            &self.lines
        } else {
            &self.stderr_lines
        };
        source
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Executes external commands on behalf of the drivers and the workflow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command to completion and capture its output
    async fn popen(&self, command: &CommandLine, echo: Echo)
        -> Result<ProcessOutput, ProcessError>;

    /// Run a command with echo and return its exit code; -1 if it could not be spawned
    async fn system(&self, command: &CommandLine) -> i32 {
        match self.popen(command, Echo::On).await {
            Ok(output) => output.exit_code,
            Err(e) => {
                warn!("{}", e);
                -1
            }
        }
    }

    /// Run a command quietly and return the first line of its output
    ///
    /// Returns an empty string when the command fails or prints nothing.
    async fn pipe(&self, command: &CommandLine) -> String {
        match self.popen(command, Echo::Off).await {
            Ok(output) if output.success() => {
                output.first_line().unwrap_or_default().to_string()
            }
            Ok(_) => String::new(),
            Err(e) => {
                debug!("{}", e);
                String::new()
            }
        }
    }
}

/// Command executor for running external processes
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for CommandExecutor {
    async fn popen(
        &self,
        command: &CommandLine,
        echo: Echo,
    ) -> Result<ProcessOutput, ProcessError> {
        let start_time = Instant::now();
        debug!("Running: {}", command);

        let mut cmd = TokioCommand::new(command.program());
        cmd.args(command.arguments());

        if let Some(working_dir) = command.working_directory() {
            cmd.current_dir(working_dir);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd
            .output()
            .await
            .map_err(|source| ProcessError::SpawnFailed {
                command: command.to_string(),
                source,
            })?;

        let exit_code = output.status.code().unwrap_or(-1);
        let lines = split_lines(&output.stdout);
        let stderr_lines = split_lines(&output.stderr);

        for line in &lines {
            match echo {
                Echo::On => info!("{}", line),
                Echo::Off => trace!("{}", line),
            }
        }
        for line in &stderr_lines {
            match echo {
                Echo::On => warn!("{}", line),
                Echo::Off => trace!("{}", line),
            }
        }

        debug!(
            exit_code,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Finished: {}",
            command
        );

        Ok(ProcessOutput {
            exit_code,
            lines,
            stderr_lines,
        })
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}
