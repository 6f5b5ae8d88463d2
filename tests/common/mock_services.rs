//! Process runner doubles
//!
//! [`RecordingProcess`] runs commands for real except for the programs it is
//! told to intercept; those succeed without running and are recorded, so a
//! release can go all the way to "upload" without a file server.

use async_trait::async_trait;
use mkrelease::infrastructure::process::{
    CommandExecutor, CommandLine, Echo, ProcessError, ProcessOutput, ProcessRunner,
};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct RecordingProcess {
    inner: CommandExecutor,
    intercepted: Vec<String>,
    calls: Mutex<Vec<CommandLine>>,
}

impl RecordingProcess {
    /// Intercept `scp`, `sftp`, `gpg` and `twine`
    pub fn new() -> Self {
        Self::intercepting(&["scp", "sftp", "gpg", "twine"])
    }

    pub fn intercepting(programs: &[&str]) -> Self {
        Self {
            inner: CommandExecutor::new(),
            intercepted: programs.iter().map(|p| p.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Intercepted commands in the order they were run
    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<CommandLine> {
        self.calls()
            .into_iter()
            .filter(|command| command.program() == program)
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for RecordingProcess {
    async fn popen(
        &self,
        command: &CommandLine,
        echo: Echo,
    ) -> Result<ProcessOutput, ProcessError> {
        if self.intercepted.iter().any(|p| p == command.program()) {
            self.calls.lock().unwrap().push(command.clone());
            return Ok(ProcessOutput::new(0, Vec::new()));
        }
        self.inner.popen(command, echo).await
    }
}

/// Answers every command from a table keyed by program and first argument
pub struct CannedProcess {
    outputs: HashMap<(String, String), ProcessOutput>,
    calls: Mutex<Vec<String>>,
}

impl CannedProcess {
    pub fn new() -> Self {
        Self {
            outputs: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `<program> <first_arg> ...` with exit code 0 and `lines`
    pub fn with_output(mut self, program: &str, first_arg: &str, lines: &[&str]) -> Self {
        self.outputs.insert(
            (program.to_string(), first_arg.to_string()),
            ProcessOutput::new(0, lines.iter().map(|l| l.to_string()).collect()),
        );
        self
    }

    /// Answer `<program> <first_arg> ...` with a failure
    pub fn with_failure(mut self, program: &str, first_arg: &str, stderr: &str) -> Self {
        self.outputs.insert(
            (program.to_string(), first_arg.to_string()),
            ProcessOutput::new(1, Vec::new()).with_stderr(vec![stderr.to_string()]),
        );
        self
    }

    /// Rendered command lines in the order they were run
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for CannedProcess {
    async fn popen(
        &self,
        command: &CommandLine,
        _echo: Echo,
    ) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(command.to_string());

        let first_arg = command.arguments().first().cloned().unwrap_or_default();
        let key = (command.program().to_string(), first_arg);
        Ok(self
            .outputs
            .get(&key)
            .cloned()
            .unwrap_or_else(|| ProcessOutput::new(1, Vec::new())))
    }
}
