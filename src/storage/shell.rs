//! Persistence through an external dataset-versioning command.
//!
//! The command's success is judged by sniffing its output: an attempt whose
//! first few characters contain the error marker is retried after a fixed
//! delay. Anything written to stderr fails the run immediately.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::PersistError;
use crate::models::{Config, Listing, PersistConfig};
use crate::storage::local::OutputFile;
use crate::storage::{PersistReport, Persister};
use crate::utils::command::render_command;

type Result<T> = std::result::Result<T, PersistError>;

/// Captured output of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs an argument vector to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, argv: &[String]) -> Result<CommandOutput>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        let (program, args) = argv.split_first().ok_or(PersistError::EmptyCommand)?;

        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| PersistError::Spawn {
                program: program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Writes the output file and hands it to the external tool.
pub struct ShellPersister<R = ProcessRunner> {
    output: OutputFile,
    argv: Vec<String>,
    policy: PersistConfig,
    runner: R,
}

impl ShellPersister<ProcessRunner> {
    /// Build a persister from the run configuration.
    pub fn new(config: &Config, policy: PersistConfig) -> Result<Self> {
        let data = config.data_path.to_string_lossy();
        let structure = config.structure_path.to_string_lossy();
        let meta = config.meta_path.to_string_lossy();

        let argv = render_command(
            &config.persist_command,
            &[
                ("data", &*data),
                ("structure", &*structure),
                ("meta", &*meta),
                ("dataset", config.dataset.as_str()),
            ],
        )?;

        Self::from_parts(OutputFile::new(&config.data_path), argv, policy, ProcessRunner)
    }
}

impl<R: CommandRunner> ShellPersister<R> {
    pub fn from_parts(
        output: OutputFile,
        argv: Vec<String>,
        policy: PersistConfig,
        runner: R,
    ) -> Result<Self> {
        if argv.is_empty() {
            return Err(PersistError::EmptyCommand);
        }
        Ok(Self {
            output,
            argv,
            policy,
            runner,
        })
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn output_file(&self) -> &OutputFile {
        &self.output
    }

    /// Run the command with bounded retry.
    ///
    /// Exhausting the attempts is not an error: the last attempt's output
    /// is returned and the caller inspects it.
    pub async fn execute(&self) -> Result<PersistReport> {
        let max_attempts = self.policy.max_attempts.max(1);
        let delay = Duration::from_millis(self.policy.retry_delay_ms);

        let mut attempts = 1;
        let mut stdout = self.run_once().await?;

        while attempts < max_attempts && self.is_error_output(&stdout) {
            log::warn!(
                "Attempt {}/{} of '{}' reported an error: {}",
                attempts,
                max_attempts,
                self.argv[0],
                stdout.trim()
            );
            tokio::time::sleep(delay).await;
            stdout = self.run_once().await?;
            attempts += 1;
        }

        Ok(PersistReport {
            succeeded: !self.is_error_output(&stdout),
            output: stdout,
            attempts,
        })
    }

    /// Whether the leading window of `stdout` contains the error marker.
    pub fn is_error_output(&self, stdout: &str) -> bool {
        let head: String = stdout.chars().take(self.policy.marker_window).collect();
        head.contains(&self.policy.error_marker)
    }

    async fn run_once(&self) -> Result<String> {
        log::debug!("Running {:?}", self.argv);
        let output = self.runner.run(&self.argv).await?;

        if !output.stderr.is_empty() {
            return Err(PersistError::command_failed(
                &self.argv[0],
                output.stderr.trim(),
            ));
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl<R: CommandRunner> Persister for ShellPersister<R> {
    async fn persist(&self, listings: &[Listing]) -> Result<PersistReport> {
        self.output.write(listings).await?;
        self.execute().await
    }
}
