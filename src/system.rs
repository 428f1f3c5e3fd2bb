//! Run commands in the foreground and capture their output

use std::process::Command;

use log::{debug, info};

use crate::error::SubmitError;

/// Captured output of a finished foreground command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run a shell command to completion. A non-zero exit is an error.
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, SubmitError>;
}

/// Executes through `sh -c`, blocking until the command finishes
pub struct ForegroundRunner;

impl CommandRunner for ForegroundRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, SubmitError> {
        info!("Running command: {command}");
        let output = Command::new("sh").arg("-c").arg(command).output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug!("stdout: {stdout}");
        debug!("stderr: {stderr}");

        if !output.status.success() {
            return Err(SubmitError::CommandFailed {
                command: command.to_string(),
                status: output.status,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}
