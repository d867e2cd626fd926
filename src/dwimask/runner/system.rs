use crate::error::{MaskError, Result};
use crate::runner::{CommandRunner, Invocation};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Runs invocations as real child processes. Their output is captured
/// and logged at debug level; stderr is kept for error reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<()> {
        let command_line = invocation.command_line();
        info!("Command: {}", command_line);

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| MaskError::CommandFailed {
                command: command_line.clone(),
                status: format!("failed to launch: {}", e),
                stderr: String::new(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        let program = invocation.program_name();
        for line in stdout
            .lines()
            .chain(stderr.lines())
            .filter(|l| !l.trim().is_empty())
        {
            debug!(program = %program, "{}", line);
        }

        if !output.status.success() {
            return Err(MaskError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}
