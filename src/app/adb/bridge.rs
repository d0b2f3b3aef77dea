use tracing::{info, warn};

use crate::app::adb::locator::device_selector_args;
use crate::app::adb::runner::{run_command, CommandOutput};
use crate::app::adb::transfer::pull_text_with;
use crate::app::config::RelayConfig;
use crate::app::error::AppError;

/// The two device operations the relay needs.
pub trait DeviceBridge {
    /// Runs `command` through `adb shell` and returns adb's own result code.
    fn shell(&self, command: &str) -> Result<i32, AppError>;

    /// Fetches a device file and returns its contents as text.
    fn pull_text(&self, remote_path: &str) -> Result<String, AppError>;
}

pub struct AdbBridge {
    program: String,
    selector: Vec<String>,
    pull_attempts: u32,
    verbose: bool,
    trace_id: String,
}

impl AdbBridge {
    pub fn new(config: &RelayConfig, trace_id: &str) -> Self {
        Self {
            program: config.adb_program.clone(),
            selector: device_selector_args(&config.serial),
            pull_attempts: config.pull_attempts,
            verbose: config.verbose,
            trace_id: trace_id.to_string(),
        }
    }

    pub fn adb_args(&self, args: &[&str]) -> Vec<String> {
        self.selector
            .iter()
            .cloned()
            .chain(args.iter().map(|arg| arg.to_string()))
            .collect()
    }

    fn run_adb(&self, args: &[&str]) -> Result<CommandOutput, AppError> {
        let args = self.adb_args(args);
        if self.verbose {
            info!(program = %self.program, args = ?args, "adb");
        }
        let output = run_command(&self.program, &args, &self.trace_id)?;
        if !output.success() {
            warn!(
                args = ?args,
                exit_code = output.status_code(),
                stdout = %output.stdout.trim_end(),
                stderr = %output.stderr.trim_end(),
                "adb command failed"
            );
        }
        Ok(output)
    }
}

impl DeviceBridge for AdbBridge {
    fn shell(&self, command: &str) -> Result<i32, AppError> {
        Ok(self.run_adb(&["shell", command])?.status_code())
    }

    fn pull_text(&self, remote_path: &str) -> Result<String, AppError> {
        pull_text_with(remote_path, self.pull_attempts, &self.trace_id, |local| {
            let local = local.to_string_lossy().to_string();
            self.run_adb(&["pull", remote_path, local.as_str()])
        })
    }
}
