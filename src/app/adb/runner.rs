use std::io::Read;
use std::process::{Command, Stdio};

use crate::app::error::AppError;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Result code as seen by a caller; a child killed by a signal reports 1.
    pub fn status_code(&self) -> i32 {
        self.exit_code.unwrap_or(1)
    }
}

/// Runs `program` to completion with both output streams captured.
///
/// There is no timeout: a hung adb or device is left for the outer harness to kill.
pub fn run_command(
    program: &str,
    args: &[String],
    trace_id: &str,
) -> Result<CommandOutput, AppError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| AppError::system(format!("Failed to spawn {program}: {err}"), trace_id))?;

    // Drain stderr on its own thread; a chatty child can otherwise block on a full pipe.
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| AppError::system("Failed to capture stderr", trace_id))?;
    let stderr_handle = std::thread::spawn(move || {
        let mut reader = stderr;
        let mut buffer = Vec::<u8>::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    });

    let mut stdout_bytes = Vec::<u8>::new();
    if let Some(mut stdout) = child.stdout.take() {
        let _ = stdout.read_to_end(&mut stdout_bytes);
    }

    let status = child
        .wait()
        .map_err(|err| AppError::system(format!("Failed to wait for {program}: {err}"), trace_id))?;
    let stderr_bytes = stderr_handle.join().unwrap_or_default();

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&stdout_bytes).to_string(),
        stderr: String::from_utf8_lossy(&stderr_bytes).to_string(),
        exit_code: status.code(),
    })
}
