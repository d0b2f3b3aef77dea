use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::app::adb::runner::CommandOutput;
use crate::app::error::AppError;

/// Pulls `remote_path` into a scratch directory and returns its contents as text.
///
/// `pull` receives the local destination and performs one `adb pull`; it is retried
/// up to `attempts` times. The scratch directory is removed on return.
pub fn pull_text_with<F>(
    remote_path: &str,
    attempts: u32,
    trace_id: &str,
    mut pull: F,
) -> Result<String, AppError>
where
    F: FnMut(&Path) -> Result<CommandOutput, AppError>,
{
    let scratch = tempfile::Builder::new()
        .prefix("android_run")
        .tempdir()
        .map_err(|err| AppError::system(format!("Failed to create temp dir: {err}"), trace_id))?;
    let local_path = scratch.path().join(local_file_name(remote_path));

    let attempts = attempts.max(1);
    let mut last_output: Option<CommandOutput> = None;
    for attempt in 1..=attempts {
        let output = pull(&local_path)?;
        if output.success() {
            debug!(remote_path, attempt, "pulled device file");
            let bytes = fs::read(&local_path).map_err(|err| {
                AppError::system(format!("Failed to read pulled file: {err}"), trace_id)
            })?;
            return Ok(String::from_utf8_lossy(&bytes).to_string());
        }
        warn!(
            remote_path,
            attempt,
            attempts,
            exit_code = output.status_code(),
            "adb pull failed"
        );
        last_output = Some(output);
    }

    let detail = last_output
        .map(|output| pull_failure_detail(&output))
        .unwrap_or_default();
    Err(AppError::dependency(
        format!("Pull of {remote_path} failed after {attempts} attempt(s): {detail}"),
        trace_id,
    ))
}

fn local_file_name(remote_path: &str) -> String {
    remote_path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("artifact")
        .to_string()
}

fn pull_failure_detail(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        output.stdout.trim().to_string()
    } else {
        stderr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code: Some(code),
        }
    }

    #[test]
    fn returns_pulled_contents() {
        let text = pull_text_with("/data/local/tmp/Output/t.stdout", 5, "trace", |local| {
            assert!(local.ends_with("t.stdout"));
            fs::write(local, "ok\n").expect("write");
            Ok(output(0, ""))
        })
        .expect("pull");
        assert_eq!(text, "ok\n");
    }

    #[test]
    fn retries_until_success() {
        let mut calls = 0;
        let text = pull_text_with("/data/local/tmp/Output/t.exitcode", 5, "trace", |local| {
            calls += 1;
            if calls < 3 {
                return Ok(output(1, "error: device offline"));
            }
            fs::write(local, "0\n").expect("write");
            Ok(output(0, ""))
        })
        .expect("pull");
        assert_eq!(calls, 3);
        assert_eq!(text, "0\n");
    }

    #[test]
    fn gives_up_after_all_attempts() {
        let mut calls = 0;
        let err = pull_text_with("/data/local/tmp/Output/t.stderr", 2, "trace-3", |_local| {
            calls += 1;
            Ok(output(1, "error: device 'emulator-5554' not found"))
        })
        .expect_err("expected error");
        assert_eq!(calls, 2);
        assert_eq!(err.code, "ERR_DEPENDENCY");
        assert_eq!(err.trace_id, "trace-3");
        assert!(err.error.contains("not found"));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let mut calls = 0;
        let _ = pull_text_with("/x", 0, "trace", |_local| {
            calls += 1;
            Ok(output(1, ""))
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn replaces_invalid_utf8() {
        let text = pull_text_with("/x/t.stdout", 1, "trace", |local| {
            fs::write(local, [b'o', b'k', 0xff]).expect("write");
            Ok(output(0, ""))
        })
        .expect("pull");
        assert_eq!(text, "ok\u{fffd}");
    }
}
