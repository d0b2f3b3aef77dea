use tracing::debug;

use crate::app::adb::runner::run_command;
use crate::app::error::AppError;

const SIXTY_FOUR_BIT_MARKER: &str = "64-bit";

/// Describes a host-side file the way `file(1)` does.
pub trait ArchProbe {
    fn describe(&self, path: &str) -> Result<String, AppError>;
}

pub struct FileProbe {
    program: String,
    trace_id: String,
}

impl FileProbe {
    pub fn new(program: &str, trace_id: &str) -> Self {
        Self {
            program: program.to_string(),
            trace_id: trace_id.to_string(),
        }
    }
}

impl ArchProbe for FileProbe {
    fn describe(&self, path: &str) -> Result<String, AppError> {
        let output = run_command(&self.program, &[path.to_string()], &self.trace_id)
            .map_err(|err| AppError::probe(err.error, &self.trace_id))?;
        if !output.success() {
            return Err(AppError::probe(
                format!(
                    "{} {path} exited with {}: {}",
                    self.program,
                    output.status_code(),
                    output.stderr.trim()
                ),
                &self.trace_id,
            ));
        }
        debug!(path, description = %output.stdout.trim_end(), "probed binary");
        Ok(output.stdout)
    }
}

/// The host keeps the real test executable next to the relay as `<argv0>.real`.
pub fn probe_target(argv0: &str) -> String {
    format!("{argv0}.real")
}

pub fn is_64bit(description: &str) -> bool {
    description.contains(SIXTY_FOUR_BIT_MARKER)
}

/// Command prefix for the remote binary: empty for 64-bit, otherwise `<wrapper> `.
pub fn wrapper_prefix(description: &str, wrapper: &str) -> String {
    if is_64bit(description) {
        String::new()
    } else {
        format!("{wrapper} ")
    }
}
