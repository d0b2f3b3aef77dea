use std::io::Write;

use tracing::{debug, info, warn};

use crate::app::adb::bridge::DeviceBridge;
use crate::app::adb::paths::DevicePaths;
use crate::app::config::RelayConfig;
use crate::app::error::AppError;
use crate::app::probe::{probe_target, wrapper_prefix, ArchProbe};
use crate::app::remote_command::{build_device_env, join_device_args, RemoteCommand};

/// Exit statuses above this follow the shell's `128 + signal` convention.
pub const SIGNAL_EXIT_THRESHOLD: i32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Exit with this status.
    Exit(i32),
    /// The device process died from a signal; the relay must abort itself.
    Abort { exit_code: i32 },
}

pub struct Relay<'a, B, P> {
    config: &'a RelayConfig,
    bridge: &'a B,
    probe: &'a P,
    trace_id: String,
}

impl<'a, B, P> Relay<'a, B, P>
where
    B: DeviceBridge,
    P: ArchProbe,
{
    pub fn new(config: &'a RelayConfig, bridge: &'a B, probe: &'a P, trace_id: &str) -> Self {
        Self {
            config,
            bridge,
            probe,
            trace_id: trace_id.to_string(),
        }
    }

    /// Builds the device command line for `argv` without running anything on the device.
    pub fn remote_command<K, V>(
        &self,
        argv: &[String],
        host_env: &[(K, V)],
    ) -> Result<(DevicePaths, String), AppError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let argv0 = argv
            .first()
            .ok_or_else(|| AppError::validation("argv is empty", &self.trace_id))?;
        let paths = DevicePaths::for_invocation(&self.config.device_dir, argv0).ok_or_else(|| {
            AppError::validation(format!("{argv0:?} has no file name"), &self.trace_id)
        })?;

        let env = build_device_env(
            &self.config.device_dir,
            host_env.iter().map(|(key, value)| (key.as_ref(), value.as_ref())),
            &self.config.forwarded_env,
        );
        let description = self.probe.describe(&probe_target(argv0))?;
        let wrapper = wrapper_prefix(&description, &self.config.wrapper);
        let args = join_device_args(&argv[1..]);

        let command = RemoteCommand {
            paths: &paths,
            env,
            wrapper,
            args,
        }
        .render();
        Ok((paths, command))
    }

    /// Runs the test binary on the device and relays its output into `out` and `err`.
    pub fn run<K, V, O, E>(
        &self,
        argv: &[String],
        host_env: &[(K, V)],
        out: &mut O,
        err: &mut E,
    ) -> Result<RelayOutcome, AppError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
        O: Write,
        E: Write,
    {
        let (paths, command) = self.remote_command(argv, host_env)?;
        info!(trace_id = %self.trace_id, binary = %paths.binary, "running on device");
        debug!(trace_id = %self.trace_id, command = %command, "adb shell");

        let status = self.bridge.shell(&command)?;
        if status != 0 {
            warn!(trace_id = %self.trace_id, status, "adb shell failed; skipping artifact retrieval");
            return Ok(RelayOutcome::Exit(status));
        }

        let stdout_text = self.bridge.pull_text(&paths.stdout)?;
        self.relay_stream(out, &stdout_text, "stdout")?;
        let stderr_text = self.bridge.pull_text(&paths.stderr)?;
        self.relay_stream(err, &stderr_text, "stderr")?;

        let exit_text = self.bridge.pull_text(&paths.exit_code)?;
        let exit_code = parse_exit_code(&exit_text, &self.trace_id)?;
        let outcome = translate_exit_code(exit_code);
        info!(trace_id = %self.trace_id, exit_code, outcome = ?outcome, "device run finished");
        Ok(outcome)
    }

    fn relay_stream<W: Write>(&self, sink: &mut W, text: &str, name: &str) -> Result<(), AppError> {
        sink.write_all(text.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(|err| AppError::system(format!("Failed to write {name}: {err}"), &self.trace_id))
    }
}

/// Parses the text written by `echo $?` on the device.
///
/// An empty or non-numeric artifact means the device command never reached the
/// status capture; that is reported rather than mapped to a guessed code.
pub fn parse_exit_code(text: &str, trace_id: &str) -> Result<i32, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::exit_code("Exit code artifact is empty", trace_id));
    }
    trimmed.parse::<i32>().map_err(|_| {
        AppError::exit_code(format!("Exit code artifact is not an integer: {trimmed:?}"), trace_id)
    })
}

pub fn translate_exit_code(exit_code: i32) -> RelayOutcome {
    if exit_code > SIGNAL_EXIT_THRESHOLD {
        RelayOutcome::Abort { exit_code }
    } else {
        RelayOutcome::Exit(exit_code)
    }
}
