pub mod app;

use uuid::Uuid;

use app::adb::bridge::AdbBridge;
use app::config::load_config;
use app::error::AppError;
use app::logging::init_logging;
use app::probe::FileProbe;
use app::relay::{Relay, RelayOutcome};

/// Relays one test binary run for the current process.
///
/// The device output is written to this process's stdout and stderr; the caller
/// turns the outcome into an exit status or an abort.
pub fn run() -> Result<RelayOutcome, AppError> {
    let trace_id = Uuid::new_v4().to_string();
    let config = load_config(&trace_id)?;
    init_logging(config.verbose);

    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().to_string())
        .collect();
    let host_env: Vec<(String, String)> = std::env::vars_os()
        .map(|(key, value)| {
            (
                key.to_string_lossy().to_string(),
                value.to_string_lossy().to_string(),
            )
        })
        .collect();

    let bridge = AdbBridge::new(&config, &trace_id);
    let probe = FileProbe::new(&config.file_program, &trace_id);
    let relay = Relay::new(&config, &bridge, &probe, &trace_id);

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    relay.run(&argv, &host_env, &mut stdout, &mut stderr)
}
