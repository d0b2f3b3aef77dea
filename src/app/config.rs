use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::adb::locator::resolve_adb_program;
use crate::app::error::AppError;

pub const DEFAULT_DEVICE_DIR: &str = "/data/local/tmp/Output";
pub const DEFAULT_WRAPPER: &str = "asanwrapper";
pub const DEFAULT_PULL_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayConfig {
    /// On-device directory holding the test binaries and their captured output.
    #[serde(default = "default_device_dir")]
    pub device_dir: String,
    #[serde(default = "default_adb_program")]
    pub adb_program: String,
    #[serde(default = "default_file_program")]
    pub file_program: String,
    /// Launcher prefixed to the remote command for 32-bit binaries.
    #[serde(default = "default_wrapper")]
    pub wrapper: String,
    #[serde(default = "default_forwarded_env")]
    pub forwarded_env: Vec<String>,
    #[serde(default = "default_pull_attempts")]
    pub pull_attempts: u32,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub verbose: bool,
}

fn default_device_dir() -> String {
    DEFAULT_DEVICE_DIR.to_string()
}

fn default_adb_program() -> String {
    "adb".to_string()
}

fn default_file_program() -> String {
    "file".to_string()
}

fn default_wrapper() -> String {
    DEFAULT_WRAPPER.to_string()
}

fn default_forwarded_env() -> Vec<String> {
    vec![
        "ASAN_OPTIONS".to_string(),
        "ASAN_ACTIVATION_OPTIONS".to_string(),
    ]
}

fn default_pull_attempts() -> u32 {
    DEFAULT_PULL_ATTEMPTS
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            device_dir: default_device_dir(),
            adb_program: default_adb_program(),
            file_program: default_file_program(),
            wrapper: default_wrapper(),
            forwarded_env: default_forwarded_env(),
            pull_attempts: default_pull_attempts(),
            serial: String::new(),
            verbose: false,
        }
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("ANDROID_RUN_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".android_run.json")
}

/// Loads the config file and applies the process environment on top of it.
pub fn load_config(trace_id: &str) -> Result<RelayConfig, AppError> {
    let config = load_config_from_path(&config_path(), trace_id)?;
    Ok(validate_config(apply_env_overrides(config, |key| {
        std::env::var(key).ok()
    })))
}

pub fn load_config_from_path(path: &Path, trace_id: &str) -> Result<RelayConfig, AppError> {
    if !path.exists() {
        return Ok(RelayConfig::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| AppError::system(format!("Failed to read config: {err}"), trace_id))?;
    let config: RelayConfig = serde_json::from_str(&raw)
        .map_err(|err| AppError::system(format!("Failed to parse config: {err}"), trace_id))?;
    Ok(validate_config(config))
}

pub fn apply_env_overrides<F>(mut config: RelayConfig, lookup: F) -> RelayConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(adb) = lookup("ADB").filter(|value| !value.trim().is_empty()) {
        config.adb_program = adb;
    }
    if lookup("ANDROID_RUN_VERBOSE").as_deref() == Some("1") {
        config.verbose = true;
    }
    config
}

fn validate_config(mut config: RelayConfig) -> RelayConfig {
    let device_dir = config.device_dir.trim().trim_end_matches('/');
    if device_dir.is_empty() || !device_dir.starts_with('/') {
        config.device_dir = default_device_dir();
    } else {
        config.device_dir = device_dir.to_string();
    }
    config.adb_program = resolve_adb_program(&config.adb_program);
    if config.file_program.trim().is_empty() {
        config.file_program = default_file_program();
    }
    if config.wrapper.trim().is_empty() {
        config.wrapper = default_wrapper();
    }
    if config.pull_attempts == 0 {
        config.pull_attempts = DEFAULT_PULL_ATTEMPTS;
    }
    config.serial = config.serial.trim().to_string();
    config
}
