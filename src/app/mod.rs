pub mod adb;
pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod relay;
pub mod remote_command;
