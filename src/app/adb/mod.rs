pub mod bridge;
pub mod locator;
pub mod paths;
pub mod runner;
pub mod transfer;
