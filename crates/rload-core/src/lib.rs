pub mod config;
pub mod logging;

pub mod descriptor;
pub mod environment;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod retry;
