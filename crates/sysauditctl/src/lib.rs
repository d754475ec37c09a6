//! sysauditctl library surface, shared by the binary and integration tests

pub mod cli;
pub mod commands;
pub mod errors;
pub mod logging;
pub mod output;
