//! CLI library components for sigtag.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
