//! Library side of the `etl` binary: argument definitions, logging setup,
//! commands and summary rendering.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod redact;
pub mod summary;
