//! CLI library components for laptop price estimates.
//!
//! The binary only parses arguments, installs logging and maps outcomes to
//! exit codes; everything it runs lives here.

pub mod cli;
pub mod commands;
pub mod input;
pub mod logging;
pub mod summary;
pub mod types;
