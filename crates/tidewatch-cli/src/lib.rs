//! tidewatch CLI library
//!
//! Argument parsing, options loading and the command implementations behind
//! the `tidewatch` binary.

pub mod cli;
pub mod commands;
pub mod config;
