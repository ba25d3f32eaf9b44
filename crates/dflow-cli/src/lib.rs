//! Daily flow CLI library.
//!
//! This crate provides the `dflow` command-line shell over the journal.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
