//! # rc-cli
//!
//! Argument parsing and command dispatch for the `rc` binary.

pub mod cli;
pub mod run;

pub use cli::{Cli, Commands};
pub use run::execute;
