//! work-hours CLI library.
//!
//! This crate provides the `wh` command-line interface: configuration,
//! calendar access and the subcommands built on `wh-core`.

pub mod calendar;
mod cli;
pub mod commands;
mod config;
pub mod render;

pub use cli::{Cli, Commands};
pub use config::Config;
