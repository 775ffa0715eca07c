//! calcatime CLI library.
//!
//! This crate wires the core resolver and aggregator to calendar providers,
//! configuration and output formats.

mod cli;
pub mod commands;
mod config;
pub mod provider;

pub use cli::{Cli, OutputArgs};
pub use config::Config;
