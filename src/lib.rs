//! nse-cli library
//!
//! This crate provides the core functionality for the `nse-cli` binary.
//! Keep the crate root minimal — implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The library is organized into modules that handle different aspects of the export pipeline:
//!
//! - [`client`] - Authenticates against the NAC API and issues queries
//! - [`export`] - Window computation, the windowed fetch loop, and the CSV writer
//! - [`cli`] - Command-line interface for selecting and running an export
//! - [`config`] - Environment credentials and run tunables
//! - [`models`] - Records, time windows, and API payload types
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! A run parses the CLI, reads credentials from the environment, logs in
//! once, walks the windowed time range, and writes the accumulated records
//! to a timestamped CSV file:
//!
//! ```no_run
//! use nse_cli::{cli, errors::AppResult};
//!
//! # async fn example() -> AppResult<()> {
//! cli::cli().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;
