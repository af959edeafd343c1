//! Glue between the command line and the Sift library crates.
//!
//! Configuration file discovery, log output and the terminal progress bar
//! live here so `main.rs` only deals with arguments and rendering.

pub(crate) mod config;
pub(crate) mod logging;
pub(crate) mod progress;
