//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, ConvertArgs};
pub use commands::{apply_overrides, convert, handle_config_action, list_fonts, print_kernels, rasterizer};
pub use enums::Style;
