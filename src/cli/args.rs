//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::Style;

/// Parse and validate the output scale (positive number)
fn parse_scale(s: &str) -> Result<f32, String> {
    let scale: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(format!("Scale must be a positive number, got {}", scale));
    }
    Ok(scale)
}

/// Convert images into grids of colored text glyphs
#[derive(Parser, Debug)]
#[command(name = "glyphgrid")]
#[command(version, about = "Convert images into colored glyph art", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Console log mode: 0 = silent, 1 = errors, 2 = errors and warnings, 3 = all
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub log_mode: Option<u8>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image to glyph art
    Convert(ConvertArgs),
    /// List font families found in the font search directories
    ListFonts,
    /// Print the filter kernel bank
    Kernels,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// BMP, GIF, JPEG, PNG or TIFF image to convert
    pub input: PathBuf,

    /// Output path; .htm/.html writes HTML, .bmp/.gif/.jpg/.jpeg/.png/.tif/.tiff an image
    pub output: PathBuf,

    /// Font family (default: a generic monospaced font)
    #[arg(long, short)]
    pub font: Option<String>,

    /// Font size in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub font_size: Option<u32>,

    /// Font style
    #[arg(long)]
    pub style: Option<Style>,

    /// Produce greyscale output
    #[arg(long)]
    pub grey: bool,

    /// Scale the output by this factor
    #[arg(long, value_parser = parse_scale)]
    pub scale: Option<f32>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
