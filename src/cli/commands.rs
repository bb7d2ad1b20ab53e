//! Subcommand handlers for convert, list-fonts, kernels and config actions.

use std::path::{Path, PathBuf};

use super::args::{ConfigAction, ConvertArgs};
use crate::config::{default_path as get_config_path, Config, DEFAULT_CONFIG};
use crate::engine::CpuEngine;
use crate::error::Error;
use crate::glyph::FontdueRasterizer;
use crate::job::{self, JobConfig, OutputKind};
use crate::kernel::KernelBank;

/// Fold command-line flags over the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &ConvertArgs) {
    if let Some(font) = &args.font {
        config.font.name = Some(font.clone());
    }
    if let Some(size) = args.font_size {
        config.font.size = size;
    }
    if let Some(style) = args.style {
        config.font.style = style.into();
    }
    if args.grey {
        config.render.grey = true;
    }
    if let Some(scale) = args.scale {
        config.render.scale = scale;
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Font rasterizer over the configured and platform font directories.
pub fn rasterizer(config: &Config) -> FontdueRasterizer {
    let mut search: Vec<PathBuf> = config.font.search_dirs.iter().map(|p| expand_home(p)).collect();
    search.extend(FontdueRasterizer::default_search_dirs());
    FontdueRasterizer::discover(&search, config.font.fallback.clone())
}

/// Convert one image file.
pub fn convert(args: &ConvertArgs, mut config: Config) -> Result<(), Error> {
    apply_overrides(&mut config, args);
    let job = JobConfig::from_config(&config, OutputKind::from_path(&args.output))?;

    let image = job::read_image(&args.input)?;
    let fonts = rasterizer(&config);
    let mut engine = CpuEngine::new(job.tone);

    let artifact = job::convert(&image, &job, &fonts, &mut engine)?;

    log::info!("Saving \"{}\"...", args.output.display());
    artifact.save(&args.output)?;
    Ok(())
}

/// List discovered font families and print them to stdout.
pub fn list_fonts(config: &Config) {
    let fonts = rasterizer(config);
    let families = fonts.families();
    if families.is_empty() {
        println!("No fonts found.");
        println!();
        println!("Add a directory containing .ttf or .otf files to [font] search_dirs.");
    } else {
        println!("Available fonts:");
        for family in families {
            println!("  {}", family);
        }
        println!();
        println!("Use --font <name> to select a font.");
    }
}

/// Print the kernel bank in matching order.
pub fn print_kernels() {
    for (i, kernel) in KernelBank::standard().iter().enumerate() {
        println!(
            "{}: {} ({}x{}, mult {}, invert {})",
            i,
            kernel.name,
            kernel.width,
            kernel.height,
            kernel.mult,
            if kernel.invert { "yes" } else { "no" }
        );
        for row in kernel.weights.chunks(kernel.width as usize) {
            let cells: Vec<String> = row.iter().map(|w| format!("{:>5}", w)).collect();
            println!("    {}", cells.join(" "));
        }
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>, config: &Config) {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!(
                "  Font: {}",
                config.font.name.as_deref().unwrap_or("(generic monospace)")
            );
            println!("  Font size: {}px", config.font.size);
            println!("  Style: {}", config.font.style);
            println!("  Fallback fonts: {}", config.font.fallback.join(", "));
            println!("  Greyscale: {}", if config.render.grey { "yes" } else { "no" });
            println!("  Scale: {}", config.render.scale);
            println!("  Background: {}", config.render.background);
            println!(
                "  Tone: scale {}, offset {}",
                config.tone.scale, config.tone.offset
            );
            println!("  Log mode: {}", config.log.mode);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                eprintln!("Config file already exists: {}", config_path.display());
                eprintln!("Use 'glyphgrid config show' to view current settings.");
                std::process::exit(1);
            }

            if let Some(parent) = config_path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Error creating config directory: {}", e);
                    std::process::exit(1);
                }
            }

            if let Err(e) = std::fs::write(&config_path, DEFAULT_CONFIG) {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }

            println!("Created config file: {}", config_path.display());
        }
    }
}
