//! Loading configuration files from disk.

use std::fs;

use glyphgrid::config::{Config, ConfigError, DEFAULT_CONFIG};
use glyphgrid::glyph::FontStyle;
use glyphgrid::job::{JobConfig, OutputKind};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[font]
name = "DejaVu Sans Mono"
size = 12
style = "bold"
search_dirs = ["/opt/fonts"]

[render]
grey = true
scale = 1.5
background = 0

[tone]
scale = 1.0
offset = 0

[log]
mode = 1
"#,
    );

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.font.name.as_deref(), Some("DejaVu Sans Mono"));
    assert_eq!(config.font.size, 12);
    assert_eq!(config.font.style, FontStyle::Bold);
    assert_eq!(config.font.search_dirs, vec![std::path::PathBuf::from("/opt/fonts")]);
    assert!(config.render.grey);
    assert_eq!(config.render.scale, 1.5);
    assert_eq!(config.render.background, 0);
    assert_eq!(config.tone.offset, 0);
    assert_eq!(config.log.level_filter(), log::LevelFilter::Error);

    let job = JobConfig::from_config(&config, OutputKind::Markup).unwrap();
    assert_eq!(job.font.size, 8);
    assert_eq!(job.nominal_font_size, 12);
    assert!(job.greyscale);
}

#[test]
fn test_written_template_loads_as_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, DEFAULT_CONFIG);
    assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[render]\ngrey = true\n");
    let config = Config::load(Some(&path)).unwrap();
    assert!(config.render.grey);
    assert_eq!(config.render.scale, 1.0);
    assert_eq!(config.font, Config::default().font);
    assert_eq!(config.log.mode, 3);
}

#[test]
fn test_explicit_missing_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = Config::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::IoError { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[font\nsize = ");
    assert!(matches!(
        Config::load(Some(&path)),
        Err(ConfigError::ParseError { .. })
    ));

    let path = write_config(&dir, "[font]\nsize = \"big\"\n");
    assert!(matches!(
        Config::load(Some(&path)),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_out_of_range_values_are_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[log]\nmode = 7\n");
    assert!(matches!(
        Config::load(Some(&path)),
        Err(ConfigError::Invalid { field: "log.mode", .. })
    ));
}
