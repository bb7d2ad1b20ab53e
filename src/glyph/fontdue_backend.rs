//! Font files on disk, rasterized with fontdue.
//!
//! Fonts are discovered by scanning directories for `.ttf`/`.otf`/`.ttc`
//! files. A file's family and style come from its stem: `DejaVuSansMono-Bold`
//! is family `DejaVuSansMono`, style bold. Family lookups ignore case, spaces
//! and punctuation, so `"DejaVu Sans Mono"` finds it.

use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};

use super::font::{Coverage, FontRasterizer, FontStyle, LoadedFont};
use super::{is_monospaced, GlyphError};
use crate::transfer::CellSize;

/// Families tried, in order, when the requested font is unusable.
pub const DEFAULT_FALLBACK_FAMILIES: &[&str] = &[
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Ubuntu Mono",
    "Menlo",
    "Consolas",
    "Courier New",
];

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// One font file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    /// Family as spelled in the file name
    pub family: String,
    pub style: FontStyle,
    pub path: PathBuf,
    key: String,
}

impl FontFace {
    /// Derive family and style from a font file path, or `None` when it is
    /// not a font file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if !FONT_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let (family, suffix) = match stem.rsplit_once('-') {
            Some((family, suffix)) if !family.is_empty() => (family, suffix),
            _ => (stem, ""),
        };
        Some(Self {
            family: family.to_string(),
            style: parse_style(suffix),
            path: path.to_path_buf(),
            key: family_key(family),
        })
    }

    fn matches(&self, family: &str) -> bool {
        self.key == family_key(family)
    }
}

fn parse_style(suffix: &str) -> FontStyle {
    let lower = suffix.to_ascii_lowercase();
    // short suffixes, e.g. UbuntuMono-RI
    match lower.as_str() {
        "r" => return FontStyle::Regular,
        "b" => return FontStyle::Bold,
        "i" | "ri" => return FontStyle::Italic,
        "bi" | "ib" => return FontStyle::BoldItalic,
        _ => {}
    }
    let bold = lower.contains("bold");
    let italic = lower.contains("italic") || lower.contains("oblique");
    match (bold, italic) {
        (true, true) => FontStyle::BoldItalic,
        (true, false) => FontStyle::Bold,
        (false, true) => FontStyle::Italic,
        (false, false) => FontStyle::Regular,
    }
}

fn family_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Fonts available in a set of directories.
#[derive(Debug, Clone, Default)]
pub struct FontdueRasterizer {
    faces: Vec<FontFace>,
    fallback_families: Vec<String>,
}

impl FontdueRasterizer {
    /// Scan `dirs` recursively. Unreadable directories are skipped.
    pub fn discover(dirs: &[PathBuf], fallback_families: Vec<String>) -> Self {
        let mut faces = Vec::new();
        for dir in dirs {
            scan_dir(dir, &mut faces);
        }
        faces.sort_by(|a, b| a.family.cmp(&b.family).then(a.path.cmp(&b.path)));
        log::debug!("found {} font files in {} directories", faces.len(), dirs.len());
        Self {
            faces,
            fallback_families,
        }
    }

    /// Platform font directories that exist on this machine.
    pub fn default_search_dirs() -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = Vec::new();
        if let Some(user) = dirs::font_dir() {
            found.push(user);
        }
        if let Some(home) = dirs::home_dir() {
            found.push(home.join(".fonts"));
        }
        for system in [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/System/Library/Fonts",
            "/Library/Fonts",
            "C:\\Windows\\Fonts",
        ] {
            found.push(PathBuf::from(system));
        }
        found.retain(|d| d.is_dir());
        found.dedup();
        found
    }

    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    /// Distinct family names, sorted.
    pub fn families(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.faces.iter().map(|f| f.family.as_str()).collect();
        names.dedup();
        names
    }

    /// Best file for `family`: the exact style, else regular, else any.
    fn find(&self, family: &str, style: FontStyle) -> Option<&FontFace> {
        let candidates: Vec<&FontFace> = self.faces.iter().filter(|f| f.matches(family)).collect();
        candidates
            .iter()
            .find(|f| f.style == style)
            .or_else(|| candidates.iter().find(|f| f.style == FontStyle::Regular))
            .or_else(|| candidates.first())
            .copied()
    }

    fn load(&self, family: &str, style: FontStyle, size: u32) -> Result<Option<FontdueFont>, GlyphError> {
        match self.find(family, style) {
            Some(face) => FontdueFont::load(face, size).map(Some),
            None => Ok(None),
        }
    }
}

fn scan_dir(dir: &Path, faces: &mut Vec<FontFace>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("skipping font directory {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(&path, faces);
        } else if let Some(face) = FontFace::from_path(&path) {
            faces.push(face);
        }
    }
}

impl FontRasterizer for FontdueRasterizer {
    fn open(&self, family: &str, style: FontStyle, size: u32) -> Option<Box<dyn LoadedFont>> {
        match self.load(family, style, size) {
            Ok(font) => font.map(|f| Box::new(f) as Box<dyn LoadedFont>),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    fn open_generic_monospace(
        &self,
        style: FontStyle,
        size: u32,
    ) -> Result<Box<dyn LoadedFont>, GlyphError> {
        for family in &self.fallback_families {
            match self.load(family, style, size) {
                Ok(Some(font)) if is_monospaced(&font) => {
                    log::info!("using fallback font \"{}\"", font.family());
                    return Ok(Box::new(font));
                }
                Ok(_) => {}
                Err(e) => log::warn!("{}", e),
            }
        }
        Err(GlyphError::NoMonospaceFont {
            tried: self.fallback_families.clone(),
        })
    }
}

/// A parsed font file at a fixed pixel size.
pub struct FontdueFont {
    family: String,
    font: Font,
    size: f32,
}

impl FontdueFont {
    pub fn load(face: &FontFace, size: u32) -> Result<Self, GlyphError> {
        let bytes = fs::read(&face.path).map_err(|e| GlyphError::FontLoad {
            path: face.path.clone(),
            reason: e.to_string(),
        })?;
        let settings = FontSettings {
            scale: size as f32,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings).map_err(|e| GlyphError::FontLoad {
            path: face.path.clone(),
            reason: e.to_string(),
        })?;
        log::debug!("loaded {} ({}) at {}px", face.family, face.style, size);
        Ok(Self {
            family: face.family.clone(),
            font,
            size: size as f32,
        })
    }

    /// Baseline offset from the top of the line box.
    fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map_or(self.size * 0.8, |m| m.ascent)
    }
}

impl LoadedFont for FontdueFont {
    fn family(&self) -> &str {
        &self.family
    }

    fn advance_width(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.size).advance_width
    }

    fn line_height(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map_or(self.size, |m| m.new_line_size)
    }

    fn render(&self, ch: char, cell: CellSize) -> Result<Coverage, GlyphError> {
        let (metrics, bitmap) = self.font.rasterize(ch, self.size);
        let mut coverage = Coverage::blank(cell);

        let baseline = self.ascent().round() as i64;
        let top = baseline - (metrics.ymin as i64 + metrics.height as i64);
        let left = metrics.xmin as i64;

        for gy in 0..metrics.height {
            let y = top + gy as i64;
            if y < 0 || y >= cell.height as i64 {
                continue;
            }
            for gx in 0..metrics.width {
                let x = left + gx as i64;
                if x < 0 || x >= cell.width as i64 {
                    continue;
                }
                let i = y as usize * cell.width as usize + x as usize;
                coverage.data[i] = coverage.data[i].max(bitmap[gy * metrics.width + gx]);
            }
        }
        Ok(coverage)
    }
}
