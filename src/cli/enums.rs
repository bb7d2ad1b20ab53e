//! CLI enum types for the font style option.

use clap::ValueEnum;

use crate::glyph::FontStyle;

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Style {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl From<Style> for FontStyle {
    fn from(s: Style) -> Self {
        match s {
            Style::Regular => FontStyle::Regular,
            Style::Bold => FontStyle::Bold,
            Style::Italic => FontStyle::Italic,
            Style::BoldItalic => FontStyle::BoldItalic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_to_font_style() {
        assert_eq!(FontStyle::from(Style::Regular), FontStyle::Regular);
        assert_eq!(FontStyle::from(Style::Bold), FontStyle::Bold);
        assert_eq!(FontStyle::from(Style::Italic), FontStyle::Italic);
        assert_eq!(FontStyle::from(Style::BoldItalic), FontStyle::BoldItalic);
    }

    #[test]
    fn test_style_value_names_match_config() {
        for style in Style::value_variants() {
            let name = style.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(name, FontStyle::from(*style).name());
        }
    }
}
