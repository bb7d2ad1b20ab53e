//! Building a glyph set from a font.

use std::collections::BTreeMap;

use super::font::{FontRasterizer, FontRequest, LoadedFont};
use super::GlyphError;
use crate::color::Rgb;
use crate::pixel::PixelBuffer;
use crate::transfer::CellSize;

/// Code point rendered as the "this font has no such glyph" reference.
/// It is a control character, so no font draws anything meaningful for it.
pub const MISSING_GLYPH_PROBE: char = '\u{1}';

/// Background grey of every glyph template.
pub const TEMPLATE_BACKGROUND: u8 = 0x11;

/// The two visually different characters compared for monospacing.
pub const MONOSPACE_PROBES: [char; 2] = ['!', '@'];

/// Character whose advance defines the cell width.
const CELL_PROBE: char = '@';

/// Paper color backends paint on before the template is inverted.
const PAPER: u8 = 255 - TEMPLATE_BACKGROUND;

/// Candidate characters: space, then 33..=255 minus the C1 control block
/// and DEL.
pub fn candidate_chars() -> impl Iterator<Item = char> {
    (32u8..=255).map(char::from).filter(|&c| is_candidate(c))
}

/// Whether `ch` is in the candidate range and so may key a template.
pub fn is_candidate(ch: char) -> bool {
    matches!(ch as u32, 32..=126 | 160..=255)
}

/// Whether the advance widths of [`MONOSPACE_PROBES`] agree.
pub fn is_monospaced(font: &dyn LoadedFont) -> bool {
    let [a, b] = MONOSPACE_PROBES;
    (font.advance_width(a) - font.advance_width(b)).abs() < 0.01
}

/// Character code -> template for one font at one size.
///
/// Keys iterate in ascending code point order. Every template has the same
/// cell size and the space character is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSet {
    family: String,
    size: u32,
    cell: CellSize,
    glyphs: BTreeMap<char, PixelBuffer>,
}

impl GlyphSet {
    /// Resolve the requested font (falling back to the generic monospace
    /// font when it is missing or proportional) and render its glyphs.
    pub fn build(rasterizer: &dyn FontRasterizer, request: &FontRequest) -> Result<Self, GlyphError> {
        let font = resolve_font(rasterizer, request)?;
        Self::from_font(font.as_ref(), request.size)
    }

    /// Render every supported candidate character of an opened font.
    pub fn from_font(font: &dyn LoadedFont, size: u32) -> Result<Self, GlyphError> {
        let cell = measure_cell(font)?;
        let missing = render_template(font, MISSING_GLYPH_PROBE, cell)?;

        let mut glyphs = BTreeMap::new();
        let mut unsupported = 0;
        for ch in candidate_chars() {
            let template = render_template(font, ch, cell)?;
            if template == missing {
                unsupported += 1;
                continue;
            }
            glyphs.insert(ch, template);
        }
        log::debug!(
            "\"{}\": {} glyphs rendered at {}x{}, {} unsupported",
            font.family(),
            glyphs.len(),
            cell.width,
            cell.height,
            unsupported
        );

        Self::from_parts(font.family(), size, cell, glyphs)
    }

    /// Assemble a set from pre-rendered templates.
    ///
    /// Every template must be exactly `cell` sized. A blank space template is
    /// added when none is given.
    pub fn from_parts(
        family: impl Into<String>,
        size: u32,
        cell: CellSize,
        mut glyphs: BTreeMap<char, PixelBuffer>,
    ) -> Result<Self, GlyphError> {
        if cell.width == 0 || cell.height == 0 {
            return Err(GlyphError::EmptyCell {
                family: family.into(),
            });
        }
        if let Some(&ch) = glyphs.keys().find(|&&c| !is_candidate(c)) {
            return Err(GlyphError::UnsupportedCharacter { ch });
        }
        if let Some((&ch, t)) = glyphs
            .iter()
            .find(|(_, t)| (t.width(), t.height()) != (cell.width, cell.height))
        {
            return Err(GlyphError::TemplateSize {
                ch,
                expected: (cell.width, cell.height),
                actual: (t.width(), t.height()),
            });
        }
        glyphs
            .entry(' ')
            .or_insert_with(|| PixelBuffer::filled(cell.width, cell.height, TEMPLATE_BACKGROUND));

        Ok(Self {
            family: family.into(),
            size,
            cell,
            glyphs,
        })
    }

    /// Family of the font actually used, after any fallback.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Pixel size the glyphs were rendered at.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: the space glyph is guaranteed.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    pub fn get(&self, ch: char) -> Option<&PixelBuffer> {
        self.glyphs.get(&ch)
    }

    /// Characters in iteration order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.glyphs.keys().copied()
    }

    /// Templates in the same order as [`chars`](Self::chars).
    pub fn templates(&self) -> impl Iterator<Item = &PixelBuffer> + '_ {
        self.glyphs.values()
    }

    /// Template index -> character code, aligned with
    /// [`templates`](Self::templates).
    pub fn char_map(&self) -> Vec<u8> {
        self.glyphs
            .keys()
            .filter_map(|&c| u8::try_from(c).ok())
            .collect()
    }
}

fn resolve_font(
    rasterizer: &dyn FontRasterizer,
    request: &FontRequest,
) -> Result<Box<dyn LoadedFont>, GlyphError> {
    if !request.family.is_empty() {
        match rasterizer.open(&request.family, request.style, request.size) {
            Some(font) if is_monospaced(font.as_ref()) => return Ok(font),
            Some(font) => log::warn!(
                "The chosen font \"{}\" is not monospaced. Reverting to a generic monospaced font.",
                font.family()
            ),
            None => log::warn!(
                "The chosen font \"{}\" cannot be found. Reverting to a generic monospaced font.",
                request.family
            ),
        }
    }
    rasterizer.open_generic_monospace(request.style, request.size)
}

fn measure_cell(font: &dyn LoadedFont) -> Result<CellSize, GlyphError> {
    let width = font.advance_width(CELL_PROBE).ceil();
    let height = font.line_height().ceil();
    if !(width >= 1.0 && height >= 1.0) {
        return Err(GlyphError::EmptyCell {
            family: font.family().to_string(),
        });
    }
    Ok(CellSize::new(width as u32, height as u32))
}

/// Paint `ch` as dark ink on light paper, then invert so the template is a
/// bright mark on a [`TEMPLATE_BACKGROUND`] field.
fn render_template(font: &dyn LoadedFont, ch: char, cell: CellSize) -> Result<PixelBuffer, GlyphError> {
    let coverage = font.render(ch, cell)?;
    if (coverage.width, coverage.height) != (cell.width, cell.height)
        || coverage.data.len() != cell.width as usize * cell.height as usize
    {
        return Err(GlyphError::SurfaceSize {
            ch,
            expected: (cell.width, cell.height),
            actual: (coverage.width, coverage.height),
        });
    }

    let mut surface = PixelBuffer::filled(cell.width, cell.height, PAPER);
    for y in 0..cell.height {
        for x in 0..cell.width {
            let ink = coverage.at(x, y) as u32;
            if ink > 0 {
                let level = PAPER - (ink * PAPER as u32 / 255) as u8;
                surface.set_pixel(x, y, Rgb::grey(level));
            }
        }
    }
    Ok(surface.invert())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::font::{Coverage, FontStyle};

    /// A 4x6 font that draws a vertical bar whose column depends on the
    /// character, and a box for anything outside `supported`.
    struct BarFont {
        family: &'static str,
        supported: fn(char) -> bool,
        proportional: bool,
    }

    impl LoadedFont for BarFont {
        fn family(&self) -> &str {
            self.family
        }

        fn advance_width(&self, ch: char) -> f32 {
            if self.proportional && ch == '!' {
                2.0
            } else {
                4.0
            }
        }

        fn line_height(&self) -> f32 {
            5.5
        }

        fn render(&self, ch: char, cell: CellSize) -> Result<Coverage, GlyphError> {
            let mut cov = Coverage::blank(cell);
            if ch == ' ' {
                return Ok(cov);
            }
            if (self.supported)(ch) {
                let col = (ch as u32) % cell.width;
                let row = (ch as u32 / cell.width) % cell.height;
                for y in 0..cell.height {
                    cov.data[(y * cell.width + col) as usize] = 255;
                }
                cov.data[(row * cell.width + (col + 1) % cell.width) as usize] = 128;
            } else {
                for x in 0..cell.width {
                    cov.data[x as usize] = 255;
                    cov.data[((cell.height - 1) * cell.width + x) as usize] = 255;
                }
            }
            Ok(cov)
        }
    }

    struct BarRasterizer;

    impl FontRasterizer for BarRasterizer {
        fn open(&self, family: &str, _style: FontStyle, _size: u32) -> Option<Box<dyn LoadedFont>> {
            match family {
                "Ascii Bars" => Some(Box::new(BarFont {
                    family: "Ascii Bars",
                    supported: |c| c.is_ascii() && !c.is_ascii_control(),
                    proportional: false,
                })),
                "Wobbly Sans" => Some(Box::new(BarFont {
                    family: "Wobbly Sans",
                    supported: |c| !c.is_control(),
                    proportional: true,
                })),
                _ => None,
            }
        }

        fn open_generic_monospace(
            &self,
            _style: FontStyle,
            _size: u32,
        ) -> Result<Box<dyn LoadedFont>, GlyphError> {
            Ok(Box::new(BarFont {
                family: "Generic Bars",
                supported: |c| c.is_ascii_alphanumeric(),
                proportional: false,
            }))
        }
    }

    #[test]
    fn test_candidate_range() {
        let chars: Vec<char> = candidate_chars().collect();
        assert_eq!(chars.first(), Some(&' '));
        assert_eq!(chars.last(), Some(&'\u{ff}'));
        assert!(chars.contains(&'~'));
        assert!(!chars.contains(&'\u{7f}'));
        assert!(!chars.contains(&'\u{85}'));
        assert!(chars.contains(&'\u{a0}'));
        assert_eq!(chars.len(), 224 - 33);
    }

    #[test]
    fn test_unsupported_glyphs_are_filtered() {
        let set = GlyphSet::build(&BarRasterizer, &FontRequest::new("Ascii Bars", 8, FontStyle::Regular)).unwrap();
        assert_eq!(set.family(), "Ascii Bars");
        assert!(set.contains('A'));
        assert!(set.contains('~'));
        assert!(!set.contains('\u{e9}'));
        // 95 printable ASCII including space
        assert_eq!(set.len(), 95);
    }

    #[test]
    fn test_cell_size_from_probe() {
        let set = GlyphSet::build(&BarRasterizer, &FontRequest::new("Ascii Bars", 8, FontStyle::Regular)).unwrap();
        assert_eq!(set.cell_size(), CellSize::new(4, 6));
        assert!(set
            .templates()
            .all(|t| (t.width(), t.height()) == (4, 6)));
    }

    #[test]
    fn test_templates_are_bright_on_dark() {
        let set = GlyphSet::build(&BarRasterizer, &FontRequest::new("Ascii Bars", 8, FontStyle::Regular)).unwrap();
        let a = set.get('A').unwrap();
        let col = 'A' as u32 % 4;
        assert_eq!(a.pixel(col, 0), Rgb::WHITE);
        let other = (col + 2) % 4;
        assert_eq!(a.pixel(other, 3), Rgb::grey(TEMPLATE_BACKGROUND));
    }

    #[test]
    fn test_space_is_blank() {
        let set = GlyphSet::build(&BarRasterizer, &FontRequest::new("Ascii Bars", 8, FontStyle::Regular)).unwrap();
        assert_eq!(
            set.get(' ').unwrap(),
            &PixelBuffer::filled(4, 6, TEMPLATE_BACKGROUND)
        );
    }

    #[test]
    fn test_missing_font_falls_back() {
        let set = GlyphSet::build(&BarRasterizer, &FontRequest::new("Nope", 8, FontStyle::Bold)).unwrap();
        assert_eq!(set.family(), "Generic Bars");
        assert!(set.contains('z'));
        assert!(!set.contains('!'));
        // generic font renders space blank, which is not the missing box
        assert!(set.contains(' '));
    }

    #[test]
    fn test_proportional_font_falls_back() {
        let set = GlyphSet::build(&BarRasterizer, &FontRequest::new("Wobbly Sans", 8, FontStyle::Regular)).unwrap();
        assert_eq!(set.family(), "Generic Bars");
    }

    #[test]
    fn test_empty_family_uses_generic() {
        let set = GlyphSet::build(&BarRasterizer, &FontRequest::new("", 8, FontStyle::Regular)).unwrap();
        assert_eq!(set.family(), "Generic Bars");
    }

    #[test]
    fn test_char_map_matches_template_order() {
        let set = GlyphSet::build(&BarRasterizer, &FontRequest::new("Ascii Bars", 8, FontStyle::Regular)).unwrap();
        let map = set.char_map();
        assert_eq!(map.len(), set.len());
        assert_eq!(map[0], b' ');
        assert!(map.windows(2).all(|w| w[0] < w[1]));
        for (code, template) in map.iter().zip(set.templates()) {
            assert_eq!(set.get(char::from(*code)), Some(template));
        }
    }

    #[test]
    fn test_from_parts_synthesizes_space() {
        let mut glyphs = BTreeMap::new();
        glyphs.insert('#', PixelBuffer::filled(2, 3, 255));
        let set = GlyphSet::from_parts("Test", 8, CellSize::new(2, 3), glyphs).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(' ').unwrap(), &PixelBuffer::filled(2, 3, TEMPLATE_BACKGROUND));
    }

    #[test]
    fn test_from_parts_enforces_cell_size() {
        let mut glyphs = BTreeMap::new();
        glyphs.insert('#', PixelBuffer::filled(3, 3, 255));
        let err = GlyphSet::from_parts("Test", 8, CellSize::new(2, 3), glyphs).unwrap_err();
        assert!(matches!(err, GlyphError::TemplateSize { ch: '#', .. }));
    }

    #[test]
    fn test_from_parts_rejects_keys_outside_range() {
        for ch in ['\n', '\u{7f}', '\u{85}', '\u{100}'] {
            let mut glyphs = BTreeMap::new();
            glyphs.insert('#', PixelBuffer::filled(2, 2, 255));
            glyphs.insert(ch, PixelBuffer::filled(2, 2, 255));
            let err = GlyphSet::from_parts("Test", 8, CellSize::new(2, 2), glyphs).unwrap_err();
            assert!(matches!(err, GlyphError::UnsupportedCharacter { ch: c } if c == ch));
        }
    }

    #[test]
    fn test_char_map_codes_are_exact() {
        let mut glyphs = BTreeMap::new();
        glyphs.insert('~', PixelBuffer::filled(2, 2, 255));
        glyphs.insert('\u{ff}', PixelBuffer::filled(2, 2, 255));
        let set = GlyphSet::from_parts("Test", 8, CellSize::new(2, 2), glyphs).unwrap();
        assert_eq!(set.char_map(), vec![b' ', b'~', 0xff]);
        assert!(is_candidate('\u{a0}'));
        assert!(!is_candidate('\u{9f}'));
    }
}
