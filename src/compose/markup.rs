//! HTML output.
//!
//! Consecutive cells of one color within a row collapse into one `<span>`.
//! Colors used by at least two cells get a CSS class named after the index
//! of the cell where the color first appears (hex); the rest are styled
//! inline.

use std::collections::HashMap;
use std::fmt::Write;

use crate::color::Rgb;
use crate::transfer::ResultCell;

/// Document-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    pub font_family: String,
    /// Nominal font size in CSS pixels
    pub font_size: u32,
    pub background: Rgb,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: 8,
            background: Rgb::grey(0x11),
        }
    }
}

/// Markup-safe form of one glyph.
pub fn escape(ch: char) -> Option<&'static str> {
    match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Font family as it may appear inside a quoted CSS string in a `<style>`
/// block. Quotes, backslashes, angle brackets and control characters are
/// dropped.
pub fn css_font_family(family: &str) -> String {
    family
        .chars()
        .filter(|&c| !matches!(c, '"' | '\\' | '<' | '>') && !c.is_control())
        .collect()
}

/// Colors occurring at least twice, in first-seen order, with their class id.
pub fn color_classes(cells: &[ResultCell]) -> Vec<(Rgb, String)> {
    let mut seen: HashMap<Rgb, (usize, usize)> = HashMap::new();
    let mut order = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        let entry = seen.entry(cell.color).or_insert_with(|| {
            order.push(cell.color);
            (i, 0)
        });
        entry.1 += 1;
    }
    order
        .into_iter()
        .filter_map(|color| {
            let (first, count) = seen[&color];
            (count >= 2).then(|| (color, format!("{:x}", first)))
        })
        .collect()
}

/// Render a complete HTML document for `cells`.
pub fn render_markup(cells: &[ResultCell], options: &MarkupOptions) -> String {
    let classes = color_classes(cells);
    let class_of: HashMap<Rgb, &str> = classes.iter().map(|(c, id)| (*c, id.as_str())).collect();

    let mut html = String::with_capacity(256 + cells.len() * 2);
    html.push_str("<!-- Generated by glyphgrid -->\n\n");
    html.push_str("<!DOCTYPE html><html><head><style>\n");
    for (color, id) in &classes {
        let _ = writeln!(html, ".c{}{{color:{};}}", id, color);
    }
    let _ = writeln!(
        html,
        "\nbody{{font-family:\"{}\",monospace;font-size:{}px;background-color:{};white-space:pre;}}",
        css_font_family(&options.font_family),
        options.font_size,
        options.background
    );
    html.push_str("</style></head><body>\n");

    // color of the open span, if any
    let mut open: Option<Rgb> = None;
    for cell in cells {
        if cell.is_row_break() {
            if open.take().is_some() {
                html.push_str("</span>");
            }
            html.push_str("<br>");
            continue;
        }

        if open != Some(cell.color) {
            if open.is_some() {
                html.push_str("</span>");
            }
            match class_of.get(&cell.color) {
                Some(id) => {
                    let _ = write!(html, "<span class='c{}'>", id);
                }
                None => {
                    let _ = write!(html, "<span style='color:{};'>", cell.color);
                }
            }
            open = Some(cell.color);
        }

        let ch = cell.as_char();
        match escape(ch) {
            Some(entity) => html.push_str(entity),
            None => html.push(ch),
        }
    }
    if open.is_some() {
        html.push_str("</span>");
    }

    html.push_str("\n</body></html>\n");
    html
}
