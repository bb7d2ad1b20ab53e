//! Turning the engine's flat result stream into artifacts.
//!
//! 1. **Raster** - glyph templates painted on an image-sized canvas
//! 2. **Markup** - an HTML document with run-length colored spans
//!
//! Both recover rows from the `'\n'` sentinels in the character stream.

mod markup;
mod raster;

pub use markup::{color_classes, css_font_family, escape, render_markup, MarkupOptions};
pub use raster::{Placement, RasterCompositor, RasterLayout, DEFAULT_BACKGROUND};
