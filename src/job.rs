//! One image conversion, start to finish.
//!
//! A [`JobConfig`] is built once from the merged configuration and never
//! changes afterwards. [`convert`] then runs the pipeline:
//!
//! 1. **Engine** - bring the compute engine up; failure aborts the job
//! 2. **Glyphs** - resolve the font and render the glyph set
//! 3. **Prepare** - optional greyscale, then the tone curve
//! 4. **Frame** - chunk the image and glyph templates, frame the kernels
//! 5. **Match** - one blocking engine call
//! 6. **Compose** - raster image or HTML document

use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::color::Rgb;
use crate::compose::{render_markup, MarkupOptions, RasterCompositor};
use crate::config::Config;
use crate::engine::{ComputeEngine, EngineRequest};
use crate::error::Error;
use crate::glyph::{FontRasterizer, FontRequest, GlyphSet};
use crate::kernel::KernelBank;
use crate::pixel::{PixelBuffer, ToneMap};
use crate::transfer::{encode_buffer, encode_kernels, encode_many, output_cell_count, zip_results};

/// Glyphs smaller than this are unreadable.
pub const MIN_RENDER_SIZE: u32 = 4;

/// What the job writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Markup,
    Raster(ImageFormat),
}

impl OutputKind {
    /// Pick the output type from a path's extension. Unknown extensions
    /// fall back to BMP with a warning.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "htm" | "html" => OutputKind::Markup,
            "bmp" => OutputKind::Raster(ImageFormat::Bmp),
            "gif" => OutputKind::Raster(ImageFormat::Gif),
            "jpg" | "jpeg" => OutputKind::Raster(ImageFormat::Jpeg),
            "png" => OutputKind::Raster(ImageFormat::Png),
            "tif" | "tiff" => OutputKind::Raster(ImageFormat::Tiff),
            _ => {
                log::warn!("Could not detect output file type. Defaulting to BMP.");
                OutputKind::Raster(ImageFormat::Bmp)
            }
        }
    }
}

/// Immutable settings for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    /// Font at its rendering size
    pub font: FontRequest,
    /// Font size as the user gave it, used for the HTML page
    pub nominal_font_size: u32,
    pub greyscale: bool,
    pub tone: ToneMap,
    pub background: u8,
    pub kernels: KernelBank,
    pub output: OutputKind,
}

impl JobConfig {
    pub fn from_config(config: &Config, output: OutputKind) -> Result<Self, Error> {
        config.validate()?;
        let nominal = config.font.size;
        let scale = config.render.scale;
        let render_size = (nominal as f32 / scale) as u32;
        if render_size < MIN_RENDER_SIZE {
            return Err(Error::ScaleTooLarge {
                font_size: nominal,
                scale,
            });
        }

        Ok(Self {
            font: FontRequest::new(
                config.font.name.clone().unwrap_or_default(),
                render_size,
                config.font.style,
            ),
            nominal_font_size: nominal,
            greyscale: config.render.grey,
            tone: config.tone,
            background: config.render.background,
            kernels: *KernelBank::standard(),
            output,
        })
    }
}

/// A finished conversion, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Markup(String),
    Raster {
        image: PixelBuffer,
        format: ImageFormat,
    },
}

impl Artifact {
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        match self {
            Artifact::Markup(html) => std::fs::write(path, html).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            }),
            Artifact::Raster { image, format } => image
                .to_rgb_image()
                .save_with_format(path, *format)
                .map_err(|source| Error::ImageWrite {
                    path: path.to_path_buf(),
                    source,
                }),
        }
    }
}

/// Decode an image file into a pixel buffer.
pub fn read_image(path: &Path) -> Result<PixelBuffer, Error> {
    let decoded = image::open(path).map_err(|source| Error::ImageRead {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(PixelBuffer::from_rgb_image(&decoded.to_rgb8()))
}

/// Frame a prepared image and glyph set for the engine.
pub fn build_request(image: &PixelBuffer, glyphs: &GlyphSet, kernels: &KernelBank) -> Result<EngineRequest, Error> {
    let cell = glyphs.cell_size();
    let request = EngineRequest {
        image: encode_buffer(image),
        kernels: encode_kernels(kernels)?,
        glyphs: encode_many(glyphs.templates()),
        char_map: glyphs.char_map(),
        cell,
        output_len: output_cell_count(image.width(), image.height(), cell),
    };
    log::debug!(
        "request: {} image chunks, {} glyph chunks for {} glyphs, {} kernels, {} cells",
        request.image.len(),
        request.glyphs.len(),
        request.char_map.len(),
        request.kernels.len(),
        request.output_len
    );
    Ok(request)
}

/// Convert `image` according to `job`.
///
/// The font is held only while the glyph set is rendered. Nothing is
/// produced unless every step succeeds.
pub fn convert(
    image: &PixelBuffer,
    job: &JobConfig,
    rasterizer: &dyn FontRasterizer,
    engine: &mut dyn ComputeEngine,
) -> Result<Artifact, Error> {
    if !engine.init() {
        return Err(Error::EngineUnavailable);
    }

    let glyphs = GlyphSet::build(rasterizer, &job.font)?;
    log::info!("Font is \"{}\" ({}px)", glyphs.family(), glyphs.size());

    let source = if job.greyscale {
        image.greyscale()
    } else {
        image.clone()
    };
    let prepared = job.tone.apply(&source);

    log::info!("Converting...");
    let request = build_request(&prepared, &glyphs, &job.kernels)?;
    let output = engine.match_glyphs(&request)?;
    let cells = zip_results(&output.characters, &output.colors, request.output_len)?;

    let artifact = match job.output {
        OutputKind::Markup => Artifact::Markup(render_markup(
            &cells,
            &MarkupOptions {
                font_family: glyphs.family().to_string(),
                font_size: job.nominal_font_size,
                background: Rgb::grey(job.background),
            },
        )),
        OutputKind::Raster(format) => Artifact::Raster {
            image: RasterCompositor::new(&glyphs)
                .with_background(job.background)
                .compose(&cells, image.width(), image.height()),
            format,
        },
    };
    Ok(artifact)
}
