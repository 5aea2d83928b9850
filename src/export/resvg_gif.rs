use std::fs::File;
use std::io::BufWriter;

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use rayon::prelude::*;

use crate::export::backend::{
    FrameStyling, RasterExportBackend, RasterFrame, RasterJob, ensure_dir, ensure_parent_dir,
};
use crate::foundation::error::{KanimateError, KanimateResult};

/// Straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
}

/// Parse a GIF background: `transparent`, `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_background(s: &str) -> KanimateResult<Rgba8> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("transparent") {
        return Ok(Rgba8::TRANSPARENT);
    }
    let invalid = || {
        KanimateError::configuration(format!(
            "background \"{s}\" must be \"transparent\", #RGB, #RRGGBB or #RRGGBBAA"
        ))
    };
    let hex = s.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let byte = |pair: &str| u8::from_str_radix(pair, 16).map_err(|_| invalid());
    let nibble = |c: &str| byte(c).map(|v| v * 17);

    match hex.len() {
        3 => Ok(Rgba8 {
            r: nibble(&hex[0..1])?,
            g: nibble(&hex[1..2])?,
            b: nibble(&hex[2..3])?,
            a: 255,
        }),
        6 | 8 => Ok(Rgba8 {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: if hex.len() == 8 { byte(&hex[6..8])? } else { 255 },
        }),
        _ => Err(invalid()),
    }
}

/// In-process raster export: `resvg` renders each frame and the `image`
/// crate encodes a looping GIF. Needs no external tools.
#[derive(Clone, Debug, Default)]
pub struct ResvgGifBackend {
    /// Worker threads for frame rendering; `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl ResvgGifBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_thread_pool(threads: Option<usize>) -> KanimateResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(KanimateError::configuration(
            "raster rendering threads must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| KanimateError::Other(anyhow::anyhow!("failed to build thread pool: {e}")))
}

/// Rasterize one frame document into a square straight-alpha image.
pub fn render_frame(svg: &str, size: u32, background: Rgba8) -> KanimateResult<RgbaImage> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| KanimateError::document(format!("frame is not renderable svg: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| KanimateError::configuration(format!("invalid raster size {size}")))?;
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(
        background.r,
        background.g,
        background.b,
        background.a,
    ));

    let sx = (size as f32) / tree.size().width();
    let sy = (size as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let mut data = Vec::with_capacity((size as usize) * (size as usize) * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(size, size, data)
        .ok_or_else(|| KanimateError::Other(anyhow::anyhow!("pixel buffer size mismatch")))
}

fn write_frame_documents(job: &RasterJob<'_>) -> KanimateResult<()> {
    ensure_dir(&job.work_dir)?;
    for f in job.frames {
        let path = job
            .work_dir
            .join(format!("{}_frame{:04}.svg", job.base_name, f.frame.index.0));
        std::fs::write(&path, &f.svg)
            .with_context(|| format!("write frame document '{}'", path.display()))?;
    }
    Ok(())
}

impl RasterExportBackend for ResvgGifBackend {
    fn name(&self) -> &'static str {
        "resvg"
    }

    fn frame_styling(&self) -> FrameStyling {
        FrameStyling::Inline
    }

    #[tracing::instrument(skip_all, fields(diagram = job.base_name, frames = job.frames.len()))]
    fn export(&mut self, job: &RasterJob<'_>) -> KanimateResult<()> {
        let background = parse_background(&job.raster.background)?;
        let size = job.raster.size;
        ensure_parent_dir(&job.output_path)?;
        if job.keep_temporary_files {
            write_frame_documents(job)?;
        }

        let pool = build_thread_pool(self.threads)?;
        let rendered = pool.install(|| {
            job.frames
                .par_iter()
                .map(|f: &RasterFrame| render_frame(&f.svg, size, background))
                .collect::<Vec<_>>()
        });

        let file = File::create(&job.output_path)
            .with_context(|| format!("create '{}'", job.output_path.display()))?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .context("configure gif encoder")?;

        for (f, image) in job.frames.iter().zip(rendered) {
            let delay = Delay::from_numer_denom_ms(f.frame.delay_centis() * 10, 1);
            encoder
                .encode_frame(Frame::from_parts(image?, 0, 0, delay))
                .with_context(|| format!("encode frame {}", f.frame.index.0))?;
        }
        tracing::info!(path = %job.output_path.display(), "wrote gif");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/resvg_gif.rs"]
mod tests;
