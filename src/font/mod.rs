//! Font loading and cached glyph rendering
//!
//! Handles:
//! - TTF/OTF/TTC loading (rusttype)
//! - Glyph bitmap cache packed into growing atlases (etagere)
//! - Coverage -> color depth table for the destination format
//! - Left-to-right text runs blitted onto a 16-bit surface

pub mod atlas;
pub mod cache;
pub mod depth;
pub mod rasterizer;
pub mod system;
pub mod utf8;

use std::path::{Path, PathBuf};

use log::{info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blend::{composite_row, BlendMode};
use crate::constants::is_wide;
use crate::surface::{PixelFormat, Surface};
use cache::{GlyphCache, GlyphRecord};
use depth::{ColorDepthTable, DepthRamp};
use rasterizer::{GlyphIndex, Rasterizer, RustTypeRasterizer};
use utf8::Utf8Decoder;

/// Font errors
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse font (face index {index})")]
    Parse { index: u32 },
    #[error("glyph bitmap {width}x{height} does not fit in an empty atlas")]
    GlyphTooLarge { width: usize, height: usize },
}

/// How the requested pixel size maps to a font scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    /// The em square spans `size` pixels
    #[default]
    Em,
    /// Ascent to descent spans `size` pixels
    PixelHeight,
}

/// Rendering policy fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontOptions {
    pub size_mode: SizeMode,
    pub blend: BlendMode,
    pub ramp: DepthRamp,
}

/// A font at one pixel size with its glyph cache
///
/// Owns the rasterizer (and through it the font bytes), the glyph cache
/// and every atlas; all are dropped together. Rendering mutates the
/// cache, so shared use across threads needs external locking.
pub struct Font<R: Rasterizer = RustTypeRasterizer> {
    raster: R,
    /// Pixel size, also used as the baseline offset from the run origin
    size: i32,
    scale: f32,
    mono_width: u8,
    cache: GlyphCache,
    depth: ColorDepthTable,
    options: FontOptions,
}

impl Font<RustTypeRasterizer> {
    /// Load face `index` of `path` at `size` pixels
    ///
    /// `surface` is only probed for its pixel format.
    pub fn open(
        path: impl AsRef<Path>,
        size: u32,
        mono_width: u8,
        surface: &Surface,
        index: u32,
    ) -> Result<Self, FontError> {
        let options = FontOptions::default();
        Self::open_with_options(path, size, mono_width, surface.format(), index, options)
    }

    pub fn open_with_options(
        path: impl AsRef<Path>,
        size: u32,
        mono_width: u8,
        format: PixelFormat,
        index: u32,
        options: FontOptions,
    ) -> Result<Self, FontError> {
        let path = path.as_ref();
        let raster = RustTypeRasterizer::open(path, index)?;
        let font = Self::with_rasterizer(raster, size, mono_width, format, options);
        info!(
            "Font loaded: {} (face {}, {}px, scale {:.5}, mono width {})",
            path.display(),
            index,
            size,
            font.scale,
            mono_width
        );
        Ok(font)
    }
}

impl<R: Rasterizer> Font<R> {
    /// Build a font over an already initialised rasterizer
    pub fn with_rasterizer(
        raster: R,
        size: u32,
        mono_width: u8,
        format: PixelFormat,
        options: FontOptions,
    ) -> Self {
        let scale = match options.size_mode {
            SizeMode::Em => raster.scale_for_em_to_pixels(size as f32),
            SizeMode::PixelHeight => raster.scale_for_pixel_height(size as f32),
        };

        Self {
            raster,
            size: size as i32,
            scale,
            mono_width,
            cache: GlyphCache::new(),
            depth: ColorDepthTable::new(format, options.ramp),
            options,
        }
    }

    /// Draw `text` left to right with its top-left at (x, y)
    ///
    /// Decoding stops at a NUL byte, the end of `text`, or malformed
    /// UTF-8; everything before that is drawn. Pixels falling outside
    /// the surface are clipped. Returns the pen x after the run;
    /// positions saturate at the `i32` range.
    pub fn render(
        &mut self,
        surface: &mut Surface,
        x: i32,
        y: i32,
        text: impl AsRef<[u8]>,
    ) -> Result<i32, FontError> {
        let mut pen = x;
        for cp in Utf8Decoder::new(text.as_ref()) {
            let glyph = self.raster.glyph_index(cp);
            let record = self.cache.lookup_or_create(&self.raster, self.scale, glyph)?;

            let ox = pen.saturating_add(record.left_bearing as i32);
            let oy = y.saturating_add(self.size).saturating_add(record.iy0 as i32);
            self.blit(surface, &record, ox, oy);

            pen = pen.saturating_add(self.advance_for(&record, cp));
        }
        Ok(pen)
    }

    /// Pen advance of `text` without drawing (fills the cache)
    pub fn measure(&mut self, text: impl AsRef<[u8]>) -> Result<i32, FontError> {
        let mut width = 0i32;
        for cp in Utf8Decoder::new(text.as_ref()) {
            let glyph = self.raster.glyph_index(cp);
            let record = self.cache.lookup_or_create(&self.raster, self.scale, glyph)?;
            width = width.saturating_add(self.advance_for(&record, cp));
        }
        Ok(width)
    }

    /// max(glyph advance, monospace cell), doubled cell for wide code points
    fn advance_for(&self, record: &GlyphRecord, cp: u32) -> i32 {
        let cell = if is_wide(cp) {
            self.mono_width as i32 * 2
        } else {
            self.mono_width as i32
        };
        (record.advance as i32).max(cell)
    }

    fn blit(&self, surface: &mut Surface, record: &GlyphRecord, ox: i32, oy: i32) {
        if record.is_empty() {
            return;
        }

        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = ox.saturating_add(record.width as i32).min(surface.width() as i32);
        let y1 = oy.saturating_add(record.height as i32).min(surface.height() as i32);
        if x0 >= x1 || y0 >= y1 {
            trace!("Glyph at ({}, {}) fully clipped", ox, oy);
            return;
        }

        let stride = surface.stride();
        let format = surface.format();
        let (sx0, sx1) = ((x0 - ox) as usize, (x1 - ox) as usize);
        let pixels = surface.pixels_mut();

        for dy in y0..y1 {
            let src = &self.cache.coverage_row(record, (dy - oy) as usize)[sx0..sx1];
            let start = dy as usize * stride + x0 as usize;
            let dst = &mut pixels[start..start + (sx1 - sx0)];
            composite_row(self.options.blend, format, &self.depth, dst, src);
        }
    }

    pub fn glyph_index(&self, codepoint: u32) -> GlyphIndex {
        self.raster.glyph_index(codepoint)
    }

    /// Cached record for a glyph, if it has been rendered
    pub fn glyph_record(&self, glyph: GlyphIndex) -> Option<&GlyphRecord> {
        self.cache.get(glyph)
    }

    pub fn cached_glyphs(&self) -> usize {
        self.cache.len()
    }

    pub fn atlas_count(&self) -> usize {
        self.cache.atlases().len()
    }

    /// Coverage bytes of atlas `index`
    pub fn atlas_pixels(&self, index: usize) -> Option<&[u8]> {
        self.cache.atlases().get(index).map(|a| a.pixels())
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn size(&self) -> u32 {
        self.size as u32
    }

    pub fn mono_width(&self) -> u8 {
        self.mono_width
    }

    pub fn options(&self) -> FontOptions {
        self.options
    }

    pub fn depth_table(&self) -> &ColorDepthTable {
        &self.depth
    }

    pub fn rasterizer(&self) -> &R {
        &self.raster
    }
}
