//! Glyph rasterizer interface
//!
//! The glyph cache only needs five operations from a font library:
//! scale selection, code point lookup, horizontal metrics, the pixel
//! bounding box of a positioned glyph, and writing that glyph's 8-bit
//! coverage bitmap into a strided buffer. [`Rasterizer`] captures those;
//! [`RustTypeRasterizer`] implements them over `rusttype`.

use std::path::Path;

use log::info;
use rusttype::{point, Font as RtFont, GlyphId, Scale};

use super::FontError;

/// Rasterizer-internal glyph index (0 = missing glyph)
pub type GlyphIndex = u16;

/// Unscaled horizontal metrics (font units)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HMetrics {
    pub advance: f32,
    pub left_bearing: f32,
}

/// Pixel bounding box of a rasterized glyph, relative to the pen
/// position on the baseline (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitmapBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BitmapBox {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Font rasterization backend
pub trait Rasterizer {
    /// Scale mapping the em square to `pixels`
    fn scale_for_em_to_pixels(&self, pixels: f32) -> f32;

    /// Scale mapping ascent-to-descent height to `pixels`
    fn scale_for_pixel_height(&self, pixels: f32) -> f32;

    /// Glyph for a code point (0 if the font has none)
    fn glyph_index(&self, codepoint: u32) -> GlyphIndex;

    fn h_metrics(&self, glyph: GlyphIndex) -> HMetrics;

    /// Bounding box of the glyph at `scale`, shifted by `subpixel` (x, y)
    fn bitmap_box(&self, glyph: GlyphIndex, scale: f32, subpixel: (f32, f32)) -> BitmapBox;

    /// Write the coverage bitmap of the glyph into `out`
    ///
    /// `out` starts at the top-left of the box returned by `bitmap_box`
    /// with the same arguments. Rows are `stride` bytes apart; only the
    /// `width` x `height` region is written.
    #[allow(clippy::too_many_arguments)]
    fn write_bitmap(
        &self,
        glyph: GlyphIndex,
        scale: f32,
        subpixel: (f32, f32),
        out: &mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    );
}

/// `rusttype` backed rasterizer owning the font file bytes
pub struct RustTypeRasterizer {
    font: RtFont<'static>,
    /// Ascent minus descent in font units (rusttype scales by this height)
    unit_height: f32,
    units_per_em: f32,
}

impl RustTypeRasterizer {
    /// Parse face `index` of a font file (TTF/OTF or a TTC collection)
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self, FontError> {
        let font = RtFont::try_from_vec_and_index(data, index).ok_or(FontError::Parse { index })?;
        let vm = font.v_metrics_unscaled();
        let unit_height = vm.ascent - vm.descent;
        let units_per_em = f32::from(font.units_per_em());
        if unit_height <= 0.0 || units_per_em <= 0.0 {
            return Err(FontError::Parse { index });
        }

        info!(
            "Face {} parsed: {} glyphs, {} units/em",
            index,
            font.glyph_count(),
            units_per_em
        );

        Ok(Self {
            font,
            unit_height,
            units_per_em,
        })
    }

    /// Read and parse a font file
    pub fn open(path: &Path, index: u32) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, index)
    }

    /// rusttype takes a pixel height instead of a raw scale factor
    fn rt_scale(&self, scale: f32) -> Scale {
        Scale::uniform(scale * self.unit_height)
    }

    fn positioned(
        &self,
        glyph: GlyphIndex,
        scale: f32,
        subpixel: (f32, f32),
    ) -> rusttype::PositionedGlyph<'static> {
        self.font
            .glyph(GlyphId(glyph))
            .scaled(self.rt_scale(scale))
            .positioned(point(subpixel.0, subpixel.1))
    }
}

impl Rasterizer for RustTypeRasterizer {
    fn scale_for_em_to_pixels(&self, pixels: f32) -> f32 {
        pixels / self.units_per_em
    }

    fn scale_for_pixel_height(&self, pixels: f32) -> f32 {
        pixels / self.unit_height
    }

    fn glyph_index(&self, codepoint: u32) -> GlyphIndex {
        match char::from_u32(codepoint) {
            Some(ch) => self.font.glyph(ch).id().0,
            None => 0,
        }
    }

    fn h_metrics(&self, glyph: GlyphIndex) -> HMetrics {
        let m = self
            .font
            .glyph(GlyphId(glyph))
            .scaled(self.rt_scale(1.0))
            .h_metrics();
        HMetrics {
            advance: m.advance_width,
            left_bearing: m.left_side_bearing,
        }
    }

    fn bitmap_box(&self, glyph: GlyphIndex, scale: f32, subpixel: (f32, f32)) -> BitmapBox {
        match self.positioned(glyph, scale, subpixel).pixel_bounding_box() {
            Some(bb) => BitmapBox {
                x0: bb.min.x,
                y0: bb.min.y,
                x1: bb.max.x,
                y1: bb.max.y,
            },
            None => BitmapBox::default(),
        }
    }

    fn write_bitmap(
        &self,
        glyph: GlyphIndex,
        scale: f32,
        subpixel: (f32, f32),
        out: &mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) {
        let positioned = self.positioned(glyph, scale, subpixel);
        positioned.draw(|x, y, v| {
            let (x, y) = (x as usize, y as usize);
            if x >= width || y >= height {
                return;
            }
            if let Some(px) = out.get_mut(y * stride + x) {
                *px = (v * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        });
    }
}
