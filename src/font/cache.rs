//! Glyph cache
//!
//! Glyph index -> packed bitmap location and metrics. Entries are
//! written once on first use and never evicted or modified, so a
//! record's atlas coordinates stay valid for the life of the cache.

use std::collections::HashMap;

use log::debug;

use super::atlas::AtlasAllocator;
use super::rasterizer::{GlyphIndex, Rasterizer};
use super::FontError;
use crate::constants::{ATLAS_SIZE, SUBPIXEL_PHASE};

/// Cached placement and metrics of one glyph
///
/// `advance` and `left_bearing` are scaled pixel values narrowed to
/// `u8` with a saturating cast: negative bearings read as 0 and values
/// above 255 read as 255. The narrowing keeps the record at 16 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphRecord {
    pub atlas: u16,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Bitmap left edge relative to the pen position
    pub ix0: i16,
    /// Bitmap top edge relative to the baseline (negative = above)
    pub iy0: i16,
    pub advance: u8,
    pub left_bearing: u8,
}

impl GlyphRecord {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn narrow_i16(v: i32) -> i16 {
    v.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Write-once glyph cache backed by growing atlases
pub struct GlyphCache {
    records: HashMap<GlyphIndex, GlyphRecord>,
    atlases: AtlasAllocator,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            atlases: AtlasAllocator::new(),
        }
    }

    /// Return the record for `glyph`, rasterizing it on first use
    ///
    /// A miss queries metrics and the bitmap box at `scale` with the
    /// fixed subpixel phase, reserves atlas space, and has the
    /// rasterizer write the bitmap straight into the atlas.
    pub fn lookup_or_create<R: Rasterizer + ?Sized>(
        &mut self,
        raster: &R,
        scale: f32,
        glyph: GlyphIndex,
    ) -> Result<GlyphRecord, FontError> {
        if let Some(record) = self.records.get(&glyph) {
            return Ok(*record);
        }

        let subpixel = (SUBPIXEL_PHASE, SUBPIXEL_PHASE);
        let metrics = raster.h_metrics(glyph);
        let bb = raster.bitmap_box(glyph, scale, subpixel);

        let mut record = GlyphRecord {
            advance: (scale * metrics.advance) as u8,
            left_bearing: (scale * metrics.left_bearing) as u8,
            ix0: narrow_i16(bb.x0),
            iy0: narrow_i16(bb.y0),
            atlas: self.atlases.current() as u16,
            ..GlyphRecord::default()
        };

        if !bb.is_empty() {
            let (width, height) = (bb.width() as usize, bb.height() as usize);
            let placement = self.atlases.place(width, height)?;
            let atlas = self
                .atlases
                .get_mut(placement.atlas)
                .ok_or(FontError::GlyphTooLarge { width, height })?;
            raster.write_bitmap(
                glyph,
                scale,
                subpixel,
                atlas.region_mut(placement.x, placement.y),
                width,
                height,
                ATLAS_SIZE,
            );

            record.atlas = placement.atlas as u16;
            record.x = placement.x as u16;
            record.y = placement.y as u16;
            record.width = width as u16;
            record.height = height as u16;
        }

        debug!(
            "Glyph {} cached: {}x{} at atlas {} ({}, {}), advance {}",
            glyph, record.width, record.height, record.atlas, record.x, record.y, record.advance
        );

        self.records.insert(glyph, record);
        Ok(record)
    }

    pub fn get(&self, glyph: GlyphIndex) -> Option<&GlyphRecord> {
        self.records.get(&glyph)
    }

    /// Coverage row `row` of a cached glyph's bitmap
    pub fn coverage_row(&self, record: &GlyphRecord, row: usize) -> &[u8] {
        match self.atlases.get(record.atlas as usize) {
            Some(atlas) => {
                let (x, y) = (record.x as usize, record.y as usize);
                atlas.row(x, y, row, record.width as usize)
            }
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn atlases(&self) -> &AtlasAllocator {
        &self.atlases
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}
