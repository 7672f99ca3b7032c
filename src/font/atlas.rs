//! Glyph atlases
//!
//! Fixed-size 8-bit coverage bitmaps holding many packed glyphs.
//! The allocator only ever appends: when the newest atlas is full a
//! fresh one is created, and earlier atlases are never touched again
//! except for reads.

use etagere::{size2, AtlasAllocator as Packer};
use log::debug;

use super::FontError;
use crate::constants::ATLAS_SIZE;

/// Location of a packed rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub atlas: usize,
    pub x: usize,
    pub y: usize,
}

/// One `ATLAS_SIZE` x `ATLAS_SIZE` coverage bitmap plus its packer state
pub struct Atlas {
    pixels: Box<[u8]>,
    packer: Packer,
}

impl Atlas {
    fn new() -> Self {
        Self {
            pixels: vec![0u8; ATLAS_SIZE * ATLAS_SIZE].into_boxed_slice(),
            packer: Packer::new(size2(ATLAS_SIZE as i32, ATLAS_SIZE as i32)),
        }
    }

    /// Reserve a `width` x `height` region, returning its top-left corner
    fn pack(&mut self, width: usize, height: usize) -> Option<(usize, usize)> {
        let alloc = self.packer.allocate(size2(width as i32, height as i32))?;
        let min = alloc.rectangle.min;
        Some((min.x as usize, min.y as usize))
    }

    /// Row-major coverage data, `ATLAS_SIZE` bytes per row
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable view starting at (x, y); rows keep the atlas stride
    pub fn region_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        &mut self.pixels[y * ATLAS_SIZE + x..]
    }

    /// Coverage row `row` of a `width` wide region at (x, y)
    pub fn row(&self, x: usize, y: usize, row: usize, width: usize) -> &[u8] {
        let start = (y + row) * ATLAS_SIZE + x;
        &self.pixels[start..start + width]
    }
}

/// Append-only list of atlases
pub struct AtlasAllocator {
    atlases: Vec<Atlas>,
}

impl AtlasAllocator {
    /// Start with one empty atlas
    pub fn new() -> Self {
        Self {
            atlases: vec![Atlas::new()],
        }
    }

    /// Find room for a `width` x `height` bitmap
    ///
    /// Tries the newest atlas first; on overflow appends a fresh atlas
    /// and packs there. A rectangle that does not fit an empty atlas is
    /// reported as `GlyphTooLarge`.
    pub fn place(&mut self, width: usize, height: usize) -> Result<Placement, FontError> {
        let too_large = FontError::GlyphTooLarge { width, height };
        if width >= ATLAS_SIZE || height >= ATLAS_SIZE {
            return Err(too_large);
        }

        let last = self.atlases.len() - 1;
        if let Some((x, y)) = self.atlases[last].pack(width, height) {
            return Ok(Placement { atlas: last, x, y });
        }

        self.atlases.push(Atlas::new());
        let atlas = self.atlases.len() - 1;
        debug!(
            "Atlas {} full, created atlas {} for {}x{} bitmap",
            last, atlas, width, height
        );

        let (x, y) = self.atlases[atlas].pack(width, height).ok_or(too_large)?;
        Ok(Placement { atlas, x, y })
    }

    /// Index of the most recently created atlas
    pub fn current(&self) -> usize {
        self.atlases.len() - 1
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn get(&self, index: usize) -> Option<&Atlas> {
        self.atlases.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Atlas> {
        self.atlases.get_mut(index)
    }
}

impl Default for AtlasAllocator {
    fn default() -> Self {
        Self::new()
    }
}
