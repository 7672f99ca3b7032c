//! Per-pixel glyph compositing
//!
//! Glyph coverage is always drawn as white: each channel moves toward
//! its maximum by `n / 255`.

use serde::{Deserialize, Serialize};

use crate::constants::TRANSPARENT_KEY;
use crate::font::depth::ColorDepthTable;
use crate::surface::PixelFormat;

/// How glyph coverage is combined with the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Always blend with the existing pixel
    Alpha,
    /// Blend, except on `TRANSPARENT_KEY` pixels which take the table color
    #[default]
    ColorKey,
    /// No compositing: write the table color directly
    Opaque,
}

/// `dst * (255 - n) / 255 + max * n / 255`, channel-wise
#[inline]
pub fn blend(format: PixelFormat, dst: u16, n: u8) -> u16 {
    let n = n as u32;
    let inv = 0xFF - n;
    format.channels().iter().fold(0u16, |acc, ch| {
        let c = ch.get(dst) as u32;
        let max = ch.max as u32;
        let v = (c * inv + max * n) / 0xFF;
        acc | ((v as u16) << ch.shift)
    })
}

/// Resulting destination value for coverage `n` over `dst`
#[inline]
pub fn composite(
    mode: BlendMode,
    format: PixelFormat,
    table: &ColorDepthTable,
    dst: u16,
    n: u8,
) -> u16 {
    match mode {
        BlendMode::Opaque => table.get(n),
        BlendMode::ColorKey if dst == TRANSPARENT_KEY => table.get(n),
        BlendMode::Alpha | BlendMode::ColorKey => blend(format, dst, n),
    }
}

/// Composite one row of coverage onto one row of destination pixels
#[inline]
pub fn composite_row(
    mode: BlendMode,
    format: PixelFormat,
    table: &ColorDepthTable,
    dst: &mut [u16],
    coverage: &[u8],
) {
    for (px, &n) in dst.iter_mut().zip(coverage) {
        *px = composite(mode, format, table, *px, n);
    }
}
