//! Global constants for ttfblit
//!
//! Fixed dimensions and thresholds shared by the glyph cache,
//! the atlas allocator and the compositor.

// ============================================================================
// Atlas
// ============================================================================

/// Side length of every glyph atlas (pixels, square, 8-bit coverage)
///
/// Each atlas owns exactly `ATLAS_SIZE * ATLAS_SIZE` bytes. Glyph bitmaps
/// must be smaller than this in both dimensions.
pub const ATLAS_SIZE: usize = 1024;

// ============================================================================
// Rasterization
// ============================================================================

/// Subpixel phase applied on both axes when rasterizing a glyph (3/8 pixel)
pub const SUBPIXEL_PHASE: f32 = 0.375;

/// Number of entries in a color depth table (one per coverage value)
pub const DEPTH_LEVELS: usize = 256;

// ============================================================================
// Compositing
// ============================================================================

/// First code point treated as wide (double monospace advance)
pub const WIDE_CODEPOINT_START: u32 = 0x1000;

/// Destination value treated as untouched background in color-key mode
pub const TRANSPARENT_KEY: u16 = 0;

/// Check if a code point takes a double-width monospace cell
#[inline]
pub const fn is_wide(cp: u32) -> bool {
    cp >= WIDE_CODEPOINT_START
}
