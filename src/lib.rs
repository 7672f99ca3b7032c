//! ttfblit - cached TrueType text rendering onto 16-bit surfaces
//!
//! # Architecture
//!
//! ```text
//! text bytes ─→ Utf8Decoder ─→ code point ─→ glyph index (Rasterizer)
//!                                                 │
//!                                     GlyphCache lookup
//!                                      │ miss          │ hit
//!                      AtlasAllocator place            │
//!                      + Rasterizer writes bitmap      │
//!                                      └──────┬────────┘
//!                          blend via ColorDepthTable ─→ Surface
//!                          advance max(glyph, mono cell)
//! ```
//!
//! A [`Font`] owns everything: font bytes, glyph records and atlases.
//! Glyphs are rasterized once and blitted from the atlas afterwards.

pub mod blend;
pub mod config;
pub mod constants;
pub mod font;
pub mod surface;
pub mod utils;

pub use blend::BlendMode;
pub use font::cache::GlyphRecord;
pub use font::depth::{ColorDepthTable, DepthRamp};
pub use font::rasterizer::{BitmapBox, GlyphIndex, HMetrics, Rasterizer, RustTypeRasterizer};
pub use font::utf8::Utf8Decoder;
pub use font::{Font, FontError, FontOptions, SizeMode};
pub use surface::{PixelFormat, Surface};
