//! Font rendering tests driven by a scripted in-memory rasterizer
//!
//! The scripted font has 1024 units/em, so a 16px font scales by
//! exactly 1/64 and every metric below is an exact pixel value.

use std::cell::Cell;

use ttfblit::blend::blend;
use ttfblit::{
    BitmapBox, BlendMode, Font, FontOptions, GlyphIndex, HMetrics, PixelFormat, Rasterizer, Surface,
};

const ANGSTROM_SIGN: u32 = 0x212B;

struct ScriptedRasterizer {
    /// Bitmap width and height of every visible glyph
    glyph_w: i32,
    glyph_h: i32,
    /// Unscaled advance (640 -> 10px at 16px)
    advance: f32,
    /// Unscaled left bearing (128 -> 2px at 16px)
    left_bearing: f32,
    /// Constant coverage, or a per-pixel pattern when None
    fill: Option<u8>,
    writes: Cell<usize>,
}

impl ScriptedRasterizer {
    fn new() -> Self {
        Self {
            glyph_w: 8,
            glyph_h: 10,
            advance: 640.0,
            left_bearing: 128.0,
            fill: None,
            writes: Cell::new(0),
        }
    }

    fn sized(w: i32, h: i32) -> Self {
        Self {
            glyph_w: w,
            glyph_h: h,
            ..Self::new()
        }
    }

    fn filled(fill: u8) -> Self {
        Self {
            fill: Some(fill),
            ..Self::new()
        }
    }

    fn coverage(&self, glyph: GlyphIndex, x: usize, y: usize) -> u8 {
        self.fill
            .unwrap_or(((glyph as usize * 31 + x * 7 + y * 13) % 255 + 1) as u8)
    }
}

impl Rasterizer for ScriptedRasterizer {
    fn scale_for_em_to_pixels(&self, pixels: f32) -> f32 {
        pixels / 1024.0
    }

    fn scale_for_pixel_height(&self, pixels: f32) -> f32 {
        pixels / 2048.0
    }

    fn glyph_index(&self, codepoint: u32) -> GlyphIndex {
        // Angstrom sign shares the glyph of A-ring
        if codepoint == ANGSTROM_SIGN {
            return 0xC5;
        }
        (codepoint & 0xFFFF) as GlyphIndex
    }

    fn h_metrics(&self, _glyph: GlyphIndex) -> HMetrics {
        HMetrics {
            advance: self.advance,
            left_bearing: self.left_bearing,
        }
    }

    fn bitmap_box(&self, glyph: GlyphIndex, _scale: f32, subpixel: (f32, f32)) -> BitmapBox {
        assert_eq!(subpixel, (0.375, 0.375));
        if glyph == ' ' as GlyphIndex {
            return BitmapBox::default();
        }
        BitmapBox {
            x0: 1,
            y0: -self.glyph_h,
            x1: 1 + self.glyph_w,
            y1: 0,
        }
    }

    fn write_bitmap(
        &self,
        glyph: GlyphIndex,
        _scale: f32,
        _subpixel: (f32, f32),
        out: &mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) {
        self.writes.set(self.writes.get() + 1);
        for y in 0..height {
            for x in 0..width {
                out[y * stride + x] = self.coverage(glyph, x, y);
            }
        }
    }
}

fn font_with(
    raster: ScriptedRasterizer,
    mono_width: u8,
    blend: BlendMode,
) -> Font<ScriptedRasterizer> {
    let options = FontOptions {
        blend,
        ..FontOptions::default()
    };
    Font::with_rasterizer(raster, 16, mono_width, PixelFormat::Rgb565, options)
}

fn font(mono_width: u8) -> Font<ScriptedRasterizer> {
    font_with(ScriptedRasterizer::new(), mono_width, BlendMode::ColorKey)
}

fn snapshot_atlases(font: &Font<ScriptedRasterizer>) -> Vec<Vec<u8>> {
    (0..font.atlas_count())
        .map(|i| font.atlas_pixels(i).unwrap().to_vec())
        .collect()
}

#[test]
fn test_scale_from_em_size() {
    let f = font(8);
    assert_eq!(f.scale(), 16.0 / 1024.0);

    let options = FontOptions {
        size_mode: ttfblit::SizeMode::PixelHeight,
        ..FontOptions::default()
    };
    let f = Font::with_rasterizer(ScriptedRasterizer::new(), 16, 8, PixelFormat::Rgb565, options);
    assert_eq!(f.scale(), 16.0 / 2048.0);
}

#[test]
fn test_repeated_glyph_rasterized_once() {
    let mut f = font(8);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);

    let end = f.render(&mut surface, 0, 0, "AA").unwrap();

    assert_eq!(f.rasterizer().writes.get(), 1);
    assert_eq!(f.cached_glyphs(), 1);
    // Two equal steps of max(10, 8)
    assert_eq!(end, 20);
    assert_eq!(f.measure("A").unwrap(), 10);
}

#[test]
fn test_second_render_hits_cache() {
    let mut f = font(8);
    let mut surface = Surface::new(256, 32, PixelFormat::Rgb565);
    let text = "Hello, glyph cache 漢字";

    f.render(&mut surface, 0, 0, text).unwrap();
    let writes = f.rasterizer().writes.get();
    let cached = f.cached_glyphs();
    let atlases = snapshot_atlases(&f);

    f.render(&mut surface, 0, 0, text).unwrap();

    assert_eq!(f.rasterizer().writes.get(), writes);
    assert_eq!(f.cached_glyphs(), cached);
    assert_eq!(snapshot_atlases(&f), atlases);
}

#[test]
fn test_records_never_move() {
    let mut f = font(8);
    let mut surface = Surface::new(256, 32, PixelFormat::Rgb565);

    f.render(&mut surface, 0, 0, "abc").unwrap();
    let before: Vec<_> = "abc"
        .chars()
        .map(|c| *f.glyph_record(c as GlyphIndex).unwrap())
        .collect();

    f.render(&mut surface, 0, 0, "xyz abc ABC 0123").unwrap();
    let after: Vec<_> = "abc"
        .chars()
        .map(|c| *f.glyph_record(c as GlyphIndex).unwrap())
        .collect();

    assert_eq!(before, after);
}

#[test]
fn test_atlas_overflow_keeps_prior_atlases() {
    let mut f = font_with(ScriptedRasterizer::sized(300, 300), 8, BlendMode::ColorKey);
    let mut surface = Surface::new(32, 32, PixelFormat::Rgb565);

    let mut snapshot = snapshot_atlases(&f);
    let mut first_records = Vec::new();
    let mut overflowed = false;

    for cp in 'A' as u32..'A' as u32 + 40 {
        let text = char::from_u32(cp).unwrap().to_string();
        f.render(&mut surface, 0, 0, &text).unwrap();

        if f.atlas_count() > 1 {
            assert_eq!(f.atlas_count(), 2);
            // Atlas 0 is exactly as it was before the overflowing glyph
            assert_eq!(f.atlas_pixels(0).unwrap(), &snapshot[0][..]);
            assert_eq!(f.glyph_record(cp as GlyphIndex).unwrap().atlas, 1);
            overflowed = true;
            break;
        }

        first_records.push((cp, *f.glyph_record(cp as GlyphIndex).unwrap()));
        snapshot = snapshot_atlases(&f);
    }

    assert!(overflowed, "40 glyphs of 300x300 must overflow a 1024 atlas");
    for (cp, record) in first_records {
        assert_eq!(record.atlas, 0);
        assert_eq!(f.glyph_record(cp as GlyphIndex), Some(&record));
    }
}

#[test]
fn test_narrow_run_advance() {
    // Glyph advance (10) wins over a narrower cell
    let mut f = font(6);
    assert_eq!(f.measure("iiiii").unwrap(), 5 * 10);

    // Monospace cell (12) wins over the glyph advance
    let mut f = font(12);
    let mut surface = Surface::new(128, 32, PixelFormat::Rgb565);
    assert_eq!(f.render(&mut surface, 3, 0, "iiiii").unwrap(), 3 + 5 * 12);
}

#[test]
fn test_wide_codepoint_uses_double_cell() {
    let mut f = font(8);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);
    // Glyph advance is 10 < 16
    assert_eq!(f.render(&mut surface, 0, 0, "漢").unwrap(), 16);
    assert_eq!(f.measure("\u{0FFF}").unwrap(), 10);
    assert_eq!(f.measure("\u{1000}").unwrap(), 16);
}

#[test]
fn test_empty_text_changes_nothing() {
    let mut f = font(8);
    let mut surface = Surface::new(32, 32, PixelFormat::Rgb565);
    surface.fill(0x1234);
    let pixels = surface.pixels().to_vec();

    assert_eq!(f.render(&mut surface, 5, 5, "").unwrap(), 5);
    assert_eq!(f.render(&mut surface, 5, 5, "\0ABC").unwrap(), 5);

    assert_eq!(surface.pixels(), &pixels[..]);
    assert_eq!(f.cached_glyphs(), 0);
    assert_eq!(f.atlas_count(), 1);
    assert!(f.atlas_pixels(0).unwrap().iter().all(|&p| p == 0));
    assert_eq!(f.rasterizer().writes.get(), 0);
}

#[test]
fn test_malformed_utf8_stops_silently() {
    let mut f = font(8);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);

    let end = f.render(&mut surface, 0, 0, b"A\xFFB").unwrap();
    assert_eq!(end, 10);
    assert_eq!(f.cached_glyphs(), 1);

    // Truncated multi-byte sequence after one glyph
    let end = f.render(&mut surface, 0, 0, b"C\xE6\xBC").unwrap();
    assert_eq!(end, 10);
    assert!(f.glyph_record('C' as GlyphIndex).is_some());
    assert_eq!(f.cached_glyphs(), 2);
}

#[test]
fn test_shared_glyph_cached_once() {
    let mut f = font(8);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);
    f.render(&mut surface, 0, 0, "\u{C5}\u{212B}").unwrap();
    assert_eq!(f.rasterizer().writes.get(), 1);
    assert_eq!(f.cached_glyphs(), 1);
}

#[test]
fn test_space_advances_without_bitmap() {
    let mut f = font(8);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);
    let end = f.render(&mut surface, 0, 0, " ").unwrap();
    assert_eq!(end, 10);
    assert_eq!(f.rasterizer().writes.get(), 0);
    assert!(surface.pixels().iter().all(|&p| p == 0));
}

#[test]
fn test_glyph_placed_at_bearing_and_baseline() {
    let mut f = font_with(ScriptedRasterizer::filled(255), 8, BlendMode::ColorKey);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);

    f.render(&mut surface, 0, 0, "A").unwrap();

    // Left bearing 2, top = 16 (size) - 10 (glyph height)
    for y in 6..16 {
        for x in 2..10 {
            assert_eq!(surface.get(x, y), Some(0xFFFF), "pixel ({}, {})", x, y);
        }
    }
    assert_eq!(surface.get(1, 6), Some(0));
    assert_eq!(surface.get(10, 6), Some(0));
    assert_eq!(surface.get(2, 5), Some(0));
    assert_eq!(surface.get(2, 16), Some(0));
}

#[test]
fn test_alpha_mode_blends_with_background() {
    let bg = 0x0841;
    let mut f = font_with(ScriptedRasterizer::filled(128), 8, BlendMode::Alpha);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);
    surface.fill(bg);

    f.render(&mut surface, 0, 0, "A").unwrap();

    assert_eq!(surface.get(2, 6), Some(blend(PixelFormat::Rgb565, bg, 128)));
    assert_eq!(surface.get(0, 0), Some(bg));
}

#[test]
fn test_color_key_background_takes_table_color() {
    let mut f = font_with(ScriptedRasterizer::filled(128), 8, BlendMode::ColorKey);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);

    f.render(&mut surface, 0, 0, "A").unwrap();

    assert_eq!(surface.get(2, 6), Some(f.depth_table().get(128)));
}

#[test]
fn test_opaque_mode_overwrites() {
    let mut f = font_with(ScriptedRasterizer::filled(0), 8, BlendMode::Opaque);
    let mut surface = Surface::new(64, 32, PixelFormat::Rgb565);
    surface.fill(0xF800);

    f.render(&mut surface, 0, 0, "A").unwrap();

    assert_eq!(surface.get(2, 6), Some(f.depth_table().get(0)));
    assert_eq!(surface.get(0, 0), Some(0xF800));
}

#[test]
fn test_text_past_edges_is_clipped() {
    let mut f = font_with(ScriptedRasterizer::filled(255), 8, BlendMode::ColorKey);
    let mut surface = Surface::new(16, 16, PixelFormat::Rgb565);

    // Right edge: only columns 14 and 15 are inside
    let end = f.render(&mut surface, 12, 0, "AAAA").unwrap();
    assert_eq!(end, 52);
    assert_eq!(surface.get(14, 6), Some(0xFFFF));
    assert_eq!(surface.get(15, 15), Some(0xFFFF));
    assert_eq!(surface.get(13, 6), Some(0));

    // Origin above and left of the surface
    let mut surface = Surface::new(16, 16, PixelFormat::Rgb565);
    f.render(&mut surface, -4, -10, "A").unwrap();
    assert_eq!(surface.get(0, 0), Some(0xFFFF));
    assert_eq!(surface.get(5, 5), Some(0xFFFF));
    assert_eq!(surface.get(6, 0), Some(0));
    assert_eq!(surface.get(0, 6), Some(0));
}

#[test]
fn test_padded_pitch_surface() {
    let mut f = font_with(ScriptedRasterizer::filled(255), 8, BlendMode::ColorKey);
    let mut surface = Surface::with_pitch(20, 20, 64, PixelFormat::Rgb565);

    f.render(&mut surface, 0, 0, "A").unwrap();

    assert_eq!(surface.stride(), 32);
    assert_eq!(surface.get(2, 6), Some(0xFFFF));
    assert_eq!(surface.get(9, 15), Some(0xFFFF));
    // Padding columns are never touched
    let stride = surface.stride();
    for row in surface.pixels().chunks_exact(stride) {
        assert!(row[20..].iter().all(|&p| p == 0));
    }
}

#[test]
fn test_oversized_glyph_is_an_error() {
    let mut f = font_with(ScriptedRasterizer::sized(1024, 12), 8, BlendMode::ColorKey);
    let mut surface = Surface::new(16, 16, PixelFormat::Rgb565);
    let err = f.render(&mut surface, 0, 0, "A").unwrap_err();
    assert!(matches!(err, ttfblit::FontError::GlyphTooLarge { width: 1024, height: 12 }));
    assert_eq!(f.cached_glyphs(), 0);
}

#[test]
fn test_pen_saturates_near_i32_max() {
    let mut f = font(8);
    let mut surface = Surface::new(16, 16, PixelFormat::Rgb565);
    let before = surface.pixels().to_vec();

    let end = f.render(&mut surface, i32::MAX - 5, i32::MAX - 5, "AA").unwrap();

    assert_eq!(end, i32::MAX);
    assert_eq!(surface.pixels(), &before[..]);
    assert_eq!(f.cached_glyphs(), 1);
}
