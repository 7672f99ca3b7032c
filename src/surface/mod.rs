//! Destination surfaces
//!
//! A packed 16-bit raster with row pitch, the pixel layout needed to
//! blend into it, and PNG export for inspecting results.

use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

/// Bit layout of one color channel inside a packed pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub shift: u32,
    /// Largest channel value (all bits set)
    pub max: u16,
}

impl Channel {
    #[inline]
    pub const fn get(self, pixel: u16) -> u16 {
        (pixel >> self.shift) & self.max
    }

    /// Pack an 8-bit intensity into this channel (truncating low bits)
    #[inline]
    pub const fn pack8(self, v: u8) -> u16 {
        let bits = 16 - self.max.leading_zeros();
        ((v as u16) >> (8 - bits)) << self.shift
    }

    /// Expand this channel of `pixel` back to 8 bits
    #[inline]
    pub const fn unpack8(self, pixel: u16) -> u8 {
        (self.get(pixel) as u32 * 255 / self.max as u32) as u8
    }
}

/// Packed 16-bit pixel layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 5-6-5, red in the high bits
    #[default]
    Rgb565,
    /// x-5-5-5, red in bits 10..15, top bit unused
    Rgb555,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        2
    }

    /// Red, green, blue channel layouts
    pub const fn channels(self) -> [Channel; 3] {
        match self {
            PixelFormat::Rgb565 => [
                Channel { shift: 11, max: 0x1F },
                Channel { shift: 5, max: 0x3F },
                Channel { shift: 0, max: 0x1F },
            ],
            PixelFormat::Rgb555 => [
                Channel { shift: 10, max: 0x1F },
                Channel { shift: 5, max: 0x1F },
                Channel { shift: 0, max: 0x1F },
            ],
        }
    }

    /// Map 8-bit-per-channel RGB to the packed format
    pub const fn map_rgb(self, r: u8, g: u8, b: u8) -> u16 {
        let [cr, cg, cb] = self.channels();
        cr.pack8(r) | cg.pack8(g) | cb.pack8(b)
    }

    /// Expand a packed pixel to 8-bit RGB
    pub const fn to_rgb(self, pixel: u16) -> (u8, u8, u8) {
        let [cr, cg, cb] = self.channels();
        (cr.unpack8(pixel), cg.unpack8(pixel), cb.unpack8(pixel))
    }
}

/// Owned 16-bit raster buffer
#[derive(Debug, Clone)]
pub struct Surface {
    format: PixelFormat,
    width: usize,
    height: usize,
    /// Row length in bytes
    pitch: usize,
    pixels: Vec<u16>,
}

impl Surface {
    /// Tightly packed surface, cleared to 0
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self::with_pitch(width, height, width * format.bytes_per_pixel(), format)
    }

    /// Surface whose rows are `pitch` bytes apart
    ///
    /// `pitch` is rounded up to hold at least `width` pixels.
    pub fn with_pitch(width: usize, height: usize, pitch: usize, format: PixelFormat) -> Self {
        let bpp = format.bytes_per_pixel();
        let pitch = pitch.max(width * bpp).div_ceil(bpp) * bpp;
        Self {
            format,
            width,
            height,
            pitch,
            pixels: vec![0u16; pitch / bpp * height],
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Row length in pixels
    pub fn stride(&self) -> usize {
        self.pitch / self.bytes_per_pixel()
    }

    pub fn map_rgb(&self, r: u8, g: u8, b: u8) -> u16 {
        self.format.map_rgb(r, g, b)
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u16] {
        &mut self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.stride() + x])
    }

    /// True when the surface has no visible pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn fill(&mut self, color: u16) {
        self.pixels.fill(color);
    }

    /// Visible pixels as packed RGB8 (pitch padding dropped)
    pub fn to_rgb8(&self) -> Vec<u8> {
        if self.is_empty() {
            return Vec::new();
        }
        let stride = self.stride();
        let mut out = Vec::with_capacity(self.width * self.height * 3);
        for row in self.pixels.chunks_exact(stride).take(self.height) {
            for &px in &row[..self.width] {
                let (r, g, b) = self.format.to_rgb(px);
                out.extend_from_slice(&[r, g, b]);
            }
        }
        out
    }

    /// Write the surface as an 8-bit RGB PNG
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if self.is_empty() {
            bail!("Cannot save empty surface ({}x{})", self.width, self.height);
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut encoder =
            png::Encoder::new(std::io::BufWriter::new(file), self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.to_rgb8())?;

        info!("Surface saved: {} ({}x{})", path.display(), self.width, self.height);
        Ok(())
    }
}
