//! Color depth table
//!
//! Maps an 8-bit coverage value to a packed gray in the destination
//! format. Built once per font, read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::constants::DEPTH_LEVELS;
use crate::surface::PixelFormat;

/// Intensity ramp applied before packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthRamp {
    /// Intensity equals coverage
    #[default]
    Linear,
    /// Steeper low half, compressed high half
    Sharp,
}

impl DepthRamp {
    /// Gray level for coverage `i`
    #[inline]
    pub const fn level(self, i: u8) -> u8 {
        match self {
            DepthRamp::Linear => i,
            DepthRamp::Sharp => {
                let i = i as u16;
                if i < 128 {
                    (i * 3 / 2) as u8
                } else {
                    (i / 2 + 128) as u8
                }
            }
        }
    }
}

/// 256-entry coverage -> packed color lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDepthTable {
    colors: [u16; DEPTH_LEVELS],
}

impl ColorDepthTable {
    pub fn new(format: PixelFormat, ramp: DepthRamp) -> Self {
        let mut colors = [0u16; DEPTH_LEVELS];
        for (i, color) in colors.iter_mut().enumerate() {
            let c = ramp.level(i as u8);
            *color = format.map_rgb(c, c, c);
        }
        Self { colors }
    }

    #[inline]
    pub fn get(&self, coverage: u8) -> u16 {
        self.colors[coverage as usize]
    }

    pub fn as_slice(&self) -> &[u16; DEPTH_LEVELS] {
        &self.colors
    }
}
