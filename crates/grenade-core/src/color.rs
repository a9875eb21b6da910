//! Packed ARGB colors and piecewise-linear color ramps.

use serde::{Deserialize, Serialize};

/// Color with 8-bit channels, packed as 0xAARRGGBB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_argb(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Integer linear interpolation between (x0, y0) and (x1, y1), clamped to the segment.
fn lerp_channel(progress: i64, x0: i64, y0: u8, x1: i64, y1: u8) -> u8 {
    let interval = x1 - x0;
    let factor = (progress - x0).clamp(0, interval.max(0));
    let value = (factor * y1 as i64 + (interval - factor) * y0 as i64) / interval.max(1);
    value.clamp(0, 255) as u8
}

/// Interpolate a color ramp at `progress`.
///
/// `stops` are (position, color) pairs in ascending position order. Progress
/// outside the ramp takes the nearest end color.
pub fn ramp(progress: i64, stops: &[(i64, Rgba)]) -> Rgba {
    let Some(&(first_x, first_color)) = stops.first() else {
        return Rgba::default();
    };
    if progress <= first_x {
        return first_color;
    }
    for pair in stops.windows(2) {
        let (x0, c0) = pair[0];
        let (x1, c1) = pair[1];
        if progress <= x1 {
            return Rgba {
                r: lerp_channel(progress, x0, c0.r, x1, c1.r),
                g: lerp_channel(progress, x0, c0.g, x1, c1.g),
                b: lerp_channel(progress, x0, c0.b, x1, c1.b),
                a: lerp_channel(progress, x0, c0.a, x1, c1.a),
            };
        }
    }
    stops.last().map(|&(_, c)| c).unwrap_or_default()
}
