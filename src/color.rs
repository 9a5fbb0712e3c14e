//! Packed RGB colors, HSL conversion and the blend used when bodies merge.

use crate::vector::{Vector2, Vector2Ext};

/// Radial palette used by the spawners, innermost band first.
pub const PALETTE: [u32; 6] = [0x36ff33, 0xff33f9, 0xff3737, 0xe3ff45, 0xffb955, 0x55f7ff];

/// Splits a packed `0xRRGGBB` color into its channels.
#[inline]
pub fn unpack(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Packs channels into `0xRRGGBB`.
#[inline]
pub fn pack([r, g, b]: [u8; 3]) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Converts 8-bit RGB to HSL. Hue is in turns `[0, 1)`, saturation and
/// lightness in `[0, 1]`.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    // Achromatic
    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h / 6.0, s, l)
}

/// Converts HSL back to 8-bit RGB, rounding each channel.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    (to_byte(r), to_byte(g), to_byte(b))
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[inline]
fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Blends two packed colors weighted by the masses of their bodies.
///
/// Hue and saturation are mass-weighted. Lightness is the plain average of both
/// inputs so a large body does not go dark after swallowing a small dim one.
/// Masses must sum to a positive value.
pub fn blend(color_a: u32, mass_a: f64, color_b: u32, mass_b: f64) -> u32 {
    let [r1, g1, b1] = unpack(color_a);
    let [r2, g2, b2] = unpack(color_b);
    let (h1, s1, l1) = rgb_to_hsl(r1, g1, b1);
    let (h2, s2, l2) = rgb_to_hsl(r2, g2, b2);

    let total = mass_a + mass_b;
    let h = (h1 * mass_a + h2 * mass_b) / total;
    let s = (s1 * mass_a + s2 * mass_b) / total;
    let l = (l1 + l2) / 2.0;

    let (r, g, b) = hsl_to_rgb(h, s, l);
    pack([r, g, b])
}

/// Picks a palette color from the normalized distance of `position` to
/// `center`. Anything at or beyond `radius` gets the outermost color.
pub fn palette_color(center: Vector2, radius: f64, position: Vector2) -> u32 {
    let distance = position.distance_to(center);
    let band = (distance / radius * PALETTE.len() as f64).floor() as usize;
    PALETTE[band.min(PALETTE.len() - 1)]
}
