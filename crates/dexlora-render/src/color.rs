#![forbid(unsafe_code)]

//! Packed 32-bit RGBA color.

use std::fmt;

/// A 32-bit packed RGBA color (`0xRRGGBBAA`), straight alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Opaque color from a `0xRRGGBB` literal, as used by scene presets.
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa` (leading `#` optional).
    pub fn parse_css(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            3 => {
                let expand = |n: u32| ((n & 0xF) * 17) as u8;
                Some(Self::rgb(expand(value >> 8), expand(value >> 4), expand(value)))
            }
            6 => Some(Self::from_hex(value)),
            8 => Some(Self(value)),
            _ => None,
        }
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    const fn div_round_u8(numer: u64, denom: u64) -> u8 {
        debug_assert!(denom != 0);
        let v = (numer + (denom / 2)) / denom;
        if v > 255 { 255 } else { v as u8 }
    }

    /// Porter-Duff SourceOver: `src over dst`.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let s_a = self.a() as u64;
        if s_a == 255 {
            return self;
        }
        if s_a == 0 {
            return dst;
        }

        let d_a = dst.a() as u64;
        let inv_s_a = 255 - s_a;
        let numer_a = 255 * s_a + d_a * inv_s_a;
        if numer_a == 0 {
            return Self::TRANSPARENT;
        }

        let out_a = Self::div_round_u8(numer_a, 255);
        let channel = |s: u8, d: u8| {
            Self::div_round_u8(
                (s as u64) * s_a * 255 + (d as u64) * d_a * inv_s_a,
                numer_a,
            )
        };
        Self::rgba(
            channel(self.r(), dst.r()),
            channel(self.g(), dst.g()),
            channel(self.b(), dst.b()),
            out_a,
        )
    }

    /// Additive blend weighted by `self`'s alpha; saturates per channel.
    ///
    /// Light streaks and glows accumulate this way so overlapping sources
    /// brighten instead of occluding each other.
    #[inline]
    pub fn add_onto(self, dst: Self) -> Self {
        let a = self.a() as u16;
        let add = |s: u8, d: u8| (d as u16 + (s as u16 * a + 127) / 255).min(255) as u8;
        Self::rgba(
            add(self.r(), dst.r()),
            add(self.g(), dst.g()),
            add(self.b(), dst.b()),
            dst.a().max(self.a()),
        )
    }

    /// Apply uniform opacity in `[0.0, 1.0]` by scaling alpha.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = ((self.a() as f32) * opacity).round().clamp(0.0, 255.0) as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Scale the color channels by `factor` (alpha untouched).
    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        let f = factor.max(0.0);
        let s = |c: u8| ((c as f32) * f).round().clamp(0.0, 255.0) as u8;
        Self::rgba(s(self.r()), s(self.g()), s(self.b()), self.a())
    }

    /// Linear interpolation between two colors (all four channels).
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| {
            let v = (a as f32) + ((b as f32) - (a as f32)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::rgba(
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
            mix(self.a(), other.a()),
        )
    }

    /// Sample a multi-stop gradient at `t` in `[0, 1]`; stops are evenly spaced.
    pub fn gradient(stops: &[Self], t: f32) -> Self {
        match stops {
            [] => Self::TRANSPARENT,
            [only] => *only,
            _ => {
                let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
                let scaled = t * (stops.len() - 1) as f32;
                let idx = (scaled.floor() as usize).min(stops.len() - 2);
                stops[idx].lerp(stops[idx + 1], scaled - idx as f32)
            }
        }
    }
}

impl fmt::Debug for PackedRgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}
