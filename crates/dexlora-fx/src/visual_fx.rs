#![forbid(unsafe_code)]

//! Visual FX primitives.
//!
//! This module defines the stable core types shared by every background
//! effect:
//! - the [`BackdropFx`] drawing contract
//! - quality tiers ([`FxQuality`])
//! - theme input plumbing ([`ThemeInputs`])
//!
//! Design goals:
//! - **Deterministic**: given the same inputs (seed, dt sequence, events),
//!   output is identical.
//! - **No per-frame allocations required**: effects reuse internal buffers.
//! - **Tiny-area safe**: width/height may be zero; must not panic.

use dexlora_core::event::{InputEvent, ListenerKinds};
use dexlora_render::PackedRgba;

/// Quality hint for FX implementations.
///
/// - `Full`: Normal detail.
/// - `Reduced`: Fewer primitives, coarser per-pixel sampling.
/// - `Minimal`: Very cheap fallback.
/// - `Off`: Render nothing (decorative effects are non-essential).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FxQuality {
    /// Render nothing.
    Off,
    /// Very cheap fallback.
    Minimal,
    /// Fewer primitives, simplified math.
    Reduced,
    /// Normal detail, full quality.
    #[default]
    Full,
}

/// Area threshold (in pixels) above which `Full` is clamped to `Reduced`.
///
/// Roughly an 800x600 canvas.
pub const FX_AREA_THRESHOLD_FULL_TO_REDUCED: usize = 480_000;

/// Area threshold (in pixels) above which `Reduced` is clamped to `Minimal`.
///
/// Roughly a full-HD canvas.
pub const FX_AREA_THRESHOLD_REDUCED_TO_MINIMAL: usize = 1_920_000;

impl FxQuality {
    /// Clamp quality based on render area size.
    ///
    /// - Area >= [`FX_AREA_THRESHOLD_FULL_TO_REDUCED`]: `Full` becomes `Reduced`
    /// - Area >= [`FX_AREA_THRESHOLD_REDUCED_TO_MINIMAL`]: `Reduced` becomes `Minimal`
    #[inline]
    pub fn clamp_for_area(quality: Self, area_px: usize) -> Self {
        match quality {
            Self::Full if area_px >= FX_AREA_THRESHOLD_FULL_TO_REDUCED => {
                if area_px >= FX_AREA_THRESHOLD_REDUCED_TO_MINIMAL {
                    Self::Minimal
                } else {
                    Self::Reduced
                }
            }
            Self::Reduced if area_px >= FX_AREA_THRESHOLD_REDUCED_TO_MINIMAL => Self::Minimal,
            other => other,
        }
    }

    /// Returns `true` if effects should render (not `Off`).
    #[inline]
    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }

    /// Scale an element count for this tier (at least one element unless `Off`
    /// or `full` is zero).
    #[inline]
    pub fn scale_count(self, full: usize) -> usize {
        if full == 0 {
            return 0;
        }
        match self {
            Self::Full => full,
            Self::Reduced => (full - full / 4).max(1),
            Self::Minimal => (full / 2).max(1),
            Self::Off => 0,
        }
    }

    /// Side length of the square pixel block shaded per sample by per-pixel
    /// effects.
    #[inline]
    pub fn block_size(self) -> u32 {
        match self {
            Self::Full | Self::Off => 1,
            Self::Reduced => 2,
            Self::Minimal => 4,
        }
    }
}

/// Resolved site palette for FX.
///
/// Effects consume only this struct for shared colors; effect-specific
/// colors live in each effect's params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThemeInputs {
    /// Page background behind every effect.
    pub bg_base: PackedRgba,
    /// Primary foreground/text color.
    pub fg_primary: PackedRgba,
    /// Brand accent.
    pub accent_primary: PackedRgba,
    /// Secondary accent.
    pub accent_secondary: PackedRgba,
}

impl ThemeInputs {
    /// The dark DexLora palette.
    pub const fn dexlora_dark() -> Self {
        Self {
            bg_base: PackedRgba::BLACK,
            fg_primary: PackedRgba::WHITE,
            accent_primary: PackedRgba::from_hex(0x03b3c3),
            accent_secondary: PackedRgba::from_hex(0xd856bf),
        }
    }
}

impl Default for ThemeInputs {
    fn default() -> Self {
        Self::dexlora_dark()
    }
}

/// Per-frame render context.
#[derive(Debug, Clone, Copy)]
pub struct FxContext<'a> {
    pub width: u32,
    pub height: u32,
    pub frame: u64,
    pub time_seconds: f64,
    pub quality: FxQuality,
    pub theme: &'a ThemeInputs,
}

impl<'a> FxContext<'a> {
    #[inline]
    pub const fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Background effect that renders into a caller-owned pixel buffer.
///
/// Invariants:
/// - Implementations must tolerate `width == 0` or `height == 0` (no panic).
/// - `out.len()` is expected to equal `ctx.width * ctx.height`.
/// - Implementations should avoid per-frame allocations; reuse internal state.
pub trait BackdropFx {
    /// Human-readable name (used for logging).
    fn name(&self) -> &'static str;

    /// Input listeners this effect wants registered by its instance.
    fn listeners(&self) -> ListenerKinds {
        ListenerKinds::RESIZE
    }

    /// Resize hook so effects can (re)allocate caches deterministically.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// React to a host-delivered input event.
    fn handle_input(&mut self, _event: &InputEvent) {}

    /// Advance simulation state by `dt` seconds. Called once per frame before
    /// [`render`](Self::render).
    fn advance(&mut self, _dt: f64) {}

    /// Render into `out` (row-major, width*height).
    fn render(&mut self, ctx: FxContext<'_>, out: &mut [PackedRgba]);
}

// ---------------------------------------------------------------------------
// Shared math helpers
// ---------------------------------------------------------------------------

/// `sin` remapped into `[0, 1]`.
#[inline]
pub(crate) fn nsin(v: f64) -> f64 {
    v.sin() * 0.5 + 0.5
}

/// GLSL-style `smoothstep`. Reversed edges (`e0 > e1`) produce a falling ramp.
#[inline]
pub(crate) fn smoothstep(e0: f64, e1: f64, x: f64) -> f64 {
    let span = e1 - e0;
    if span == 0.0 {
        return if x < e0 { 0.0 } else { 1.0 };
    }
    let t = ((x - e0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Eased step toward `target`. Snaps when the step would be smaller than `limit`.
///
/// Returns the change to apply, not the new value.
#[inline]
pub(crate) fn lerp_step(current: f64, target: f64, speed: f64, limit: f64) -> f64 {
    let change = (target - current) * speed;
    if change.abs() < limit {
        target - current
    } else {
        change
    }
}

/// Integer hash to `[0, 1)`, used for film-grain noise.
#[inline]
pub(crate) fn hash01(x: u32, y: u32, seed: u32) -> f32 {
    let mut h = x
        .wrapping_mul(0x8da6_b343)
        .wrapping_add(y.wrapping_mul(0xd816_3841))
        .wrapping_add(seed.wrapping_mul(0xcb1a_b31f));
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    (h >> 8) as f32 / (1u32 << 24) as f32
}

/// Fill the buffer in `block x block` tiles, shading one sample per tile.
///
/// `shade(nx, ny, x, y)` receives the tile centre in normalized `[0, 1]`
/// coordinates and the tile's top-left pixel.
pub(crate) fn shade_blocks(
    ctx: &FxContext<'_>,
    out: &mut [PackedRgba],
    mut shade: impl FnMut(f64, f64, u32, u32) -> PackedRgba,
) {
    let block = ctx.quality.block_size().max(1);
    let (w, h) = (ctx.width, ctx.height);
    let inv_w = 1.0 / w as f64;
    let inv_h = 1.0 / h as f64;
    let mut by = 0;
    while by < h {
        let bh = block.min(h - by);
        let ny = (by as f64 + bh as f64 * 0.5) * inv_h;
        let mut bx = 0;
        while bx < w {
            let bw = block.min(w - bx);
            let nx = (bx as f64 + bw as f64 * 0.5) * inv_w;
            let color = shade(nx, ny, bx, by);
            for y in by..by + bh {
                let row = y as usize * w as usize;
                for x in bx..bx + bw {
                    if let Some(px) = out.get_mut(row + x as usize) {
                        *px = color;
                    }
                }
            }
            bx += block;
        }
        by += block;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_for_area_steps_down() {
        assert_eq!(FxQuality::clamp_for_area(FxQuality::Full, 100), FxQuality::Full);
        assert_eq!(
            FxQuality::clamp_for_area(FxQuality::Full, FX_AREA_THRESHOLD_FULL_TO_REDUCED),
            FxQuality::Reduced
        );
        assert_eq!(
            FxQuality::clamp_for_area(FxQuality::Full, FX_AREA_THRESHOLD_REDUCED_TO_MINIMAL),
            FxQuality::Minimal
        );
        assert_eq!(FxQuality::clamp_for_area(FxQuality::Off, usize::MAX), FxQuality::Off);
    }

    #[test]
    fn scale_count_keeps_at_least_one() {
        assert_eq!(FxQuality::Full.scale_count(30), 30);
        assert_eq!(FxQuality::Reduced.scale_count(30), 23);
        assert_eq!(FxQuality::Minimal.scale_count(1), 1);
        assert_eq!(FxQuality::Off.scale_count(30), 0);
        assert_eq!(FxQuality::Full.scale_count(0), 0);
    }

    #[test]
    fn smoothstep_handles_reversed_edges() {
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(1.0, 0.4, 1.0), 0.0);
        assert_eq!(smoothstep(1.0, 0.4, 0.2), 1.0);
    }

    #[test]
    fn lerp_step_snaps_below_limit() {
        assert_eq!(lerp_step(0.0, 2.0, 0.5, 0.001), 1.0);
        assert_eq!(lerp_step(1.9999, 2.0, 0.1, 0.001), 2.0 - 1.9999);
    }

    #[test]
    fn hash01_is_unit_range_and_stable() {
        for i in 0..256 {
            let v = hash01(i, i * 7, 3);
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, hash01(i, i * 7, 3));
        }
    }

    #[test]
    fn shade_blocks_covers_odd_sizes() {
        let theme = ThemeInputs::default();
        for quality in [FxQuality::Full, FxQuality::Reduced, FxQuality::Minimal] {
            let ctx = FxContext {
                width: 7,
                height: 5,
                frame: 0,
                time_seconds: 0.0,
                quality,
                theme: &theme,
            };
            let mut out = vec![PackedRgba::TRANSPARENT; ctx.len()];
            shade_blocks(&ctx, &mut out, |_, _, _, _| PackedRgba::WHITE);
            assert!(out.iter().all(|p| *p == PackedRgba::WHITE), "{quality:?}");
        }
    }
}
