#![forbid(unsafe_code)]

//! Warped multi-color gradient field.
//!
//! Each palette color owns a travelling wave along its own direction; the
//! sample point is domain-warped before the waves are evaluated, and the
//! colors are mixed by sharpened wave weights.

use std::f64::consts::TAU;

use dexlora_core::event::{InputEvent, ListenerKind, ListenerKinds};
use dexlora_render::PackedRgba;

use crate::visual_fx::{BackdropFx, FxContext, hash01, shade_blocks};

/// Maximum number of palette colors used.
pub const MAX_COLORS: usize = 8;

/// Parameters controlling the color-bends field.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBendsParams {
    pub colors: Vec<PackedRgba>,
    /// Static rotation in degrees.
    pub rotation: f64,
    /// Additional rotation in degrees per second.
    pub auto_rotate: f64,
    pub speed: f64,
    /// Zoom; smaller values show broader bands.
    pub scale: f64,
    pub frequency: f64,
    pub warp_strength: f64,
    /// How strongly the pointer bends the field (0 disables pointer tracking).
    pub mouse_influence: f64,
    /// How far the field shifts against the pointer.
    pub parallax: f64,
    /// Film-grain strength.
    pub noise: f64,
    /// Fade low-energy regions to transparent instead of the page background.
    pub transparent: bool,
}

impl Default for ColorBendsParams {
    fn default() -> Self {
        Self {
            colors: vec![
                PackedRgba::from_hex(0xff5c7a),
                PackedRgba::from_hex(0x8a5cff),
                PackedRgba::from_hex(0x00ffd1),
            ],
            rotation: 45.0,
            auto_rotate: 0.0,
            speed: 0.2,
            scale: 1.0,
            frequency: 1.0,
            warp_strength: 1.0,
            mouse_influence: 1.0,
            parallax: 0.5,
            noise: 0.1,
            transparent: true,
        }
    }
}

impl ColorBendsParams {
    /// Contact page backdrop.
    pub fn contact_page() -> Self {
        Self {
            colors: vec![
                PackedRgba::from_hex(0xff3366),
                PackedRgba::from_hex(0x9933ff),
                PackedRgba::from_hex(0x00ffcc),
                PackedRgba::from_hex(0xff6600),
            ],
            rotation: 30.0,
            speed: 0.1,
            scale: 0.6,
            frequency: 0.8,
            warp_strength: 0.8,
            mouse_influence: 0.0,
            parallax: 0.0,
            noise: 0.02,
            transparent: false,
            ..Self::default()
        }
    }

    fn tracks_pointer(&self) -> bool {
        self.mouse_influence > 0.0 || self.parallax > 0.0
    }
}

/// Color bends backdrop effect.
#[derive(Debug, Clone)]
pub struct ColorBendsFx {
    params: ColorBendsParams,
    /// Unit wave directions, one per palette color.
    directions: Vec<(f64, f64)>,
    time: f64,
    pointer: (f64, f64),
    size: (u32, u32),
}

impl ColorBendsFx {
    pub fn new(params: ColorBendsParams) -> Self {
        let n = params.colors.len().min(MAX_COLORS);
        let directions = (0..n)
            .map(|i| {
                let angle = i as f64 * TAU / n.max(1) as f64 + 0.35;
                (angle.cos(), angle.sin())
            })
            .collect();
        Self {
            params,
            directions,
            time: 0.0,
            pointer: (0.0, 0.0),
            size: (0, 0),
        }
    }

    /// Mix the palette at centred, rotated coordinates `(px, py)`.
    ///
    /// Returns the blended color and the peak wave energy in `[0, 1]`.
    fn sample(&self, px: f64, py: f64) -> (PackedRgba, f64) {
        let p = &self.params;
        let t = self.time * p.speed * 6.0;
        let freq = p.frequency.max(0.0);
        let (mx, my) = self.pointer;
        let near_pointer = (-((px - mx).powi(2) + (py - my).powi(2)) * 4.0).exp();
        let warp = p.warp_strength * 0.5 + p.mouse_influence * 0.3 * near_pointer;
        let qx = px + warp * (py * freq * 3.0 + t).sin();
        let qy = py + warp * (px * freq * 3.0 - t * 0.8).cos();

        let mut acc = [0.0f64; 3];
        let mut total = 0.0;
        let mut peak = 0.0f64;
        for (i, (color, (dx, dy))) in p.colors.iter().zip(&self.directions).enumerate() {
            let phase =
                (qx * dx + qy * dy) * freq * 4.0 + t * (1.0 + 0.2 * i as f64) + i as f64 * 1.7;
            let s = 0.5 + 0.5 * phase.sin();
            let w = s.powi(4);
            acc[0] += color.r() as f64 * w;
            acc[1] += color.g() as f64 * w;
            acc[2] += color.b() as f64 * w;
            total += w;
            peak = peak.max(s);
        }
        if total <= f64::EPSILON {
            return (PackedRgba::TRANSPARENT, 0.0);
        }
        let mixed = PackedRgba::rgb(
            (acc[0] / total).round().clamp(0.0, 255.0) as u8,
            (acc[1] / total).round().clamp(0.0, 255.0) as u8,
            (acc[2] / total).round().clamp(0.0, 255.0) as u8,
        );
        (mixed, peak)
    }
}

impl Default for ColorBendsFx {
    fn default() -> Self {
        Self::new(ColorBendsParams::default())
    }
}

impl BackdropFx for ColorBendsFx {
    fn name(&self) -> &'static str {
        "color-bends"
    }

    fn listeners(&self) -> ListenerKinds {
        if self.params.tracks_pointer() {
            ListenerKinds::RESIZE | ListenerKinds::POINTER_MOVE | ListenerKinds::POINTER_OUT
        } else {
            ListenerKinds::RESIZE
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn handle_input(&mut self, event: &InputEvent) {
        let InputEvent::Pointer(pointer) = event else {
            return;
        };
        if !self.params.tracks_pointer() {
            return;
        }
        match pointer.kind {
            ListenerKind::PointerMove => {
                let (w, h) = self.size;
                if w == 0 || h == 0 {
                    return;
                }
                let aspect = w as f64 / h as f64;
                self.pointer = (
                    (pointer.x as f64 / w as f64 - 0.5) * aspect,
                    0.5 - pointer.y as f64 / h as f64,
                );
            }
            ListenerKind::PointerOut => self.pointer = (0.0, 0.0),
            _ => {}
        }
    }

    fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
    }

    fn render(&mut self, ctx: FxContext<'_>, out: &mut [PackedRgba]) {
        if !ctx.quality.is_enabled() || ctx.is_empty() {
            return;
        }
        debug_assert_eq!(out.len(), ctx.len());

        let p = &self.params;
        let aspect = ctx.width as f64 / ctx.height as f64;
        let angle = (p.rotation + p.auto_rotate * self.time).to_radians();
        let (sin_a, cos_a) = angle.sin_cos();
        let zoom = 1.0 / p.scale.max(0.01);
        let shift = (-self.pointer.0 * p.parallax * 0.25, -self.pointer.1 * p.parallax * 0.25);
        let grain = (p.noise.clamp(0.0, 1.0) * 0.5) as f32;
        let seed = ctx.frame as u32;
        let bg = ctx.theme.bg_base;
        let transparent = p.transparent;

        shade_blocks(&ctx, out, |nx, ny, x, y| {
            let cx = (nx - 0.5) * aspect * zoom + shift.0;
            let cy = (0.5 - ny) * zoom + shift.1;
            let rx = cx * cos_a - cy * sin_a;
            let ry = cx * sin_a + cy * cos_a;
            let (color, energy) = self.sample(rx, ry);
            let noise = (hash01(x, y, seed) - 0.5) * grain;
            let color = color.scale(1.0 + noise);
            if transparent {
                color.with_opacity(energy as f32)
            } else {
                bg.lerp(color, (0.35 + 0.65 * energy) as f32)
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual_fx::{FxQuality, ThemeInputs};
    use dexlora_core::event::PointerEvent;

    fn render(fx: &mut ColorBendsFx, w: u32, h: u32) -> Vec<PackedRgba> {
        let theme = ThemeInputs::default();
        let ctx = FxContext {
            width: w,
            height: h,
            frame: 2,
            time_seconds: 0.0,
            quality: FxQuality::Full,
            theme: &theme,
        };
        let mut out = vec![PackedRgba::TRANSPARENT; ctx.len()];
        fx.render(ctx, &mut out);
        out
    }

    #[test]
    fn contact_preset_is_opaque_and_ignores_pointer() {
        let mut fx = ColorBendsFx::new(ColorBendsParams::contact_page());
        assert_eq!(fx.listeners(), ListenerKinds::RESIZE);
        let out = render(&mut fx, 16, 9);
        assert!(out.iter().all(|p| p.a() == 255));
    }

    #[test]
    fn colors_capped() {
        let fx = ColorBendsFx::new(ColorBendsParams {
            colors: vec![PackedRgba::WHITE; 20],
            ..ColorBendsParams::default()
        });
        assert_eq!(fx.directions.len(), MAX_COLORS);
    }

    #[test]
    fn empty_palette_renders_transparent() {
        let mut fx = ColorBendsFx::new(ColorBendsParams {
            colors: Vec::new(),
            ..ColorBendsParams::default()
        });
        let out = render(&mut fx, 4, 4);
        assert!(out.iter().all(|p| p.a() == 0));
    }

    #[test]
    fn animation_changes_output() {
        let mut fx = ColorBendsFx::new(ColorBendsParams::contact_page());
        let before = render(&mut fx, 12, 12);
        fx.advance(2.0);
        let after = render(&mut fx, 12, 12);
        assert_ne!(before, after);
    }

    #[test]
    fn pointer_tracking_when_enabled() {
        let mut fx = ColorBendsFx::default();
        fx.resize(100, 100);
        fx.handle_input(&InputEvent::Pointer(PointerEvent::new(
            ListenerKind::PointerMove,
            100.0,
            0.0,
        )));
        assert_eq!(fx.pointer, (0.5, 0.5));
    }
}
