#![forbid(unsafe_code)]

//! Vertical column of light with a soft halo and a slow twist.

use dexlora_render::PackedRgba;

use crate::visual_fx::{BackdropFx, FxContext, hash01, shade_blocks, smoothstep};

/// Parameters controlling the light pillar.
#[derive(Debug, Clone, PartialEq)]
pub struct LightPillarParams {
    pub top_color: PackedRgba,
    pub bottom_color: PackedRgba,
    pub intensity: f64,
    /// Twist speed (radians per second).
    pub rotation_speed: f64,
    /// Halo strength around the core.
    pub glow_amount: f64,
    /// Core width relative to the viewport height.
    pub pillar_width: f64,
    /// Twist frequency along the column.
    pub pillar_height: f64,
    /// Film-grain strength in `[0, 1]`.
    pub noise_intensity: f64,
    /// Tilt of the column in degrees.
    pub pillar_rotation: f64,
}

impl Default for LightPillarParams {
    fn default() -> Self {
        Self {
            top_color: PackedRgba::from_hex(0x5227ff),
            bottom_color: PackedRgba::from_hex(0xff9ffc),
            intensity: 1.0,
            rotation_speed: 0.3,
            glow_amount: 0.005,
            pillar_width: 3.0,
            pillar_height: 0.4,
            noise_intensity: 0.5,
            pillar_rotation: 0.0,
        }
    }
}

/// Light pillar backdrop effect.
#[derive(Debug, Clone)]
pub struct LightPillarFx {
    params: LightPillarParams,
    time: f64,
}

impl LightPillarFx {
    pub fn new(params: LightPillarParams) -> Self {
        Self { params, time: 0.0 }
    }

    /// Brightness of the column at centred coordinates `(u, v)`, `v` up.
    fn brightness(&self, u: f64, v: f64) -> f64 {
        let p = &self.params;
        let twist = (v * p.pillar_height * 6.0 + self.time * p.rotation_speed * 4.0).sin() * 0.12;
        let width = (p.pillar_width * 0.05).max(1e-3);
        let d = (u - twist) / width;
        let core = (-d * d).exp();
        let halo = p.glow_amount * 60.0 / (1.0 + 0.5 * d * d);
        let vertical = 1.0 - 0.6 * smoothstep(0.6, 1.0, v.abs());
        (p.intensity * (core + halo) * vertical).max(0.0)
    }
}

impl Default for LightPillarFx {
    fn default() -> Self {
        Self::new(LightPillarParams::default())
    }
}

impl BackdropFx for LightPillarFx {
    fn name(&self) -> &'static str {
        "light-pillar"
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

        let aspect = ctx.width as f64 / ctx.height as f64;
        let (sin_r, cos_r) = self.params.pillar_rotation.to_radians().sin_cos();
        let grain = (self.params.noise_intensity.clamp(0.0, 1.0) * 0.08) as f32;
        let seed = ctx.frame as u32;
        let bg = ctx.theme.bg_base;
        let (top, bottom) = (self.params.top_color, self.params.bottom_color);

        shade_blocks(&ctx, out, |nx, ny, x, y| {
            let cu = (nx - 0.5) * 2.0 * aspect;
            let cv = (0.5 - ny) * 2.0;
            let u = cu * cos_r - cv * sin_r;
            let v = cu * sin_r + cv * cos_r;
            let b = self.brightness(u, v);
            let tint = bottom.lerp(top, (v * 0.5 + 0.5) as f32);
            let noise = (hash01(x, y, seed) - 0.5) * grain;
            let amount = (b as f32 + noise).clamp(0.0, 1.0);
            bg.lerp(tint.scale(1.0 + (b as f32 - 1.0).max(0.0) * 0.5), amount)
        });
    }
}
