#![forbid(unsafe_code)]

//! Drifting particle field.
//!
//! Particles are seeded inside a unit ball, scaled by `spread`, and projected
//! through a narrow perspective camera. Each particle wobbles on its own phase;
//! the whole cloud slowly rotates and, with hover enabled, leans away from
//! the pointer.

use dexlora_core::event::{InputEvent, ListenerKind, ListenerKinds};
use dexlora_render::PackedRgba;
use dexlora_render::surface::raster;

use crate::rng::SeededRng;
use crate::visual_fx::{BackdropFx, FxContext};

/// Vertical field of view of the particle camera, in degrees.
const CAMERA_FOV_DEG: f64 = 15.0;

/// Parameters controlling the particle field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticlesParams {
    pub count: usize,
    /// Radius of the cloud in world units.
    pub spread: f64,
    /// Animation speed multiplier.
    pub speed: f64,
    /// Palette; each particle picks one color.
    pub colors: Vec<PackedRgba>,
    /// Base point size before perspective division.
    pub base_size: f64,
    /// Per-particle size variation in `[0, 1]`.
    pub size_randomness: f64,
    pub camera_distance: f64,
    pub move_on_hover: bool,
    pub hover_factor: f64,
    /// Soft glowing points instead of solid discs.
    pub alpha_particles: bool,
    pub disable_rotation: bool,
    pub seed: u64,
}

impl Default for ParticlesParams {
    fn default() -> Self {
        Self {
            count: 200,
            spread: 10.0,
            speed: 0.1,
            colors: vec![PackedRgba::WHITE],
            base_size: 100.0,
            size_randomness: 1.0,
            camera_distance: 20.0,
            move_on_hover: false,
            hover_factor: 1.0,
            alpha_particles: false,
            disable_rotation: false,
            seed: 0x9e37_79b9,
        }
    }
}

impl ParticlesParams {
    /// Founders section background: a sparse white field that follows the pointer.
    pub fn founders() -> Self {
        Self {
            count: 30,
            colors: vec![PackedRgba::WHITE, PackedRgba::WHITE],
            move_on_hover: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Particle {
    pos: [f64; 3],
    random: [f64; 4],
    color: PackedRgba,
}

/// Particle field backdrop effect.
#[derive(Debug, Clone)]
pub struct ParticlesFx {
    params: ParticlesParams,
    particles: Vec<Particle>,
    /// Accumulated animation time in milliseconds, already scaled by `speed`.
    elapsed_ms: f64,
    /// Pointer position in normalized device coordinates (`[-1, 1]`, y up).
    mouse: (f64, f64),
    size: (u32, u32),
}

impl ParticlesFx {
    pub fn new(params: ParticlesParams) -> Self {
        let particles = Self::seed_particles(&params);
        Self {
            params,
            particles,
            elapsed_ms: 0.0,
            mouse: (0.0, 0.0),
            size: (0, 0),
        }
    }

    fn seed_particles(params: &ParticlesParams) -> Vec<Particle> {
        let mut rng = SeededRng::new(params.seed);
        let fallback = [PackedRgba::WHITE];
        let palette: &[PackedRgba] = if params.colors.is_empty() {
            &fallback
        } else {
            &params.colors
        };
        (0..params.count)
            .map(|_| {
                let (x, y, z) = loop {
                    let x = rng.next_f64() * 2.0 - 1.0;
                    let y = rng.next_f64() * 2.0 - 1.0;
                    let z = rng.next_f64() * 2.0 - 1.0;
                    let len = x * x + y * y + z * z;
                    if len <= 1.0 && len > 0.0 {
                        break (x, y, z);
                    }
                };
                let r = rng.next_f64().cbrt();
                let random = [rng.next_f64(), rng.next_f64(), rng.next_f64(), rng.next_f64()];
                let color = rng.pick(palette).copied().unwrap_or(PackedRgba::WHITE);
                Particle {
                    pos: [x * r, y * r, z * r],
                    random,
                    color,
                }
            })
            .collect()
    }

    /// Number of seeded particles.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Current pointer offset in normalized device coordinates.
    pub fn pointer(&self) -> (f64, f64) {
        self.mouse
    }

    fn rotation(&self) -> [f64; 3] {
        if self.params.disable_rotation {
            return [0.0; 3];
        }
        let t = self.elapsed_ms;
        [
            (t * 0.0002).sin() * 0.1,
            (t * 0.0005).cos() * 0.15,
            0.01 * self.params.speed * t / 16.0,
        ]
    }
}

impl Default for ParticlesFx {
    fn default() -> Self {
        Self::new(ParticlesParams::default())
    }
}

#[inline]
fn rotate(p: [f64; 3], [rx, ry, rz]: [f64; 3]) -> [f64; 3] {
    let (sx, cx) = rx.sin_cos();
    let (sy, cy) = ry.sin_cos();
    let (sz, cz) = rz.sin_cos();
    let [x, y, z] = p;
    let (y, z) = (y * cx - z * sx, y * sx + z * cx);
    let (x, z) = (x * cy + z * sy, -x * sy + z * cy);
    let (x, y) = (x * cz - y * sz, x * sz + y * cz);
    [x, y, z]
}

impl BackdropFx for ParticlesFx {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn listeners(&self) -> ListenerKinds {
        if self.params.move_on_hover {
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
        if !self.params.move_on_hover {
            return;
        }
        match pointer.kind {
            ListenerKind::PointerMove => {
                let (w, h) = self.size;
                if w == 0 || h == 0 {
                    return;
                }
                let nx = (pointer.x as f64 / w as f64) * 2.0 - 1.0;
                let ny = -((pointer.y as f64 / h as f64) * 2.0 - 1.0);
                self.mouse = (nx.clamp(-1.0, 1.0), ny.clamp(-1.0, 1.0));
            }
            ListenerKind::PointerOut => self.mouse = (0.0, 0.0),
            _ => {}
        }
    }

    fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed_ms += dt * 1000.0 * self.params.speed;
        }
    }

    fn render(&mut self, ctx: FxContext<'_>, out: &mut [PackedRgba]) {
        if !ctx.quality.is_enabled() || ctx.is_empty() {
            return;
        }
        debug_assert_eq!(out.len(), ctx.len());
        out.fill(PackedRgba::TRANSPARENT);

        let (w, h) = (ctx.width as f64, ctx.height as f64);
        let focal = (h * 0.5) / (CAMERA_FOV_DEG.to_radians() * 0.5).tan();
        let t = self.elapsed_ms * 0.001;
        let rotation = self.rotation();
        let (hover_x, hover_y) = if self.params.move_on_hover {
            (
                -self.mouse.0 * self.params.hover_factor,
                -self.mouse.1 * self.params.hover_factor,
            )
        } else {
            (0.0, 0.0)
        };
        let spread = self.params.spread;
        let count = ctx.quality.scale_count(self.particles.len());

        for particle in self.particles.iter().take(count) {
            let [rx, ry, rz, rw] = particle.random;
            let mut p = [
                particle.pos[0] * spread,
                particle.pos[1] * spread,
                particle.pos[2] * spread * 10.0,
            ];
            p[0] += (t * rz + std::f64::consts::TAU * rw).sin() * lerp(0.1, 1.5, rx);
            p[1] += (t * ry + std::f64::consts::TAU * rx).sin() * lerp(0.1, 1.5, rw);
            p[2] += (t * rw + std::f64::consts::TAU * ry).sin() * lerp(0.1, 1.5, rz);
            let [x, y, z] = rotate(p, rotation);
            let depth = self.params.camera_distance - z;
            if depth <= 0.1 {
                continue;
            }
            let sx = w * 0.5 + (x + hover_x) * focal / depth;
            let sy = h * 0.5 - (y + hover_y) * focal / depth;
            let point = self.params.base_size
                * (1.0 + self.params.size_randomness * (rx - 0.5))
                / depth;
            // Surfaces under 2 px tall still get half-pixel points.
            let radius = (point * 0.5).clamp(0.5, (h * 0.25).max(0.5)) as f32;
            if self.params.alpha_particles {
                raster::glow_disc(
                    out,
                    ctx.width,
                    ctx.height,
                    sx as f32,
                    sy as f32,
                    radius,
                    particle.color,
                );
            } else {
                raster::fill_disc(
                    out,
                    ctx.width,
                    ctx.height,
                    sx as f32,
                    sy as f32,
                    radius,
                    particle.color,
                );
            }
        }
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual_fx::{FxQuality, ThemeInputs};
    use dexlora_core::event::PointerEvent;

    fn ctx(theme: &ThemeInputs, quality: FxQuality) -> FxContext<'_> {
        FxContext {
            width: 64,
            height: 48,
            frame: 1,
            time_seconds: 0.5,
            quality,
            theme,
        }
    }

    #[test]
    fn founders_preset_matches_section() {
        let params = ParticlesParams::founders();
        assert_eq!(params.count, 30);
        assert!(params.move_on_hover);
        let fx = ParticlesFx::new(params);
        assert_eq!(fx.particle_count(), 30);
        assert!(fx.listeners().contains(ListenerKinds::POINTER_MOVE));
    }

    #[test]
    fn seeded_particles_stay_in_unit_ball() {
        let fx = ParticlesFx::default();
        for p in &fx.particles {
            let len = p.pos.iter().map(|c| c * c).sum::<f64>();
            assert!(len <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn renders_something_visible() {
        let theme = ThemeInputs::default();
        let mut fx = ParticlesFx::default();
        fx.resize(64, 48);
        fx.advance(0.016);
        let mut out = vec![PackedRgba::TRANSPARENT; 64 * 48];
        fx.render(ctx(&theme, FxQuality::Full), &mut out);
        assert!(out.iter().any(|p| p.a() > 0));
    }

    #[test]
    fn hover_tracks_pointer_and_resets_on_out() {
        let mut fx = ParticlesFx::new(ParticlesParams::founders());
        fx.resize(100, 100);
        fx.handle_input(&InputEvent::Pointer(PointerEvent::new(
            ListenerKind::PointerMove,
            100.0,
            0.0,
        )));
        assert_eq!(fx.pointer(), (1.0, 1.0));
        fx.handle_input(&InputEvent::Pointer(PointerEvent::new(
            ListenerKind::PointerOut,
            0.0,
            0.0,
        )));
        assert_eq!(fx.pointer(), (0.0, 0.0));
    }

    #[test]
    fn hover_ignored_when_disabled() {
        let mut fx = ParticlesFx::default();
        fx.resize(100, 100);
        fx.handle_input(&InputEvent::Pointer(PointerEvent::new(
            ListenerKind::PointerMove,
            0.0,
            0.0,
        )));
        assert_eq!(fx.pointer(), (0.0, 0.0));
    }

    #[test]
    fn off_quality_leaves_buffer_untouched() {
        let theme = ThemeInputs::default();
        let mut fx = ParticlesFx::default();
        let mut out = vec![PackedRgba::WHITE; 64 * 48];
        fx.render(ctx(&theme, FxQuality::Off), &mut out);
        assert!(out.iter().all(|p| *p == PackedRgba::WHITE));
    }

    #[test]
    fn one_pixel_tall_surface_renders() {
        let theme = ThemeInputs::default();
        let mut fx = ParticlesFx::default();
        for (width, height) in [(300, 1), (1, 1), (64, 0)] {
            fx.resize(width, height);
            fx.advance(0.016);
            let mut out = vec![PackedRgba::TRANSPARENT; (width * height) as usize];
            fx.render(
                FxContext {
                    width,
                    height,
                    ..ctx(&theme, FxQuality::Full)
                },
                &mut out,
            );
        }
    }

    #[test]
    fn empty_palette_falls_back_to_white() {
        let fx = ParticlesFx::new(ParticlesParams {
            colors: Vec::new(),
            count: 3,
            ..ParticlesParams::default()
        });
        assert!(fx.particles.iter().all(|p| p.color == PackedRgba::WHITE));
    }
}
