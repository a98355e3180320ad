#![forbid(unsafe_code)]

//! Hyperspeed tunnel: a two-way highway of light streaks rushing past the
//! camera.
//!
//! The scene is a road split by a central island, car light pairs travelling
//! away on the left roadway and toward the camera on the right, and a row of
//! glowing sticks along the left shoulder. Every point is bent by a
//! [`Distortion`] profile that animates with time. Pressing (mouse down or
//! touch start) eases the speed and field of view up; releasing eases them
//! back down.

use std::f64::consts::PI;

use dexlora_core::event::{InputEvent, ListenerKinds};
use dexlora_render::PackedRgba;
use dexlora_render::surface::raster;

use crate::rng::SeededRng;
use crate::visual_fx::{BackdropFx, FxContext, FxQuality, lerp_step, nsin, smoothstep};

/// Camera position in world space.
const CAMERA: [f64; 3] = [0.0, 8.0, -5.0];
/// Number of road segments at full quality.
const ROAD_SEGMENTS: usize = 48;

/// Shape of the animated road bend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Distortion {
    Mountain,
    Xy,
    LongRace,
    #[default]
    Turbulent,
    Deep,
}

impl Distortion {
    pub const ALL: [Self; 5] = [
        Self::Mountain,
        Self::Xy,
        Self::LongRace,
        Self::Turbulent,
        Self::Deep,
    ];

    /// Stable identifier (as used in page configuration).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mountain => "mountainDistortion",
            Self::Xy => "xyDistortion",
            Self::LongRace => "LongRaceDistortion",
            Self::Turbulent => "turbulentDistortion",
            Self::Deep => "deepDistortion",
        }
    }

    /// Parse a stable identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }

    /// `(frequency, amplitude)` uniforms of the profile.
    pub const fn uniforms(self) -> ([f64; 4], [f64; 4]) {
        match self {
            Self::Mountain => ([3.0, 6.0, 10.0, 0.0], [30.0, 30.0, 20.0, 0.0]),
            Self::Xy => ([5.0, 2.0, 0.0, 0.0], [25.0, 15.0, 0.0, 0.0]),
            Self::LongRace => ([2.0, 3.0, 0.0, 0.0], [35.0, 10.0, 0.0, 0.0]),
            Self::Turbulent => ([4.0, 8.0, 8.0, 1.0], [25.0, 5.0, 10.0, 10.0]),
            Self::Deep => ([4.0, 8.0, 0.0, 0.0], [10.0, 20.0, 0.0, 0.0]),
        }
    }

    /// World-space offset applied to a point at `progress` (`0` at the
    /// camera, `1` at the far end of the road).
    pub fn offset(self, progress: f64, time: f64) -> [f64; 3] {
        let (f, a) = self.uniforms();
        match self {
            Self::Mountain => {
                let fix = 0.02;
                [
                    (progress * PI * f[0] + time).cos() * a[0]
                        - (fix * PI * f[0] + time).cos() * a[0],
                    nsin(progress * PI * f[1] + time) * a[1] - nsin(fix * PI * f[1] + time) * a[1],
                    nsin(progress * PI * f[2] + time) * a[2] - nsin(fix * PI * f[2] + time) * a[2],
                ]
            }
            Self::Xy => {
                let fix = 0.02;
                [
                    (progress * PI * f[0] + time).cos() * a[0]
                        - (fix * PI * f[0] + time).cos() * a[0],
                    (progress * PI * f[1] + PI / 2.0 + time).sin() * a[1]
                        - (fix * PI * f[1] + PI / 2.0 + time).sin() * a[1],
                    0.0,
                ]
            }
            Self::LongRace => {
                let cam = 0.0125;
                [
                    (progress * PI * f[0] + time).sin() * a[0]
                        - (cam * PI * f[0] + time).sin() * a[0],
                    (progress * PI * f[1] + time).sin() * a[1]
                        - (cam * PI * f[1] + time).sin() * a[1],
                    0.0,
                ]
            }
            Self::Turbulent => {
                let cam = 0.0125;
                [
                    turbulent_x(progress, time, f, a) - turbulent_x(cam, time, f, a),
                    turbulent_y(progress, time, f, a) - turbulent_y(cam, time, f, a),
                    0.0,
                ]
            }
            Self::Deep => {
                let cam = 0.02;
                [
                    deep_x(progress, time, f, a) - deep_x(cam, time, f, a),
                    deep_y(progress, time, f, a) - deep_y(cam, time, f, a),
                    0.0,
                ]
            }
        }
    }

    /// Camera look-at offset relative to the camera position.
    pub fn look_at(self, time: f64) -> [f64; 3] {
        let progress = 0.025;
        let (f, a) = self.uniforms();
        let (raw, amp, offset_z) = match self {
            Self::Mountain => (self.offset(progress, time), [2.0, 2.0, 2.0], -5.0),
            Self::Xy => (self.offset(progress, time), [2.0, 0.4, 1.0], -3.0),
            Self::LongRace => (self.offset(progress, time), [1.0, 1.0, 0.0], -5.0),
            Self::Turbulent => (
                [
                    turbulent_x(progress, time, f, a) - turbulent_x(progress + 0.007, time, f, a),
                    turbulent_y(progress, time, f, a) - turbulent_y(progress + 0.007, time, f, a),
                    0.0,
                ],
                [-2.0, -5.0, 0.0],
                -10.0,
            ),
            Self::Deep => (
                [
                    deep_x(progress, time, f, a) - deep_x(progress + 0.01, time, f, a),
                    deep_y(progress, time, f, a) - deep_y(progress + 0.01, time, f, a),
                    0.0,
                ],
                [-2.0, -4.0, 0.0],
                -10.0,
            ),
        };
        [raw[0] * amp[0], raw[1] * amp[1], raw[2] * amp[2] + offset_z]
    }
}

fn turbulent_x(p: f64, time: f64, f: [f64; 4], a: [f64; 4]) -> f64 {
    (PI * p * f[0] + time).cos() * a[0]
        + (PI * p * f[1] + time * (f[1] / f[0])).cos().powi(2) * a[1]
}

fn turbulent_y(p: f64, time: f64, f: [f64; 4], a: [f64; 4]) -> f64 {
    -nsin(PI * p * f[2] + time) * a[2] - nsin(PI * p * f[3] + time / (f[2] / f[3])).powi(5) * a[3]
}

/// `uPowY` of the deep profile.
const DEEP_POW_Y: (f64, f64) = (20.0, 2.0);

fn deep_x(p: f64, time: f64, f: [f64; 4], a: [f64; 4]) -> f64 {
    (p * PI * f[0] + time).sin() * a[0]
}

fn deep_y(p: f64, time: f64, f: [f64; 4], a: [f64; 4]) -> f64 {
    (p * DEEP_POW_Y.0).abs().powf(DEEP_POW_Y.1) + (p * PI * f[1] + time).sin() * a[1]
}

/// Scene colors.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperspeedColors {
    pub road: PackedRgba,
    pub island: PackedRgba,
    pub background: PackedRgba,
    pub shoulder_lines: PackedRgba,
    pub broken_lines: PackedRgba,
    pub left_cars: Vec<PackedRgba>,
    pub right_cars: Vec<PackedRgba>,
    pub sticks: PackedRgba,
}

impl Default for HyperspeedColors {
    fn default() -> Self {
        Self {
            road: PackedRgba::from_hex(0x080808),
            island: PackedRgba::from_hex(0x0a0a0a),
            background: PackedRgba::from_hex(0x000000),
            shoulder_lines: PackedRgba::from_hex(0xffffff),
            broken_lines: PackedRgba::from_hex(0xffffff),
            left_cars: vec![
                PackedRgba::from_hex(0xd856bf),
                PackedRgba::from_hex(0x6750a2),
                PackedRgba::from_hex(0xc247ac),
            ],
            right_cars: vec![
                PackedRgba::from_hex(0x03b3c3),
                PackedRgba::from_hex(0x0e5ea5),
                PackedRgba::from_hex(0x324555),
            ],
            sticks: PackedRgba::from_hex(0x03b3c3),
        }
    }
}

/// Parameters controlling the hyperspeed scene. Ranges are `(min, max)` and
/// sampled once per element at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperspeedParams {
    pub distortion: Distortion,
    /// Travel length of the road in world units.
    pub length: f64,
    pub road_width: f64,
    pub island_width: f64,
    pub lanes_per_road: u32,
    /// Resting field of view (degrees).
    pub fov: f64,
    /// Field of view while pressed (degrees).
    pub fov_speed_up: f64,
    /// Extra speed while pressed.
    pub speed_up: f64,
    pub car_lights_fade: f64,
    pub total_side_light_sticks: u32,
    pub light_pairs_per_road_way: u32,
    pub shoulder_lines_width_percentage: f64,
    pub broken_lines_width_percentage: f64,
    pub broken_lines_length_percentage: f64,
    pub light_stick_width: (f64, f64),
    pub light_stick_height: (f64, f64),
    pub moving_away_speed: (f64, f64),
    pub moving_closer_speed: (f64, f64),
    pub car_lights_length: (f64, f64),
    pub car_lights_radius: (f64, f64),
    pub car_width_percentage: (f64, f64),
    pub car_shift_x: (f64, f64),
    pub car_floor_separation: (f64, f64),
    pub colors: HyperspeedColors,
    pub seed: u64,
}

impl Default for HyperspeedParams {
    fn default() -> Self {
        Self {
            distortion: Distortion::Turbulent,
            length: 400.0,
            road_width: 10.0,
            island_width: 2.0,
            lanes_per_road: 4,
            fov: 90.0,
            fov_speed_up: 150.0,
            speed_up: 2.0,
            car_lights_fade: 0.4,
            total_side_light_sticks: 20,
            light_pairs_per_road_way: 40,
            shoulder_lines_width_percentage: 0.05,
            broken_lines_width_percentage: 0.1,
            broken_lines_length_percentage: 0.5,
            light_stick_width: (0.12, 0.5),
            light_stick_height: (1.3, 1.7),
            moving_away_speed: (60.0, 80.0),
            moving_closer_speed: (-120.0, -160.0),
            car_lights_length: (400.0 * 0.03, 400.0 * 0.2),
            car_lights_radius: (0.05, 0.14),
            car_width_percentage: (0.3, 0.5),
            car_shift_x: (-0.8, 0.8),
            car_floor_separation: (0.0, 5.0),
            colors: HyperspeedColors::default(),
            seed: 0x5eed_0001,
        }
    }
}

impl HyperspeedParams {
    /// Contact page hero: a shorter, lighter road.
    pub fn contact_hero() -> Self {
        Self {
            length: 300.0,
            lanes_per_road: 3,
            total_side_light_sticks: 10,
            light_pairs_per_road_way: 20,
            moving_away_speed: (40.0, 60.0),
            moving_closer_speed: (-80.0, -120.0),
            car_lights_length: (300.0 * 0.03, 300.0 * 0.15),
            car_lights_radius: (0.05, 0.1),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CarLight {
    x: f64,
    y: f64,
    z_offset: f64,
    radius: f64,
    length: f64,
    speed: f64,
    color: PackedRgba,
}

#[derive(Debug, Clone, Copy)]
struct LightStick {
    offset: f64,
    width: f64,
    height: f64,
}

/// Camera state for one frame.
#[derive(Debug, Clone, Copy)]
struct Projector {
    focal: f64,
    cx: f64,
    cy: f64,
}

impl Projector {
    /// World point to screen pixels, or `None` behind the near plane.
    #[inline]
    fn project(&self, p: [f64; 3]) -> Option<(f64, f64, f64)> {
        let depth = CAMERA[2] - p[2];
        if depth <= 0.1 {
            return None;
        }
        let sx = self.cx + (p[0] - CAMERA[0]) * self.focal / depth;
        let sy = self.cy - (p[1] - CAMERA[1]) * self.focal / depth;
        Some((sx, sy, depth))
    }
}

/// Hyperspeed backdrop effect.
#[derive(Debug, Clone)]
pub struct HyperspeedFx {
    params: HyperspeedParams,
    left_cars: Vec<CarLight>,
    right_cars: Vec<CarLight>,
    sticks: Vec<LightStick>,
    fov: f64,
    fov_target: f64,
    speed_up: f64,
    speed_up_target: f64,
    time_offset: f64,
    elapsed: f64,
}

impl HyperspeedFx {
    pub fn new(params: HyperspeedParams) -> Self {
        let mut rng = SeededRng::new(params.seed);
        let left_x = -params.road_width / 2.0 - params.island_width / 2.0;
        let right_x = params.road_width / 2.0 + params.island_width / 2.0;
        let left_cars = Self::seed_cars(
            &params,
            &mut rng,
            &params.colors.left_cars,
            params.moving_away_speed,
            left_x,
        );
        let right_cars = Self::seed_cars(
            &params,
            &mut rng,
            &params.colors.right_cars,
            params.moving_closer_speed,
            right_x,
        );
        let sticks = Self::seed_sticks(&params, &mut rng);
        Self {
            fov: params.fov,
            fov_target: params.fov,
            speed_up: 0.0,
            speed_up_target: 0.0,
            time_offset: 0.0,
            elapsed: 0.0,
            params,
            left_cars,
            right_cars,
            sticks,
        }
    }

    fn seed_cars(
        params: &HyperspeedParams,
        rng: &mut SeededRng,
        colors: &[PackedRgba],
        speed: (f64, f64),
        x_offset: f64,
    ) -> Vec<CarLight> {
        let lanes = params.lanes_per_road.max(1);
        let lane_width = params.road_width / lanes as f64;
        let mut cars = Vec::with_capacity(params.light_pairs_per_road_way as usize * 2);
        for i in 0..params.light_pairs_per_road_way {
            let radius = rng.range(params.car_lights_radius);
            let length = rng.range(params.car_lights_length);
            let spd = rng.range(speed);
            let lane = i % lanes;
            let mut lane_x = lane as f64 * lane_width - params.road_width / 2.0 + lane_width / 2.0;
            let car_width = rng.range(params.car_width_percentage) * lane_width;
            lane_x += rng.range(params.car_shift_x) * lane_width;
            let y = rng.range(params.car_floor_separation) + radius * 1.3;
            let z_offset = -rng.range((0.0, params.length));
            let color = rng.pick(colors).copied().unwrap_or(PackedRgba::WHITE);
            for x in [lane_x - car_width / 2.0, lane_x + car_width / 2.0] {
                cars.push(CarLight {
                    x: x + x_offset,
                    y,
                    z_offset,
                    radius,
                    length,
                    speed: spd,
                    color,
                });
            }
        }
        cars
    }

    fn seed_sticks(params: &HyperspeedParams, rng: &mut SeededRng) -> Vec<LightStick> {
        let total = params.total_side_light_sticks;
        let spacing = params.length / (total.max(2) - 1) as f64;
        (0..total)
            .map(|i| {
                let width = rng.range(params.light_stick_width);
                let height = rng.range(params.light_stick_height);
                let offset = (i as f64 - 1.0) * spacing * 2.0 + spacing * rng.next_f64();
                LightStick {
                    offset,
                    width,
                    height,
                }
            })
            .collect()
    }

    /// Begin the press speed-up.
    pub fn speed_up(&mut self) {
        self.fov_target = self.params.fov_speed_up;
        self.speed_up_target = self.params.speed_up;
    }

    /// Release the press speed-up.
    pub fn slow_down(&mut self) {
        self.fov_target = self.params.fov;
        self.speed_up_target = 0.0;
    }

    /// Current field of view in degrees.
    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Current extra speed.
    pub fn current_speed_up(&self) -> f64 {
        self.speed_up
    }

    /// Number of seeded car lights (two per pair, both roadways).
    pub fn car_light_count(&self) -> usize {
        self.left_cars.len() + self.right_cars.len()
    }

    /// Scene time: wall time plus the accumulated speed-up offset.
    pub fn scene_time(&self) -> f64 {
        self.elapsed + self.time_offset
    }

    fn fog(&self, color: PackedRgba, depth: f64) -> PackedRgba {
        let near = self.params.length * 0.2;
        let far = self.params.length * 500.0;
        let t = ((depth - near) / (far - near)).clamp(0.0, 1.0);
        color.lerp(self.params.colors.background, t as f32)
    }

    fn distorted(&self, p: [f64; 3], time: f64) -> [f64; 3] {
        let progress = (p[2] / self.params.length).abs();
        let d = self.params.distortion.offset(progress, time);
        [p[0] + d[0], p[1] + d[1], p[2] + d[2]]
    }

    fn draw_road(&self, ctx: &FxContext<'_>, out: &mut [PackedRgba], cam: &Projector, time: f64) {
        let segments = ctx.quality.scale_count(ROAD_SEGMENTS).max(4);
        let length = self.params.length;
        let half_island = self.params.island_width / 2.0;
        let road = self.params.road_width;
        // (left edge, right edge, color) in world x.
        let strips = [
            (-half_island - road, -half_island, self.params.colors.road),
            (-half_island, half_island, self.params.colors.island),
            (half_island, half_island + road, self.params.colors.road),
        ];
        // Far to near, so nearer strips paint over farther ones.
        for seg in (0..segments).rev() {
            let z_near = -(seg as f64) * length / segments as f64;
            let z_far = -((seg + 1) as f64) * length / segments as f64;
            for (x0, x1, color) in strips {
                let corners = [
                    self.distorted([x0, 0.0, z_near], time),
                    self.distorted([x1, 0.0, z_near], time),
                    self.distorted([x0, 0.0, z_far], time),
                    self.distorted([x1, 0.0, z_far], time),
                ];
                let (Some(ln), Some(rn), Some(lf), Some(rf)) = (
                    cam.project(corners[0]),
                    cam.project(corners[1]),
                    cam.project(corners[2]),
                    cam.project(corners[3]),
                ) else {
                    continue;
                };
                let shaded = self.fog(color, ln.2);
                fill_quad(out, ctx.width, ctx.height, [ln, rn, lf, rf], shaded);
            }
        }
        self.draw_markings(ctx, out, cam, time, segments);
    }

    fn draw_markings(
        &self,
        ctx: &FxContext<'_>,
        out: &mut [PackedRgba],
        cam: &Projector,
        time: f64,
        segments: usize,
    ) {
        let length = self.params.length;
        let lanes = self.params.lanes_per_road.max(1);
        let lane_width = self.params.road_width / lanes as f64;
        let half_island = self.params.island_width / 2.0;
        let broken_w = lane_width * self.params.broken_lines_width_percentage;
        let shoulder_w = self.params.road_width * self.params.shoulder_lines_width_percentage;
        let empty = 1.0 - self.params.broken_lines_length_percentage;
        let scroll = time * 0.05;

        for side in [-1.0, 1.0] {
            let inner = half_island * side;
            let outer = (half_island + self.params.road_width) * side;
            for seg in 0..segments {
                let v0 = seg as f64 / segments as f64;
                let v1 = (seg + 1) as f64 / segments as f64;
                let z0 = -v0 * length;
                let z1 = -v1 * length;
                // Shoulder lines are continuous.
                let shoulder = self.params.colors.shoulder_lines;
                for x in [inner, outer] {
                    self.marking(ctx, out, cam, time, (x, z0), (x, z1), shoulder_w, shoulder);
                }
                // Broken lane dividers scroll with time.
                let phase = ((v0 + scroll) * 10.0).fract();
                if phase < empty {
                    continue;
                }
                let broken = self.params.colors.broken_lines;
                for lane in 1..lanes {
                    let x = inner + side * lane as f64 * lane_width;
                    self.marking(ctx, out, cam, time, (x, z0), (x, z1), broken_w, broken);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn marking(
        &self,
        ctx: &FxContext<'_>,
        out: &mut [PackedRgba],
        cam: &Projector,
        time: f64,
        (x0, z0): (f64, f64),
        (x1, z1): (f64, f64),
        width: f64,
        color: PackedRgba,
    ) {
        let (Some(a), Some(b)) = (
            cam.project(self.distorted([x0, 0.0, z0], time)),
            cam.project(self.distorted([x1, 0.0, z1], time)),
        ) else {
            return;
        };
        let thickness = (width * cam.focal / a.2).max(0.5) as f32;
        raster::glow_line(
            out,
            ctx.width,
            ctx.height,
            (a.0 as f32, a.1 as f32),
            (b.0 as f32, b.1 as f32),
            thickness,
            self.fog(color, a.2).with_opacity(0.35),
            1.0,
            1.0,
        );
    }

    fn draw_sticks(&self, ctx: &FxContext<'_>, out: &mut [PackedRgba], cam: &Projector, time: f64) {
        let length = self.params.length;
        let x = -(self.params.road_width + self.params.island_width / 2.0);
        for stick in &self.sticks {
            let t = (time * 60.0 * 2.0 + stick.offset).rem_euclid(length);
            let z = -length + t;
            let base = self.distorted([x - stick.width / 2.0, 0.0, z], time);
            let top = [base[0], base[1] + stick.height, base[2]];
            let (Some(a), Some(b)) = (cam.project(base), cam.project(top)) else {
                continue;
            };
            let thickness = (stick.width * cam.focal / a.2).max(0.75) as f32;
            raster::glow_line(
                out,
                ctx.width,
                ctx.height,
                (a.0 as f32, a.1 as f32),
                (b.0 as f32, b.1 as f32),
                thickness,
                self.fog(self.params.colors.sticks, a.2),
                1.0,
                1.0,
            );
        }
    }

    fn draw_cars(
        &self,
        ctx: &FxContext<'_>,
        out: &mut [PackedRgba],
        cam: &Projector,
        time: f64,
        cars: &[CarLight],
        fade: (f64, f64),
    ) {
        let length = self.params.length;
        // Lights come in pairs; keep pairs intact when thinning.
        let count = ctx.quality.scale_count(cars.len() / 2) * 2;
        for car in cars.iter().take(count) {
            let m = (time * car.speed + car.z_offset).rem_euclid(length);
            // The streak runs from `near` (uv 0) to `far` (uv 1).
            let near = [car.x, car.y, car.length - m];
            let far = [car.x, car.y, -m];
            let (Some(a), Some(b)) = (
                cam.project(self.distorted(near, time)),
                cam.project(self.distorted(far, time)),
            ) else {
                continue;
            };
            let thickness = (car.radius * 2.0 * cam.focal / a.2.max(b.2)).max(0.75) as f32;
            let alpha_near = smoothstep(fade.0, fade.1, 0.0) as f32;
            let alpha_far = smoothstep(fade.0, fade.1, 1.0) as f32;
            raster::glow_line(
                out,
                ctx.width,
                ctx.height,
                (a.0 as f32, a.1 as f32),
                (b.0 as f32, b.1 as f32),
                thickness,
                self.fog(car.color, a.2),
                alpha_near,
                alpha_far,
            );
        }
    }
}

impl Default for HyperspeedFx {
    fn default() -> Self {
        Self::new(HyperspeedParams::default())
    }
}

impl BackdropFx for HyperspeedFx {
    fn name(&self) -> &'static str {
        "hyperspeed"
    }

    fn listeners(&self) -> ListenerKinds {
        ListenerKinds::PRESS | ListenerKinds::RESIZE
    }

    fn handle_input(&mut self, event: &InputEvent) {
        if let InputEvent::Pointer(pointer) = event {
            if pointer.is_press() {
                self.speed_up();
            } else if pointer.is_release() {
                self.slow_down();
            }
        }
    }

    fn advance(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let pct = (-(-60.0 * (1.0f64 - 0.1).log2()) * dt).exp();
        self.speed_up += lerp_step(self.speed_up, self.speed_up_target, pct, 0.00001);
        self.time_offset += self.speed_up * dt;
        self.elapsed += dt;
        let fov_change = lerp_step(self.fov, self.fov_target, pct, 0.001);
        if fov_change != 0.0 {
            self.fov += fov_change * dt * 6.0;
        }
    }

    fn render(&mut self, ctx: FxContext<'_>, out: &mut [PackedRgba]) {
        if !ctx.quality.is_enabled() || ctx.is_empty() {
            return;
        }
        debug_assert_eq!(out.len(), ctx.len());
        out.fill(self.params.colors.background);

        let time = self.scene_time();
        let (w, h) = (ctx.width as f64, ctx.height as f64);
        let fov = self.fov.clamp(1.0, 179.0).to_radians();
        let focal = (h * 0.5) / (fov * 0.5).tan();
        let look = self.params.distortion.look_at(time);
        let look_depth = (-look[2]).max(0.5);
        let cam = Projector {
            focal,
            cx: w * 0.5 - look[0] / look_depth * focal,
            cy: h * 0.5 + look[1] / look_depth * focal,
        };

        self.draw_road(&ctx, out, &cam, time);
        if ctx.quality != FxQuality::Minimal {
            let fade = self.params.car_lights_fade;
            self.draw_cars(&ctx, out, &cam, time, &self.left_cars, (0.0, 1.0 - fade));
            self.draw_cars(&ctx, out, &cam, time, &self.right_cars, (1.0, fade));
        }
        self.draw_sticks(&ctx, out, &cam, time);
    }
}

/// Fill the screen-space quad spanned by a near edge and a far edge.
fn fill_quad(
    out: &mut [PackedRgba],
    width: u32,
    height: u32,
    [ln, rn, lf, rf]: [(f64, f64, f64); 4],
    color: PackedRgba,
) {
    let top = ln.1.min(rn.1).min(lf.1).min(rf.1).floor().max(0.0);
    let bottom = ln.1.max(rn.1).max(lf.1).max(rf.1).ceil().min(height as f64);
    if !(top < bottom) {
        return;
    }
    let edges = [(ln, rn), (rn, rf), (rf, lf), (lf, ln)];
    let mut y = top as u32;
    while (y as f64) < bottom {
        let sy = y as f64 + 0.5;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (a, b) in edges {
            let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
            if sy < y0 || sy > y1 || y1 - y0 < f64::EPSILON {
                continue;
            }
            let t = (sy - a.1) / (b.1 - a.1);
            let x = a.0 + (b.0 - a.0) * t;
            lo = lo.min(x);
            hi = hi.max(x);
        }
        if lo < hi {
            raster::blend_span(out, width, y, lo as f32, hi as f32, color);
        }
        y += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual_fx::ThemeInputs;
    use dexlora_core::event::{ListenerKind, PointerEvent};

    fn press(kind: ListenerKind) -> InputEvent {
        InputEvent::Pointer(PointerEvent::new(kind, 10.0, 10.0))
    }

    fn hash_pixels(pixels: &[PackedRgba]) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for px in pixels {
            hash ^= px.0 as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }

    #[test]
    fn distortion_names_round_trip() {
        for d in Distortion::ALL {
            assert_eq!(Distortion::from_name(d.as_str()), Some(d));
        }
        assert_eq!(Distortion::from_name("nope"), None);
    }

    #[test]
    fn distortion_is_anchored_near_camera() {
        // Each profile subtracts its own value at the camera progress, so the
        // offset vanishes there.
        let anchors = [
            (Distortion::Mountain, 0.02),
            (Distortion::Xy, 0.02),
            (Distortion::LongRace, 0.0125),
            (Distortion::Turbulent, 0.0125),
            (Distortion::Deep, 0.02),
        ];
        for (d, p) in anchors {
            let off = d.offset(p, 1.7);
            assert!(off.iter().all(|c| c.abs() < 1e-9), "{d:?}: {off:?}");
        }
    }

    #[test]
    fn contact_preset_values() {
        let p = HyperspeedParams::contact_hero();
        assert_eq!(p.length, 300.0);
        assert_eq!(p.lanes_per_road, 3);
        assert_eq!(p.total_side_light_sticks, 10);
        assert_eq!(p.light_pairs_per_road_way, 20);
        let fx = HyperspeedFx::new(p);
        assert_eq!(fx.car_light_count(), 80);
    }

    #[test]
    fn press_speeds_up_and_release_slows_down() {
        let mut fx = HyperspeedFx::default();
        fx.handle_input(&press(ListenerKind::PointerDown));
        for _ in 0..120 {
            fx.advance(1.0 / 60.0);
        }
        assert!(fx.current_speed_up() > 1.9);
        assert!(fx.fov() > 140.0);

        fx.handle_input(&press(ListenerKind::PointerOut));
        for _ in 0..240 {
            fx.advance(1.0 / 60.0);
        }
        assert!(fx.current_speed_up() < 0.01);
        assert!(fx.fov() < 95.0);
    }

    #[test]
    fn touch_end_also_slows_down() {
        let mut fx = HyperspeedFx::default();
        fx.handle_input(&press(ListenerKind::TouchStart));
        fx.handle_input(&press(ListenerKind::TouchEnd));
        fx.advance(1.0);
        assert_eq!(fx.current_speed_up(), 0.0);
    }

    #[test]
    fn speed_up_advances_scene_time_faster() {
        let mut calm = HyperspeedFx::default();
        let mut rushed = HyperspeedFx::default();
        rushed.speed_up();
        for _ in 0..60 {
            calm.advance(1.0 / 60.0);
            rushed.advance(1.0 / 60.0);
        }
        assert!(rushed.scene_time() > calm.scene_time());
    }

    #[test]
    fn deterministic_render() {
        let theme = ThemeInputs::default();
        let ctx = FxContext {
            width: 48,
            height: 32,
            frame: 3,
            time_seconds: 0.25,
            quality: FxQuality::Full,
            theme: &theme,
        };
        let mut a = HyperspeedFx::default();
        let mut b = HyperspeedFx::default();
        let mut out_a = vec![PackedRgba::TRANSPARENT; ctx.len()];
        let mut out_b = vec![PackedRgba::TRANSPARENT; ctx.len()];
        for _ in 0..5 {
            a.advance(0.016);
            b.advance(0.016);
        }
        a.render(ctx, &mut out_a);
        b.render(ctx, &mut out_b);
        assert_eq!(hash_pixels(&out_a), hash_pixels(&out_b));
        assert!(out_a.iter().any(|p| *p != PackedRgba::BLACK), "scene drew nothing");
    }

    #[test]
    fn every_distortion_renders_without_panic() {
        let theme = ThemeInputs::default();
        for distortion in Distortion::ALL {
            for (w, h) in [(0, 0), (1, 1), (3, 40), (40, 3)] {
                let ctx = FxContext {
                    width: w,
                    height: h,
                    frame: 0,
                    time_seconds: 0.0,
                    quality: FxQuality::Reduced,
                    theme: &theme,
                };
                let mut fx = HyperspeedFx::new(HyperspeedParams {
                    distortion,
                    ..HyperspeedParams::contact_hero()
                });
                fx.advance(0.5);
                let mut out = vec![PackedRgba::TRANSPARENT; ctx.len()];
                fx.render(ctx, &mut out);
            }
        }
    }
}
