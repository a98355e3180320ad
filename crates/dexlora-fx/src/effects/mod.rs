#![forbid(unsafe_code)]

//! Background effect implementations.

pub mod color_bends;
pub mod hyperspeed;
pub mod light_pillar;
pub mod particles;

pub use color_bends::{ColorBendsFx, ColorBendsParams};
pub use hyperspeed::{Distortion, HyperspeedColors, HyperspeedFx, HyperspeedParams};
pub use light_pillar::{LightPillarFx, LightPillarParams};
pub use particles::{ParticlesFx, ParticlesParams};
