#![forbid(unsafe_code)]

//! Effect configuration.
//!
//! An [`EffectConfig`] is immutable once handed to a host. Changing it goes
//! through [`EffectHost::reconfigure`](crate::host::EffectHost::reconfigure),
//! which disposes the live instance and builds a fresh one.

use crate::effects::{
    ColorBendsFx, ColorBendsParams, HyperspeedFx, HyperspeedParams, LightPillarFx,
    LightPillarParams, ParticlesFx, ParticlesParams,
};
use crate::visual_fx::BackdropFx;

/// The four background variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Particles,
    Hyperspeed,
    LightPillar,
    ColorBends,
}

impl EffectKind {
    pub const ALL: [Self; 4] = [
        Self::Particles,
        Self::Hyperspeed,
        Self::LightPillar,
        Self::ColorBends,
    ];

    /// Stable identifier used in markup and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Particles => "particles",
            Self::Hyperspeed => "hyperspeed",
            Self::LightPillar => "light-pillar",
            Self::ColorBends => "color-bends",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl core::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one background effect.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectConfig {
    Particles(ParticlesParams),
    Hyperspeed(HyperspeedParams),
    LightPillar(LightPillarParams),
    ColorBends(ColorBendsParams),
}

impl EffectConfig {
    pub const fn kind(&self) -> EffectKind {
        match self {
            Self::Particles(_) => EffectKind::Particles,
            Self::Hyperspeed(_) => EffectKind::Hyperspeed,
            Self::LightPillar(_) => EffectKind::LightPillar,
            Self::ColorBends(_) => EffectKind::ColorBends,
        }
    }

    /// Default parameters for `kind`.
    pub fn default_for(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Particles => Self::Particles(ParticlesParams::default()),
            EffectKind::Hyperspeed => Self::Hyperspeed(HyperspeedParams::default()),
            EffectKind::LightPillar => Self::LightPillar(LightPillarParams::default()),
            EffectKind::ColorBends => Self::ColorBends(ColorBendsParams::default()),
        }
    }

    /// Particle field behind the founders section.
    pub fn founders() -> Self {
        Self::Particles(ParticlesParams::founders())
    }

    /// Hyperspeed road in the contact page hero.
    pub fn contact_hero() -> Self {
        Self::Hyperspeed(HyperspeedParams::contact_hero())
    }

    /// Full-page gradient behind the contact page.
    pub fn contact_backdrop() -> Self {
        Self::ColorBends(ColorBendsParams::contact_page())
    }

    /// Light pillar behind the projects hero.
    pub fn projects_hero() -> Self {
        Self::LightPillar(LightPillarParams::default())
    }

    /// Construct the effect this configuration describes.
    pub fn build(&self) -> Box<dyn BackdropFx> {
        match self {
            Self::Particles(p) => Box::new(ParticlesFx::new(p.clone())),
            Self::Hyperspeed(p) => Box::new(HyperspeedFx::new(p.clone())),
            Self::LightPillar(p) => Box::new(LightPillarFx::new(p.clone())),
            Self::ColorBends(p) => Box::new(ColorBendsFx::new(p.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EffectKind::from_name("galaxy"), None);
    }

    #[test]
    fn built_effect_matches_kind() {
        for kind in EffectKind::ALL {
            let config = EffectConfig::default_for(kind);
            assert_eq!(config.kind(), kind);
            assert_eq!(config.build().name(), kind.as_str());
        }
    }

    #[test]
    fn presets_pick_expected_variants() {
        assert_eq!(EffectConfig::founders().kind(), EffectKind::Particles);
        assert_eq!(EffectConfig::contact_hero().kind(), EffectKind::Hyperspeed);
        assert_eq!(EffectConfig::contact_backdrop().kind(), EffectKind::ColorBends);
        assert_eq!(EffectConfig::projects_hero().kind(), EffectKind::LightPillar);
    }
}
