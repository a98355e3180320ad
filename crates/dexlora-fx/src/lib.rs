#![forbid(unsafe_code)]

//! Visibility-gated animated backgrounds for the DexLora site.
//!
//! # Layers
//!
//! - [`visual_fx`]: the [`BackdropFx`] drawing contract, quality tiers and
//!   theme inputs.
//! - [`effects`]: the four variants (particles, hyperspeed, light pillar,
//!   color bends).
//! - [`config`]: [`EffectConfig`], the immutable parameter set for one variant.
//! - [`env`]: [`EffectEnvironment`], the host services an instance consumes.
//! - [`instance`]: [`EffectInstance`], one live effect and its resources.
//! - [`host`]: [`EffectHost`], the Absent/Active state machine driven by a
//!   visibility gate.
//!
//! # Example
//!
//! ```
//! use dexlora_core::geometry::Rect;
//! use dexlora_core::visibility::{ElementId, SoftwareViewport};
//! use dexlora_fx::{EffectConfig, EffectHost, HeadlessEnvironment};
//!
//! let mut viewport = SoftwareViewport::new(Rect::from_size(1280, 720));
//! viewport.set_element_rect(ElementId(1), Rect::new(0, 2000, 1280, 400));
//! let mut env = HeadlessEnvironment::new();
//! let mut host = EffectHost::new(ElementId(1), EffectConfig::founders(), 64, 20);
//! host.mount(&mut viewport);
//!
//! viewport.scroll_to(0, 1800);
//! let entries: Vec<_> = viewport.drain_entries().collect();
//! for entry in &entries {
//!     host.apply_entry(entry, &mut env);
//! }
//! assert!(host.is_active());
//!
//! host.teardown(&mut viewport, &mut env);
//! assert!(env.is_idle());
//! ```

pub mod clock;
pub mod config;
pub mod effects;
pub mod env;
pub mod host;
pub mod instance;
pub mod rng;
pub mod visual_fx;

pub use clock::FrameClock;
pub use config::{EffectConfig, EffectKind};
pub use env::{
    EffectEnvironment, EnvCall, FrameRequestId, HeadlessEnvironment, ListenerId, SurfaceId,
};
pub use host::{EffectHost, HostState, HostStats};
pub use instance::{EffectInstance, InstanceSettings};
pub use visual_fx::{BackdropFx, FxContext, FxQuality, ThemeInputs};
