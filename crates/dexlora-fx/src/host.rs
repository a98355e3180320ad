#![forbid(unsafe_code)]

//! Effect host: binds one visibility gate to at most one live instance.
//!
//! # State machine
//!
//! ```text
//!            gate → visible
//!   Absent ──────────────────► Active(instance)
//!     ▲                              │
//!     └──────────────────────────────┘
//!        gate → hidden, or teardown
//! ```
//!
//! Every transition is handled as it arrives; rapid visibility flicker simply
//! produces a construct/dispose pair per edge. The outgoing instance is fully
//! disposed before a replacement can be constructed, so a host never holds
//! two live instances.

use dexlora_core::event::InputEvent;
use dexlora_core::visibility::{
    ElementId, IntersectionEntry, IntersectionSource, ObservationId, Threshold, VisibilityGate,
};

use crate::config::EffectConfig;
use crate::env::{EffectEnvironment, FrameRequestId, ListenerId};
use crate::instance::{EffectInstance, InstanceSettings};

/// Lifecycle state of a host.
#[derive(Debug, Default)]
pub enum HostState {
    /// No instance and no held resources.
    #[default]
    Absent,
    /// One live instance.
    Active(EffectInstance),
}

/// Construction/disposal counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostStats {
    pub constructed: u64,
    pub disposed: u64,
}

impl HostStats {
    /// Instances currently alive (0 or 1).
    pub const fn live(&self) -> u64 {
        self.constructed - self.disposed
    }
}

/// Owns the visibility flag and the instance of one decorative region.
#[derive(Debug)]
pub struct EffectHost {
    gate: VisibilityGate,
    config: EffectConfig,
    size: (u32, u32),
    settings: InstanceSettings,
    state: HostState,
    stats: HostStats,
}

impl EffectHost {
    /// Host for `target`, sized `width x height`, activating on any overlap.
    pub fn new(target: ElementId, config: EffectConfig, width: u32, height: u32) -> Self {
        Self {
            gate: VisibilityGate::new(target, Threshold::ANY),
            config,
            size: (width, height),
            settings: InstanceSettings::default(),
            state: HostState::Absent,
            stats: HostStats::default(),
        }
    }

    /// Require at least `threshold` of the target to be on screen.
    #[must_use]
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.gate = VisibilityGate::new(self.gate.target(), threshold);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: InstanceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub const fn target(&self) -> ElementId {
        self.gate.target()
    }

    pub const fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub const fn gate(&self) -> &VisibilityGate {
        &self.gate
    }

    pub const fn state(&self) -> &HostState {
        &self.state
    }

    pub const fn stats(&self) -> HostStats {
        self.stats
    }

    pub const fn size(&self) -> (u32, u32) {
        self.size
    }

    pub const fn is_active(&self) -> bool {
        matches!(self.state, HostState::Active(_))
    }

    pub fn instance(&self) -> Option<&EffectInstance> {
        match &self.state {
            HostState::Active(instance) => Some(instance),
            HostState::Absent => None,
        }
    }

    /// Start observing the target. Safe to call again after [`teardown`](Self::teardown).
    pub fn mount<S: IntersectionSource + ?Sized>(&mut self, source: &mut S) -> ObservationId {
        self.gate.mount(source)
    }

    /// Feed one intersection entry. Returns `true` if the host changed state.
    pub fn apply_entry<E: EffectEnvironment + ?Sized>(
        &mut self,
        entry: &IntersectionEntry,
        env: &mut E,
    ) -> bool {
        match self.gate.apply(entry) {
            Some(true) => self.enter_active(env),
            Some(false) => self.exit_active(env),
            None => false,
        }
    }

    /// Absent → Active. No-op (returns `false`) if already active.
    pub fn enter_active<E: EffectEnvironment + ?Sized>(&mut self, env: &mut E) -> bool {
        if self.is_active() {
            return false;
        }
        let _span = tracing::debug_span!(
            "dexlora.fx.host.enter_active",
            element = self.gate.target().0,
            effect = self.config.kind().as_str()
        )
        .entered();
        let (width, height) = self.size;
        let instance =
            EffectInstance::construct(&self.config, width, height, true, self.settings, env);
        self.state = HostState::Active(instance);
        self.stats.constructed += 1;
        true
    }

    /// Active → Absent. No-op (returns `false`) if already absent.
    pub fn exit_active<E: EffectEnvironment + ?Sized>(&mut self, env: &mut E) -> bool {
        let HostState::Active(mut instance) = std::mem::take(&mut self.state) else {
            return false;
        };
        let _span = tracing::debug_span!(
            "dexlora.fx.host.exit_active",
            element = self.gate.target().0,
            effect = self.config.kind().as_str()
        )
        .entered();
        instance.dispose(env);
        self.stats.disposed += 1;
        true
    }

    /// Stop observing and release the instance, if any. Idempotent.
    pub fn teardown<S, E>(&mut self, source: &mut S, env: &mut E)
    where
        S: IntersectionSource + ?Sized,
        E: EffectEnvironment + ?Sized,
    {
        self.gate.teardown(source);
        self.exit_active(env);
    }

    /// Replace the configuration. A live instance is disposed and rebuilt.
    pub fn reconfigure<E: EffectEnvironment + ?Sized>(
        &mut self,
        config: EffectConfig,
        env: &mut E,
    ) {
        self.config = config;
        if self.exit_active(env) {
            self.enter_active(env);
        }
    }

    /// Deliver a frame callback. Returns `true` if the live instance rendered.
    pub fn on_frame<E: EffectEnvironment + ?Sized>(
        &mut self,
        env: &mut E,
        request: FrameRequestId,
        dt: f64,
    ) -> bool {
        match &mut self.state {
            HostState::Active(instance) => instance.on_frame(env, request, dt),
            HostState::Absent => false,
        }
    }

    /// Deliver an event raised by `listener`. Events for listeners the live
    /// instance does not own are dropped. Resize events also update the size
    /// used for future instances.
    pub fn handle_input<E: EffectEnvironment + ?Sized>(
        &mut self,
        env: &mut E,
        listener: ListenerId,
        event: &InputEvent,
    ) -> bool {
        let HostState::Active(instance) = &mut self.state else {
            return false;
        };
        if !instance.owns_listener(listener) {
            return false;
        }
        if let InputEvent::Resize { width, height } = *event {
            self.size = (width, height);
        }
        instance.handle_input(env, event);
        true
    }

    /// Update the region size directly (e.g. from layout), resizing a live instance.
    pub fn resize<E: EffectEnvironment + ?Sized>(&mut self, env: &mut E, width: u32, height: u32) {
        self.size = (width, height);
        if let HostState::Active(instance) = &mut self.state {
            instance.handle_input(env, &InputEvent::Resize { width, height });
        }
    }
}
