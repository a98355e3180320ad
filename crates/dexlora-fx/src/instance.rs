#![forbid(unsafe_code)]

//! A live background effect and the host resources it holds.
//!
//! # Lifecycle
//!
//! ```text
//! construct ──► [visible: frame pending] ◄──► [hidden: no frame] ──► dispose
//! ```
//!
//! - Construction allocates the surface and pixel buffer, registers the
//!   listeners the effect asks for, and requests a first frame if visible.
//! - Each delivered frame advances, renders and presents, then re-requests a
//!   frame only while visible and not disposed.
//! - [`EffectInstance::dispose`] cancels the pending frame, detaches every
//!   listener and releases the surface. It is idempotent.
//!
//! Methods that touch host resources take the [`EffectEnvironment`]
//! explicitly; the instance never stores it.

use dexlora_core::event::{InputEvent, ListenerKind};
use dexlora_render::{PackedRgba, PixelSurface};

use crate::config::{EffectConfig, EffectKind};
use crate::env::{EffectEnvironment, FrameRequestId, ListenerId, SurfaceId};
use crate::visual_fx::{BackdropFx, FxContext, FxQuality, ThemeInputs};

/// Rendering settings shared by every instance a host constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstanceSettings {
    /// Requested quality; clamped by surface area each frame.
    pub quality: FxQuality,
    pub theme: ThemeInputs,
}

/// A constructed background effect.
pub struct EffectInstance {
    kind: EffectKind,
    fx: Box<dyn BackdropFx>,
    surface_id: SurfaceId,
    surface: PixelSurface,
    listeners: Vec<(ListenerId, ListenerKind)>,
    pending_frame: Option<FrameRequestId>,
    visible: bool,
    disposed: bool,
    frame: u64,
    time_seconds: f64,
    settings: InstanceSettings,
}

impl core::fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectInstance")
            .field("kind", &self.kind)
            .field("surface_id", &self.surface_id)
            .field("size", &(self.surface.width(), self.surface.height()))
            .field("listeners", &self.listeners.len())
            .field("pending_frame", &self.pending_frame)
            .field("visible", &self.visible)
            .field("disposed", &self.disposed)
            .field("frame", &self.frame)
            .finish()
    }
}

impl EffectInstance {
    /// Build the effect described by `config` and acquire its resources.
    pub fn construct<E: EffectEnvironment + ?Sized>(
        config: &EffectConfig,
        width: u32,
        height: u32,
        visible: bool,
        settings: InstanceSettings,
        env: &mut E,
    ) -> Self {
        let mut fx = config.build();
        fx.resize(width, height);
        let surface_id = env.create_surface(width, height);
        let listeners = fx
            .listeners()
            .kinds()
            .map(|kind| (env.add_listener(kind), kind))
            .collect::<Vec<_>>();
        let pending_frame = visible.then(|| env.request_frame());

        tracing::debug!(
            effect = config.kind().as_str(),
            width,
            height,
            listeners = listeners.len(),
            visible,
            "effect instance constructed"
        );

        Self {
            kind: config.kind(),
            fx,
            surface_id,
            surface: PixelSurface::new(width, height),
            listeners,
            pending_frame,
            visible,
            disposed: false,
            frame: 0,
            time_seconds: 0.0,
            settings,
        }
    }

    pub const fn kind(&self) -> EffectKind {
        self.kind
    }

    pub const fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub const fn pending_frame(&self) -> Option<FrameRequestId> {
        self.pending_frame
    }

    /// Frames rendered so far.
    pub const fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Accumulated animation time in seconds.
    pub const fn time_seconds(&self) -> f64 {
        self.time_seconds
    }

    /// Registered listeners and their kinds.
    pub fn listeners(&self) -> &[(ListenerId, ListenerKind)] {
        &self.listeners
    }

    pub fn owns_listener(&self, listener: ListenerId) -> bool {
        self.listeners.iter().any(|(id, _)| *id == listener)
    }

    /// Quality actually used for the current surface size.
    pub fn effective_quality(&self) -> FxQuality {
        let area = self.surface.width() as usize * self.surface.height() as usize;
        FxQuality::clamp_for_area(self.settings.quality, area)
    }

    /// Run one frame for `request`.
    ///
    /// Returns `false` (and does nothing) if `request` is not this instance's
    /// pending frame, which covers stale callbacks after a cancel or dispose.
    pub fn on_frame<E: EffectEnvironment + ?Sized>(
        &mut self,
        env: &mut E,
        request: FrameRequestId,
        dt: f64,
    ) -> bool {
        if self.disposed || self.pending_frame != Some(request) {
            return false;
        }
        self.pending_frame = None;

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.fx.advance(dt);
        self.time_seconds += dt;
        self.frame += 1;

        let quality = self.effective_quality();
        if quality.is_enabled() {
            let ctx = FxContext {
                width: self.surface.width(),
                height: self.surface.height(),
                frame: self.frame,
                time_seconds: self.time_seconds,
                quality,
                theme: &self.settings.theme,
            };
            self.fx.render(ctx, self.surface.pixels_mut());
        } else {
            self.surface.fill(PackedRgba::TRANSPARENT);
        }
        env.present(self.surface_id, &self.surface);

        if self.visible {
            self.pending_frame = Some(env.request_frame());
        }
        true
    }

    /// Pause or resume frame requests without releasing resources.
    pub fn set_visible<E: EffectEnvironment + ?Sized>(&mut self, env: &mut E, visible: bool) {
        if self.disposed || self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            if self.pending_frame.is_none() {
                self.pending_frame = Some(env.request_frame());
            }
        } else if let Some(request) = self.pending_frame.take() {
            env.cancel_frame(request);
        }
        tracing::trace!(effect = self.kind.as_str(), visible, "effect visibility changed");
    }

    /// Deliver an input event. Resize events reallocate the surface.
    pub fn handle_input<E: EffectEnvironment + ?Sized>(&mut self, env: &mut E, event: &InputEvent) {
        if self.disposed {
            return;
        }
        if let InputEvent::Resize { width, height } = *event {
            self.resize(env, width, height);
        }
        self.fx.handle_input(event);
    }

    fn resize<E: EffectEnvironment + ?Sized>(&mut self, env: &mut E, width: u32, height: u32) {
        if self.surface.resize(width, height) {
            env.resize_surface(self.surface_id, width, height);
            self.fx.resize(width, height);
        }
    }

    /// Release every host resource. Returns `false` if already disposed.
    pub fn dispose<E: EffectEnvironment + ?Sized>(&mut self, env: &mut E) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        self.visible = false;
        if let Some(request) = self.pending_frame.take() {
            env.cancel_frame(request);
        }
        for (listener, _) in self.listeners.drain(..) {
            env.remove_listener(listener);
        }
        env.destroy_surface(self.surface_id);
        self.surface.release();
        tracing::debug!(
            effect = self.kind.as_str(),
            frames = self.frame,
            "effect instance disposed"
        );
        true
    }
}

impl Drop for EffectInstance {
    fn drop(&mut self) {
        if !self.disposed {
            tracing::warn!(
                effect = self.kind.as_str(),
                surface = self.surface_id.0,
                listeners = self.listeners.len(),
                "effect instance dropped without dispose; host resources leaked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::HeadlessEnvironment;
    use dexlora_core::event::PointerEvent;
    use pretty_assertions::assert_eq;

    fn hyperspeed(env: &mut HeadlessEnvironment, visible: bool) -> EffectInstance {
        EffectInstance::construct(
            &EffectConfig::contact_hero(),
            32,
            18,
            visible,
            InstanceSettings::default(),
            env,
        )
    }

    #[test]
    fn construct_acquires_resources() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = hyperspeed(&mut env, true);
        assert_eq!(env.live_surfaces(), 1);
        assert_eq!(env.surface_size(fx.surface_id()), Some((32, 18)));
        // press interaction plus resize
        assert_eq!(env.live_listeners(), 6);
        assert_eq!(env.pending_frames(), 1);
        assert!(fx.dispose(&mut env));
    }

    #[test]
    fn hidden_instance_requests_nothing() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = hyperspeed(&mut env, false);
        assert_eq!(env.pending_frames(), 0);
        assert_eq!(fx.pending_frame(), None);
        fx.dispose(&mut env);
    }

    #[test]
    fn frames_reschedule_while_visible() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = hyperspeed(&mut env, true);
        for _ in 0..3 {
            let due = env.take_due_frames();
            assert_eq!(due.len(), 1);
            assert!(fx.on_frame(&mut env, due[0], 1.0 / 60.0));
        }
        assert_eq!(fx.frame_count(), 3);
        assert_eq!(env.presented(), 3);
        assert_eq!(env.pending_frames(), 1);
        fx.dispose(&mut env);
    }

    #[test]
    fn stale_frame_is_ignored() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = hyperspeed(&mut env, true);
        let due = env.take_due_frames();
        fx.set_visible(&mut env, false);
        assert!(!fx.on_frame(&mut env, due[0], 0.016));
        assert_eq!(env.presented(), 0);
        fx.dispose(&mut env);
    }

    #[test]
    fn hide_cancels_and_show_resumes() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = hyperspeed(&mut env, true);
        fx.set_visible(&mut env, false);
        assert_eq!(env.pending_frames(), 0);
        fx.set_visible(&mut env, true);
        assert_eq!(env.pending_frames(), 1);
        fx.set_visible(&mut env, true);
        assert_eq!(env.pending_frames(), 1);
        fx.dispose(&mut env);
    }

    #[test]
    fn last_frame_while_hidden_does_not_reschedule() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = hyperspeed(&mut env, true);
        let due = env.take_due_frames();
        // hidden after the callback was already queued by the browser
        fx.visible = false;
        assert!(fx.on_frame(&mut env, due[0], 0.016));
        assert_eq!(env.pending_frames(), 0);
        fx.dispose(&mut env);
    }

    #[test]
    fn resize_reallocates_surface() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = hyperspeed(&mut env, true);
        fx.handle_input(&mut env, &InputEvent::Resize { width: 10, height: 5 });
        assert_eq!(fx.surface().pixels().len(), 50);
        assert_eq!(env.surface_size(fx.surface_id()), Some((10, 5)));
        fx.dispose(&mut env);
    }

    #[test]
    fn dispose_is_idempotent_and_complete() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = hyperspeed(&mut env, true);
        assert!(fx.dispose(&mut env));
        assert!(env.is_idle());
        assert!(fx.surface().is_empty());
        assert!(!fx.dispose(&mut env));
        assert!(fx.is_disposed());
    }

    #[test]
    fn disposed_instance_ignores_everything() {
        let mut env = HeadlessEnvironment::recording();
        let mut fx = hyperspeed(&mut env, true);
        fx.dispose(&mut env);
        env.clear_calls();
        fx.set_visible(&mut env, true);
        fx.handle_input(
            &mut env,
            &InputEvent::Pointer(PointerEvent::new(ListenerKind::PointerDown, 1.0, 1.0)),
        );
        assert!(!fx.on_frame(&mut env, FrameRequestId(1), 0.016));
        assert!(env.calls().is_empty());
    }

    #[test]
    fn oversized_surface_steps_quality_down() {
        let mut env = HeadlessEnvironment::new();
        let mut fx = EffectInstance::construct(
            &EffectConfig::projects_hero(),
            1920,
            1080,
            false,
            InstanceSettings::default(),
            &mut env,
        );
        assert_eq!(fx.effective_quality(), FxQuality::Minimal);
        fx.dispose(&mut env);
    }
}
