#![forbid(unsafe_code)]

//! Host services consumed by effect instances.
//!
//! An [`EffectEnvironment`] owns everything that lives outside the effect:
//! drawing surfaces, registered input listeners and pending frame requests.
//! The browser glue implements it on top of canvases, DOM listeners and
//! `requestAnimationFrame`; [`HeadlessEnvironment`] implements it in memory
//! for native hosts and tests.
//!
//! The environment never calls back into an instance. Frame callbacks and
//! listener events are delivered by the embedding driver, which routes them
//! through [`EffectHost`](crate::host::EffectHost) by id.

use std::collections::{BTreeMap, BTreeSet};

use dexlora_core::event::ListenerKind;
use dexlora_render::PixelSurface;

/// Handle to a drawing surface allocated by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// Handle to a registered input listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Handle to a pending next-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequestId(pub u64);

/// Rendering, input and scheduling services provided by the page host.
///
/// All operations are best effort. Releasing an id that is unknown (already
/// released, or never issued) must be a silent no-op.
pub trait EffectEnvironment {
    /// Allocate a surface of `width x height` CSS pixels.
    fn create_surface(&mut self, width: u32, height: u32) -> SurfaceId;

    /// Resize a live surface.
    fn resize_surface(&mut self, surface: SurfaceId, width: u32, height: u32);

    /// Show the contents of `pixels` on `surface`.
    fn present(&mut self, surface: SurfaceId, pixels: &PixelSurface);

    /// Release a surface.
    fn destroy_surface(&mut self, surface: SurfaceId);

    /// Start delivering events of `kind`.
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    /// Stop delivering events for `listener`.
    fn remove_listener(&mut self, listener: ListenerId);

    /// Ask for one frame callback before the next repaint.
    fn request_frame(&mut self) -> FrameRequestId;

    /// Withdraw a pending frame request.
    fn cancel_frame(&mut self, request: FrameRequestId);
}

impl<E: EffectEnvironment + ?Sized> EffectEnvironment for &mut E {
    fn create_surface(&mut self, width: u32, height: u32) -> SurfaceId {
        (**self).create_surface(width, height)
    }

    fn resize_surface(&mut self, surface: SurfaceId, width: u32, height: u32) {
        (**self).resize_surface(surface, width, height);
    }

    fn present(&mut self, surface: SurfaceId, pixels: &PixelSurface) {
        (**self).present(surface, pixels);
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        (**self).destroy_surface(surface);
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        (**self).add_listener(kind)
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        (**self).remove_listener(listener);
    }

    fn request_frame(&mut self) -> FrameRequestId {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, request: FrameRequestId) {
        (**self).cancel_frame(request);
    }
}

/// One recorded environment call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvCall {
    CreateSurface { surface: SurfaceId, width: u32, height: u32 },
    ResizeSurface { surface: SurfaceId, width: u32, height: u32 },
    Present { surface: SurfaceId, hash: u64 },
    DestroySurface(SurfaceId),
    AddListener(ListenerId, ListenerKind),
    RemoveListener(ListenerId),
    RequestFrame(FrameRequestId),
    CancelFrame(FrameRequestId),
}

const FNV64_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV64_PRIME: u64 = 0x100000001b3;

fn fnv1a64_pixels(pixels: &PixelSurface) -> u64 {
    let mut hash = FNV64_OFFSET_BASIS;
    for px in pixels.pixels() {
        for byte in px.0.to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV64_PRIME);
        }
    }
    hash
}

/// In-memory environment with full bookkeeping.
///
/// Frame requests accumulate until [`take_due_frames`](Self::take_due_frames)
/// hands them to the driver, mirroring one `requestAnimationFrame` tick.
#[derive(Debug, Default)]
pub struct HeadlessEnvironment {
    next_id: u64,
    surfaces: BTreeMap<SurfaceId, (u32, u32)>,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    frames: BTreeSet<FrameRequestId>,
    presented: u64,
    last_present: Option<(SurfaceId, u64)>,
    calls: Vec<EnvCall>,
    record: bool,
}

impl HeadlessEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as [`new`](Self::new), but every call is appended to [`calls`](Self::calls).
    #[must_use]
    pub fn recording() -> Self {
        Self {
            record: true,
            ..Self::default()
        }
    }

    fn issue(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn log(&mut self, call: EnvCall) {
        if self.record {
            self.calls.push(call);
        }
    }

    /// Drain the pending frame requests, in request order.
    pub fn take_due_frames(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.frames).into_iter().collect()
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    pub fn surface_size(&self, surface: SurfaceId) -> Option<(u32, u32)> {
        self.surfaces.get(&surface).copied()
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Registered listener kinds, in registration order.
    pub fn listener_kinds(&self) -> Vec<ListenerKind> {
        self.listeners.values().copied().collect()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_frame_pending(&self, request: FrameRequestId) -> bool {
        self.frames.contains(&request)
    }

    /// Total number of presents since creation.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Surface and FNV-1a pixel hash of the most recent present.
    pub fn last_present(&self) -> Option<(SurfaceId, u64)> {
        self.last_present
    }

    /// True when nothing is allocated, registered or pending.
    pub fn is_idle(&self) -> bool {
        self.surfaces.is_empty() && self.listeners.is_empty() && self.frames.is_empty()
    }

    pub fn calls(&self) -> &[EnvCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl EffectEnvironment for HeadlessEnvironment {
    fn create_surface(&mut self, width: u32, height: u32) -> SurfaceId {
        let surface = SurfaceId(self.issue());
        self.surfaces.insert(surface, (width, height));
        self.log(EnvCall::CreateSurface {
            surface,
            width,
            height,
        });
        surface
    }

    fn resize_surface(&mut self, surface: SurfaceId, width: u32, height: u32) {
        if let Some(size) = self.surfaces.get_mut(&surface) {
            *size = (width, height);
            self.log(EnvCall::ResizeSurface {
                surface,
                width,
                height,
            });
        }
    }

    fn present(&mut self, surface: SurfaceId, pixels: &PixelSurface) {
        if !self.surfaces.contains_key(&surface) {
            return;
        }
        let hash = fnv1a64_pixels(pixels);
        self.presented += 1;
        self.last_present = Some((surface, hash));
        self.log(EnvCall::Present { surface, hash });
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        if self.surfaces.remove(&surface).is_some() {
            self.log(EnvCall::DestroySurface(surface));
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let listener = ListenerId(self.issue());
        self.listeners.insert(listener, kind);
        self.log(EnvCall::AddListener(listener, kind));
        listener
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        if self.listeners.remove(&listener).is_some() {
            self.log(EnvCall::RemoveListener(listener));
        }
    }

    fn request_frame(&mut self) -> FrameRequestId {
        let request = FrameRequestId(self.issue());
        self.frames.insert(request);
        self.log(EnvCall::RequestFrame(request));
        request
    }

    fn cancel_frame(&mut self, request: FrameRequestId) {
        if self.frames.remove(&request) {
            self.log(EnvCall::CancelFrame(request));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_unique_across_resources() {
        let mut env = HeadlessEnvironment::new();
        let s = env.create_surface(4, 4);
        let l = env.add_listener(ListenerKind::Resize);
        let f = env.request_frame();
        assert_ne!(s.0, l.0);
        assert_ne!(l.0, f.0);
    }

    #[test]
    fn unknown_releases_are_no_ops() {
        let mut env = HeadlessEnvironment::recording();
        env.destroy_surface(SurfaceId(99));
        env.remove_listener(ListenerId(99));
        env.cancel_frame(FrameRequestId(99));
        assert!(env.calls().is_empty());
        assert!(env.is_idle());
    }

    #[test]
    fn due_frames_drain_once() {
        let mut env = HeadlessEnvironment::new();
        let a = env.request_frame();
        let b = env.request_frame();
        assert_eq!(env.take_due_frames(), vec![a, b]);
        assert!(env.take_due_frames().is_empty());
    }

    #[test]
    fn present_on_dead_surface_is_ignored() {
        let mut env = HeadlessEnvironment::new();
        let surface = env.create_surface(2, 2);
        let pixels = PixelSurface::new(2, 2);
        env.present(surface, &pixels);
        env.destroy_surface(surface);
        env.present(surface, &pixels);
        assert_eq!(env.presented(), 1);
    }

    #[test]
    fn recording_logs_in_order() {
        let mut env = HeadlessEnvironment::recording();
        let surface = env.create_surface(3, 2);
        env.resize_surface(surface, 5, 5);
        env.destroy_surface(surface);
        assert_eq!(
            env.calls(),
            &[
                EnvCall::CreateSurface {
                    surface,
                    width: 3,
                    height: 2
                },
                EnvCall::ResizeSurface {
                    surface,
                    width: 5,
                    height: 5
                },
                EnvCall::DestroySurface(surface),
            ]
        );
    }
}
