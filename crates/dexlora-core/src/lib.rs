#![forbid(unsafe_code)]

//! Core primitives shared by every DexLora crate.
//!
//! - [`geometry`]: viewport rectangles in CSS pixels.
//! - [`event`]: host-delivered input events and listener kinds.
//! - [`visibility`]: the viewport-intersection gate that decides whether a
//!   decorative effect may hold rendering resources.
//! - [`logging`]: tracing re-exports and subscriber bootstrap.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod visibility;

pub use event::{InputEvent, ListenerKind, ListenerKinds, PointerButton, PointerEvent};
pub use geometry::Rect;
pub use visibility::{
    ElementId, IntersectionEntry, IntersectionSource, ObservationId, SoftwareViewport, Threshold,
    VisibilityGate,
};
