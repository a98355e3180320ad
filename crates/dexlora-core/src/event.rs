#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! Events are pushed by the embedding host (DOM listeners on the web, a test
//! harness natively). Effects declare which kinds they care about through
//! [`ListenerKinds`]; the host only registers listeners for those kinds.
//!
//! # Design Notes
//!
//! - Pointer coordinates are relative to the effect's surface, in CSS pixels.
//! - Touch start/end are folded into their own kinds because the browser
//!   registers them separately (and passively).

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A pointer (mouse or touch) event.
    Pointer(PointerEvent),

    /// The window (or the element's container) was resized.
    Resize {
        /// New width in CSS pixels.
        width: u32,
        /// New height in CSS pixels.
        height: u32,
    },
}

impl InputEvent {
    /// The listener kind a host must have registered to deliver this event.
    #[must_use]
    pub const fn listener_kind(&self) -> ListenerKind {
        match self {
            Self::Pointer(pointer) => pointer.kind,
            Self::Resize { .. } => ListenerKind::Resize,
        }
    }
}

/// A pointer event relative to the effect surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Which listener produced this event.
    pub kind: ListenerKind,
    /// X position in CSS pixels from the surface's left edge.
    pub x: f32,
    /// Y position in CSS pixels from the surface's top edge.
    pub y: f32,
    /// Button involved, if any.
    pub button: Option<PointerButton>,
}

impl PointerEvent {
    /// Create a pointer event with no button.
    #[must_use]
    pub const fn new(kind: ListenerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            button: None,
        }
    }

    /// Attach a button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    /// `true` for events that start a press (mouse down or touch start).
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, ListenerKind::PointerDown | ListenerKind::TouchStart)
    }

    /// `true` for events that end a press (up, out, or touch end).
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(
            self.kind,
            ListenerKind::PointerUp | ListenerKind::PointerOut | ListenerKind::TouchEnd
        )
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary (left) button or a touch contact.
    Primary,
    /// Secondary (right) button.
    Secondary,
    /// Middle button.
    Middle,
}

/// A single listener registration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDown,
    PointerUp,
    PointerOut,
    PointerMove,
    TouchStart,
    TouchEnd,
    /// Window-level resize.
    Resize,
}

impl ListenerKind {
    /// All kinds, in registration order.
    pub const ALL: [Self; 7] = [
        Self::PointerDown,
        Self::PointerUp,
        Self::PointerOut,
        Self::PointerMove,
        Self::TouchStart,
        Self::TouchEnd,
        Self::Resize,
    ];

    /// The matching single-bit flag.
    #[must_use]
    pub const fn flag(self) -> ListenerKinds {
        match self {
            Self::PointerDown => ListenerKinds::POINTER_DOWN,
            Self::PointerUp => ListenerKinds::POINTER_UP,
            Self::PointerOut => ListenerKinds::POINTER_OUT,
            Self::PointerMove => ListenerKinds::POINTER_MOVE,
            Self::TouchStart => ListenerKinds::TOUCH_START,
            Self::TouchEnd => ListenerKinds::TOUCH_END,
            Self::Resize => ListenerKinds::RESIZE,
        }
    }

    /// DOM event type name used when registering the listener.
    #[must_use]
    pub const fn dom_event_name(self) -> &'static str {
        match self {
            Self::PointerDown => "mousedown",
            Self::PointerUp => "mouseup",
            Self::PointerOut => "mouseout",
            Self::PointerMove => "mousemove",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::Resize => "resize",
        }
    }

    /// Whether the listener is attached to the window rather than the element.
    #[must_use]
    pub const fn is_window_level(self) -> bool {
        matches!(self, Self::Resize)
    }

    /// Whether the listener may be registered as passive.
    #[must_use]
    pub const fn is_passive(self) -> bool {
        matches!(self, Self::TouchStart | Self::TouchEnd)
    }
}

bitflags! {
    /// Set of listener kinds an effect wants registered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListenerKinds: u8 {
        const POINTER_DOWN = 0b0000_0001;
        const POINTER_UP   = 0b0000_0010;
        const POINTER_OUT  = 0b0000_0100;
        const POINTER_MOVE = 0b0000_1000;
        const TOUCH_START  = 0b0001_0000;
        const TOUCH_END    = 0b0010_0000;
        const RESIZE       = 0b0100_0000;

        /// Press/release style interaction (mouse + touch).
        const PRESS = Self::POINTER_DOWN.bits()
            | Self::POINTER_UP.bits()
            | Self::POINTER_OUT.bits()
            | Self::TOUCH_START.bits()
            | Self::TOUCH_END.bits();
    }
}

impl ListenerKinds {
    /// Iterate the individual kinds contained in this set.
    pub fn kinds(self) -> impl Iterator<Item = ListenerKind> {
        ListenerKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(kind.flag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_set_expands_to_five_kinds() {
        let kinds: Vec<_> = ListenerKinds::PRESS.kinds().collect();
        assert_eq!(kinds.len(), 5);
        assert!(!kinds.contains(&ListenerKind::Resize));
        assert!(!kinds.contains(&ListenerKind::PointerMove));
    }

    #[test]
    fn flags_round_trip_through_kinds() {
        for kind in ListenerKind::ALL {
            let only: Vec<_> = kind.flag().kinds().collect();
            assert_eq!(only, vec![kind]);
        }
    }

    #[test]
    fn pointer_event_press_release_classification() {
        let down = PointerEvent::new(ListenerKind::PointerDown, 1.0, 2.0);
        let touch_end = PointerEvent::new(ListenerKind::TouchEnd, 0.0, 0.0);
        let moved = PointerEvent::new(ListenerKind::PointerMove, 0.0, 0.0);
        assert!(down.is_press() && !down.is_release());
        assert!(touch_end.is_release());
        assert!(!moved.is_press() && !moved.is_release());
    }

    #[test]
    fn resize_event_maps_to_resize_listener() {
        let ev = InputEvent::Resize {
            width: 10,
            height: 20,
        };
        assert_eq!(ev.listener_kind(), ListenerKind::Resize);
        assert!(ListenerKind::Resize.is_window_level());
    }
}
