#![forbid(unsafe_code)]

//! DOM event naming and coordinate conversion.
//!
//! Kept free of `web-sys` so it builds and tests on every target.

use dexlora_core::event::{ListenerKind, PointerButton};
use dexlora_core::visibility::ElementId;

/// CSS selector for the mount element rendered with `data-element-id`.
pub fn element_selector(id: ElementId) -> String {
    format!("[data-element-id=\"{}\"]", id.0)
}

/// DOM event type registered for `kind`.
pub const fn event_name(kind: ListenerKind) -> &'static str {
    match kind {
        ListenerKind::PointerDown => "pointerdown",
        ListenerKind::PointerUp => "pointerup",
        ListenerKind::PointerOut => "pointerleave",
        ListenerKind::PointerMove => "pointermove",
        ListenerKind::TouchStart => "touchstart",
        ListenerKind::TouchEnd => "touchend",
        ListenerKind::Resize => "resize",
    }
}

/// Resize is observed on the window; everything else on the mount element.
pub const fn listens_on_window(kind: ListenerKind) -> bool {
    matches!(kind, ListenerKind::Resize)
}

/// Touch listeners are registered passive so scrolling never waits on them.
pub const fn is_passive(kind: ListenerKind) -> bool {
    matches!(kind, ListenerKind::TouchStart | ListenerKind::TouchEnd)
}

/// Map `MouseEvent.button`.
pub const fn pointer_button(button: i16) -> Option<PointerButton> {
    match button {
        0 => Some(PointerButton::Primary),
        1 => Some(PointerButton::Middle),
        2 => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Client coordinates relative to an element's bounding box origin.
pub fn relative_to(client_x: f64, client_y: f64, left: f64, top: f64) -> (f32, f32) {
    ((client_x - left) as f32, (client_y - top) as f32)
}

/// CSS layout size to whole surface pixels. Non-finite and negative sizes
/// become zero.
pub fn surface_dimension(css: f64) -> u32 {
    if !css.is_finite() || css <= 0.0 {
        return 0;
    }
    css.round().min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_kind_has_a_distinct_event() {
        let mut names: Vec<_> = ListenerKind::ALL.into_iter().map(event_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ListenerKind::ALL.len());
    }

    #[test]
    fn only_resize_is_window_level() {
        for kind in ListenerKind::ALL {
            assert_eq!(listens_on_window(kind), kind == ListenerKind::Resize);
        }
        assert!(is_passive(ListenerKind::TouchStart));
        assert!(!is_passive(ListenerKind::PointerDown));
    }

    #[test]
    fn buttons() {
        assert_eq!(pointer_button(0), Some(PointerButton::Primary));
        assert_eq!(pointer_button(2), Some(PointerButton::Secondary));
        assert_eq!(pointer_button(4), None);
    }

    #[test]
    fn selector_matches_rendered_attribute() {
        assert_eq!(element_selector(ElementId(4)), "[data-element-id=\"4\"]");
    }

    #[test]
    fn dimensions() {
        assert_eq!(surface_dimension(1279.6), 1280);
        assert_eq!(surface_dimension(-3.0), 0);
        assert_eq!(surface_dimension(f64::NAN), 0);
        assert_eq!(relative_to(110.0, 50.0, 10.0, 20.0), (100.0, 30.0));
    }
}
