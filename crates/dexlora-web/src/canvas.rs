#![forbid(unsafe_code)]

//! [`EffectEnvironment`] backed by `<canvas>` elements inside one mount.
//!
//! Surfaces are canvases appended to the mount element. DOM listeners push
//! `(ListenerId, InputEvent)` pairs into a shared inbox and wake the driver;
//! frame requests are queued until the driver's animation frame drains them.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;

use dexlora_core::event::{InputEvent, ListenerKind, PointerEvent};
use dexlora_fx::{EffectEnvironment, FrameRequestId, ListenerId, SurfaceId};
use dexlora_render::PixelSurface;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Element, Event, EventTarget,
    HtmlCanvasElement, ImageData, MouseEvent, TouchEvent,
};

use crate::dom_event;

/// Events waiting for the driver, in arrival order.
pub type Inbox = Rc<RefCell<VecDeque<(ListenerId, InputEvent)>>>;

/// Called whenever new work arrives outside an animation frame.
pub type Waker = Rc<dyn Fn()>;

struct Canvas {
    element: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

struct Registration {
    kind: ListenerKind,
    target: EventTarget,
    closure: Closure<dyn FnMut(Event)>,
}

pub struct CanvasEnvironment {
    mount: Element,
    next_id: u64,
    canvases: BTreeMap<SurfaceId, Canvas>,
    listeners: BTreeMap<ListenerId, Registration>,
    frames: BTreeSet<FrameRequestId>,
    inbox: Inbox,
    wake: Waker,
    scratch: Vec<u8>,
}

impl std::fmt::Debug for CanvasEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasEnvironment")
            .field("surfaces", &self.canvases.len())
            .field("listeners", &self.listeners.len())
            .field("frames", &self.frames.len())
            .finish()
    }
}

impl CanvasEnvironment {
    pub fn new(mount: Element, wake: Waker) -> Self {
        Self {
            mount,
            next_id: 0,
            canvases: BTreeMap::new(),
            listeners: BTreeMap::new(),
            frames: BTreeSet::new(),
            inbox: Rc::default(),
            wake,
            scratch: Vec::new(),
        }
    }

    pub fn mount(&self) -> &Element {
        &self.mount
    }

    fn issue(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Current layout size of the mount element.
    pub fn mount_size(&self) -> (u32, u32) {
        let rect = self.mount.get_bounding_client_rect();
        (
            dom_event::surface_dimension(rect.width()),
            dom_event::surface_dimension(rect.height()),
        )
    }

    /// Drain the pending frame requests, in request order.
    pub fn take_due_frames(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.frames).into_iter().collect()
    }

    pub fn has_pending_frames(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Drain events delivered since the last call.
    pub fn take_events(&mut self) -> Vec<(ListenerId, InputEvent)> {
        self.inbox.borrow_mut().drain(..).collect()
    }

    fn build_canvas(&self, width: u32, height: u32) -> Result<Canvas, JsValue> {
        let document = self
            .mount
            .owner_document()
            .ok_or_else(|| JsValue::from_str("mount element has no document"))?;
        let element: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        element.set_width(width);
        element.set_height(height);
        let style = element.style();
        style.set_property("position", "absolute")?;
        style.set_property("inset", "0")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("pointer-events", "none")?;
        let context: CanvasRenderingContext2d = element
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        self.mount.append_child(&element)?;
        Ok(Canvas { element, context })
    }

    fn listener_target(&self, kind: ListenerKind) -> Option<EventTarget> {
        if dom_event::listens_on_window(kind) {
            web_sys::window().map(Into::into)
        } else {
            Some(self.mount.clone().into())
        }
    }

    fn listener_closure(
        &self,
        listener: ListenerId,
        kind: ListenerKind,
    ) -> Closure<dyn FnMut(Event)> {
        let mount = self.mount.clone();
        let inbox = Rc::clone(&self.inbox);
        let wake = Rc::clone(&self.wake);
        Closure::wrap(Box::new(move |event: Event| {
            if let Some(input) = translate(kind, &event, &mount) {
                inbox.borrow_mut().push_back((listener, input));
                wake();
            }
        }) as Box<dyn FnMut(Event)>)
    }
}

/// Convert a DOM event into an [`InputEvent`] relative to `mount`.
fn translate(kind: ListenerKind, event: &Event, mount: &Element) -> Option<InputEvent> {
    let rect = mount.get_bounding_client_rect();
    if kind == ListenerKind::Resize {
        return Some(InputEvent::Resize {
            width: dom_event::surface_dimension(rect.width()),
            height: dom_event::surface_dimension(rect.height()),
        });
    }
    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        let touch = touch_event.changed_touches().get(0)?;
        let (x, y) = dom_event::relative_to(
            f64::from(touch.client_x()),
            f64::from(touch.client_y()),
            rect.left(),
            rect.top(),
        );
        let pointer = PointerEvent::new(kind, x, y)
            .with_button(dexlora_core::event::PointerButton::Primary);
        return Some(InputEvent::Pointer(pointer));
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let (x, y) = dom_event::relative_to(
        f64::from(mouse.client_x()),
        f64::from(mouse.client_y()),
        rect.left(),
        rect.top(),
    );
    let mut pointer = PointerEvent::new(kind, x, y);
    if matches!(kind, ListenerKind::PointerDown | ListenerKind::PointerUp) {
        if let Some(button) = dom_event::pointer_button(mouse.button()) {
            pointer = pointer.with_button(button);
        }
    }
    Some(InputEvent::Pointer(pointer))
}

impl EffectEnvironment for CanvasEnvironment {
    fn create_surface(&mut self, width: u32, height: u32) -> SurfaceId {
        let surface = SurfaceId(self.issue());
        match self.build_canvas(width, height) {
            Ok(canvas) => {
                self.canvases.insert(surface, canvas);
            }
            Err(error) => {
                tracing::warn!(surface = surface.0, ?error, "canvas creation failed");
            }
        }
        surface
    }

    fn resize_surface(&mut self, surface: SurfaceId, width: u32, height: u32) {
        if let Some(canvas) = self.canvases.get(&surface) {
            canvas.element.set_width(width);
            canvas.element.set_height(height);
        }
    }

    fn present(&mut self, surface: SurfaceId, pixels: &PixelSurface) {
        let Some(canvas) = self.canvases.get(&surface) else {
            return;
        };
        if pixels.width() == 0 || pixels.height() == 0 {
            return;
        }
        pixels.write_rgba8(&mut self.scratch);
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(self.scratch.as_slice()),
            pixels.width(),
            pixels.height(),
        );
        let drawn = image.and_then(|image| canvas.context.put_image_data(&image, 0.0, 0.0));
        if let Err(error) = drawn {
            tracing::debug!(surface = surface.0, ?error, "present failed");
        }
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        if let Some(canvas) = self.canvases.remove(&surface) {
            canvas.element.remove();
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let listener = ListenerId(self.issue());
        let Some(target) = self.listener_target(kind) else {
            return listener;
        };
        let closure = self.listener_closure(listener, kind);
        let options = AddEventListenerOptions::new();
        options.set_passive(dom_event::is_passive(kind));
        let added = target.add_event_listener_with_callback_and_add_event_listener_options(
            dom_event::event_name(kind),
            closure.as_ref().unchecked_ref(),
            &options,
        );
        match added {
            Ok(()) => {
                self.listeners.insert(
                    listener,
                    Registration {
                        kind,
                        target,
                        closure,
                    },
                );
            }
            Err(error) => {
                tracing::warn!(listener = listener.0, ?error, "listener registration failed");
            }
        }
        listener
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        let Some(registration) = self.listeners.remove(&listener) else {
            return;
        };
        let _ = registration.target.remove_event_listener_with_callback(
            dom_event::event_name(registration.kind),
            registration.closure.as_ref().unchecked_ref(),
        );
        self.inbox.borrow_mut().retain(|(id, _)| *id != listener);
    }

    fn request_frame(&mut self) -> FrameRequestId {
        let request = FrameRequestId(self.issue());
        self.frames.insert(request);
        (self.wake)();
        request
    }

    fn cancel_frame(&mut self, request: FrameRequestId) {
        self.frames.remove(&request);
    }
}

impl Drop for CanvasEnvironment {
    fn drop(&mut self) {
        let listeners: Vec<_> = self.listeners.keys().copied().collect();
        for listener in listeners {
            self.remove_listener(listener);
        }
        for (_, canvas) in std::mem::take(&mut self.canvases) {
            canvas.element.remove();
        }
    }
}
