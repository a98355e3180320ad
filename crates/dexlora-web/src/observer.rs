#![forbid(unsafe_code)]

//! [`IntersectionSource`] on top of `IntersectionObserver`.
//!
//! Each observation owns one observer watching the element tagged
//! `data-element-id="N"`. Entries are queued and the driver is woken; they are
//! routed to hosts on the next animation frame.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use dexlora_core::visibility::{
    ElementId, IntersectionEntry, IntersectionSource, ObservationId, Threshold,
};
use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::canvas::Waker;
use crate::dom_event;

type EntryQueue = Rc<RefCell<VecDeque<IntersectionEntry>>>;

struct Watch {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

pub struct DomIntersectionSource {
    document: Document,
    next: u64,
    watches: BTreeMap<ObservationId, Watch>,
    queue: EntryQueue,
    wake: Waker,
}

impl std::fmt::Debug for DomIntersectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomIntersectionSource")
            .field("observations", &self.watches.len())
            .field("queued", &self.queue.borrow().len())
            .finish()
    }
}

/// Find the mount element for `id` in `document`.
pub fn find_element(document: &Document, id: ElementId) -> Option<Element> {
    document.query_selector(&dom_event::element_selector(id)).ok().flatten()
}

impl DomIntersectionSource {
    pub fn new(document: Document, wake: Waker) -> Self {
        Self {
            document,
            next: 0,
            watches: BTreeMap::new(),
            queue: Rc::default(),
            wake,
        }
    }

    /// Drain queued entries, oldest first.
    pub fn drain_entries(&mut self) -> Vec<IntersectionEntry> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn observation_count(&self) -> usize {
        self.watches.len()
    }

    fn watch(
        &self,
        observation: ObservationId,
        target: ElementId,
        threshold: Threshold,
        element: &Element,
    ) -> Result<Watch, JsValue> {
        let queue = Rc::clone(&self.queue);
        let wake = Rc::clone(&self.wake);
        let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            let mut queue = queue.borrow_mut();
            for value in entries.iter() {
                let Ok(entry) = value.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                queue.push_back(IntersectionEntry {
                    observation,
                    target,
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                });
            }
            drop(queue);
            wake();
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold.ratio()));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        observer.observe(element);
        Ok(Watch {
            observer,
            _callback: callback,
        })
    }
}

impl IntersectionSource for DomIntersectionSource {
    fn observe(&mut self, target: ElementId, threshold: Threshold) -> ObservationId {
        self.next += 1;
        let observation = ObservationId(self.next);
        let Some(element) = find_element(&self.document, target) else {
            tracing::warn!(element = target.0, "mount element not found; effect stays idle");
            return observation;
        };
        match self.watch(observation, target, threshold, &element) {
            Ok(watch) => {
                self.watches.insert(observation, watch);
            }
            Err(error) => {
                tracing::warn!(element = target.0, ?error, "IntersectionObserver unavailable");
            }
        }
        observation
    }

    fn unobserve(&mut self, observation: ObservationId) {
        if let Some(watch) = self.watches.remove(&observation) {
            watch.observer.disconnect();
        }
        self.queue
            .borrow_mut()
            .retain(|entry| entry.observation != observation);
    }
}

impl Drop for DomIntersectionSource {
    fn drop(&mut self) {
        for (_, watch) in std::mem::take(&mut self.watches) {
            watch.observer.disconnect();
        }
    }
}
