#![forbid(unsafe_code)]

//! Viewport visibility gating.
//!
//! A [`VisibilityGate`] turns a stream of intersection entries for one screen
//! region into a boolean "is this region on screen" flag. The observation
//! itself is owned by an [`IntersectionSource`] supplied by the host
//! (`IntersectionObserver` in the browser, [`SoftwareViewport`] natively).
//!
//! # Lifecycle
//!
//! 1. [`VisibilityGate::mount`] starts observing. The flag starts `false`.
//! 2. The host routes [`IntersectionEntry`] values to [`VisibilityGate::apply`],
//!    which reports the new flag only when it changes.
//! 3. [`VisibilityGate::teardown`] stops observing and releases the
//!    observation. Mounting again afterwards starts a fresh observation.
//!
//! Observation is best-effort: there are no error states.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::geometry::Rect;

/// Identifies an observable screen region (a page section, a canvas container).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Identifies one live observation handed out by an [`IntersectionSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationId(pub u64);

/// Minimum visible fraction of the target required to count as visible.
///
/// `Threshold::ANY` (the default) means any overlap at all.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Threshold(f64);

impl Threshold {
    /// Any overlap with the viewport counts.
    pub const ANY: Self = Self(0.0);
    /// Only a fully visible target counts.
    pub const FULL: Self = Self(1.0);

    /// Create a threshold, clamping into `[0.0, 1.0]`. NaN maps to [`Self::ANY`].
    #[must_use]
    pub fn new(ratio: f64) -> Self {
        if ratio.is_nan() {
            return Self::ANY;
        }
        Self(ratio.clamp(0.0, 1.0))
    }

    /// The raw ratio.
    #[inline]
    #[must_use]
    pub const fn ratio(self) -> f64 {
        self.0
    }

    /// Whether an entry with the given overlap state satisfies this threshold.
    #[inline]
    #[must_use]
    pub fn is_met(self, is_intersecting: bool, ratio: f64) -> bool {
        is_intersecting && (self.0 <= 0.0 || ratio >= self.0)
    }
}

/// One intersection change report for an observed region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// The observation that produced the entry.
    pub observation: ObservationId,
    /// The observed region.
    pub target: ElementId,
    /// Whether any part of the target overlaps the viewport.
    pub is_intersecting: bool,
    /// Visible fraction of the target in `[0.0, 1.0]`.
    pub ratio: f64,
}

/// Host primitive that watches regions against the viewport.
///
/// Implementations deliver [`IntersectionEntry`] values out of band (the host
/// routes them to the owning gate). An initial entry is expected right after
/// `observe`, mirroring `IntersectionObserver`.
pub trait IntersectionSource {
    /// Begin observing `target`.
    fn observe(&mut self, target: ElementId, threshold: Threshold) -> ObservationId;

    /// Stop observing and release the observation. Unknown ids are ignored.
    fn unobserve(&mut self, observation: ObservationId);
}

impl<S: IntersectionSource + ?Sized> IntersectionSource for &mut S {
    fn observe(&mut self, target: ElementId, threshold: Threshold) -> ObservationId {
        (**self).observe(target, threshold)
    }

    fn unobserve(&mut self, observation: ObservationId) {
        (**self).unobserve(observation);
    }
}

/// Lazy, restartable boolean visibility signal for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityGate {
    target: ElementId,
    threshold: Threshold,
    observation: Option<ObservationId>,
    visible: bool,
}

impl VisibilityGate {
    /// Create an idle gate. Nothing is observed until [`mount`](Self::mount).
    #[must_use]
    pub const fn new(target: ElementId, threshold: Threshold) -> Self {
        Self {
            target,
            threshold,
            observation: None,
            visible: false,
        }
    }

    /// Start observing. Returns the existing observation if already mounted.
    pub fn mount<S: IntersectionSource + ?Sized>(&mut self, source: &mut S) -> ObservationId {
        if let Some(existing) = self.observation {
            return existing;
        }
        let observation = source.observe(self.target, self.threshold);
        self.observation = Some(observation);
        self.visible = false;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target_id = self.target.0,
            observation = observation.0,
            "visibility gate mounted"
        );
        observation
    }

    /// Stop observing and release the observation.
    ///
    /// Returns `true` if an observation was released; `false` if the gate
    /// was already idle.
    pub fn teardown<S: IntersectionSource + ?Sized>(&mut self, source: &mut S) -> bool {
        let Some(observation) = self.observation.take() else {
            return false;
        };
        source.unobserve(observation);
        self.visible = false;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target_id = self.target.0,
            observation = observation.0,
            "visibility gate torn down"
        );
        true
    }

    /// Fold an entry into the flag.
    ///
    /// Returns `Some(visible)` when the flag changed, `None` when the entry
    /// is stale, belongs to another observation, or does not change the flag.
    pub fn apply(&mut self, entry: &IntersectionEntry) -> Option<bool> {
        if self.observation != Some(entry.observation) {
            return None;
        }
        let now = self.threshold.is_met(entry.is_intersecting, entry.ratio);
        if now == self.visible {
            return None;
        }
        self.visible = now;
        Some(now)
    }

    /// Current flag.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether an observation is currently held.
    #[inline]
    #[must_use]
    pub const fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// The live observation, if mounted.
    #[inline]
    #[must_use]
    pub const fn observation(&self) -> Option<ObservationId> {
        self.observation
    }

    /// The observed region.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> ElementId {
        self.target
    }

    /// The configured threshold.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }
}

// ---------------------------------------------------------------------------
// SoftwareViewport: pure-Rust intersection source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Observation {
    target: ElementId,
    threshold: Threshold,
    last: Option<bool>,
}

/// Intersection source computed from known element rectangles.
///
/// The host reports element layout with [`set_element_rect`](Self::set_element_rect)
/// and scrolling with [`scroll_to`](Self::scroll_to) / [`set_viewport`](Self::set_viewport).
/// Entries are queued on every threshold crossing and drained with
/// [`drain_entries`](Self::drain_entries).
///
/// Elements without a known rectangle are treated as zero-area (never visible).
#[derive(Debug, Clone, Default)]
pub struct SoftwareViewport {
    viewport: Rect,
    elements: HashMap<ElementId, Rect>,
    observations: BTreeMap<ObservationId, Observation>,
    next_observation: u64,
    pending: VecDeque<IntersectionEntry>,
}

impl SoftwareViewport {
    /// Create a source with the given viewport rectangle.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Current viewport.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Replace the viewport rectangle (resize or scroll).
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        self.recompute_all();
    }

    /// Scroll so the viewport's top-left is at `(x, y)`.
    pub fn scroll_to(&mut self, x: i32, y: i32) {
        let next = Rect::new(x, y, self.viewport.width, self.viewport.height);
        self.set_viewport(next);
    }

    /// Record (or update) an element's document rectangle.
    pub fn set_element_rect(&mut self, element: ElementId, rect: Rect) {
        if self.elements.insert(element, rect) == Some(rect) {
            return;
        }
        self.recompute_where(|obs| obs.target == element);
    }

    /// Forget an element's rectangle (it becomes zero-area).
    pub fn remove_element(&mut self, element: ElementId) {
        if self.elements.remove(&element).is_some() {
            self.recompute_where(|obs| obs.target == element);
        }
    }

    /// Number of live observations.
    #[inline]
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Whether `observation` is still live.
    #[must_use]
    pub fn is_observing(&self, observation: ObservationId) -> bool {
        self.observations.contains_key(&observation)
    }

    /// Number of queued entries.
    #[inline]
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drain queued entries in delivery order.
    pub fn drain_entries(&mut self) -> impl Iterator<Item = IntersectionEntry> + '_ {
        self.pending.drain(..)
    }

    fn measure(&self, target: ElementId) -> (bool, f64) {
        let rect = self.elements.get(&target).copied().unwrap_or_default();
        if rect.is_empty() {
            return (false, 0.0);
        }
        match rect.intersection_opt(&self.viewport) {
            Some(_) => (true, rect.coverage_by(&self.viewport)),
            None => (false, 0.0),
        }
    }

    fn recompute_all(&mut self) {
        self.recompute_where(|_| true);
    }

    fn recompute_where(&mut self, mut pred: impl FnMut(&Observation) -> bool) {
        let ids: Vec<ObservationId> = self
            .observations
            .iter()
            .filter(|(_, obs)| pred(obs))
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            self.recompute_one(id);
        }
    }

    fn recompute_one(&mut self, id: ObservationId) {
        let Some(obs) = self.observations.get(&id).copied() else {
            return;
        };
        let (is_intersecting, ratio) = self.measure(obs.target);
        let state = obs.threshold.is_met(is_intersecting, ratio);
        if obs.last == Some(state) {
            return;
        }
        if let Some(slot) = self.observations.get_mut(&id) {
            slot.last = Some(state);
        }
        self.pending.push_back(IntersectionEntry {
            observation: id,
            target: obs.target,
            is_intersecting,
            ratio,
        });
    }
}

impl IntersectionSource for SoftwareViewport {
    fn observe(&mut self, target: ElementId, threshold: Threshold) -> ObservationId {
        self.next_observation += 1;
        let id = ObservationId(self.next_observation);
        self.observations.insert(
            id,
            Observation {
                target,
                threshold,
                last: None,
            },
        );
        // Initial report, as the browser delivers one right after observe().
        self.recompute_one(id);
        id
    }

    fn unobserve(&mut self, observation: ObservationId) {
        if self.observations.remove(&observation).is_some() {
            self.pending.retain(|entry| entry.observation != observation);
        }
    }
}
