#![forbid(unsafe_code)]

//! The running site: current page, its effect hosts and the contact form.
//!
//! Host-provided primitives ([`IntersectionSource`], [`EffectEnvironment`])
//! are passed into each call; the site keeps no global state. Opening a page
//! tears down every host of the previous page (releasing their instances)
//! before the new page's hosts are mounted.

use dexlora_contact::{
    ContactForm, RelayConfig, RelayTransport, SubmissionClock, SubmitOutcome, SystemClock,
};
use dexlora_core::event::InputEvent;
use dexlora_core::geometry::Rect;
use dexlora_core::visibility::{ElementId, IntersectionEntry, IntersectionSource, SoftwareViewport};
use dexlora_fx::{
    EffectEnvironment, EffectHost, FrameRequestId, HeadlessEnvironment, InstanceSettings,
    ListenerId,
};

use crate::html::{FormView, HtmlRenderer};
use crate::page::{Mount, Page, PageLayout, Placement};
use crate::route::Route;

/// Default viewport when none has been reported.
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);

pub struct Site<T, C = SystemClock> {
    page: Page,
    layout: PageLayout,
    hosts: Vec<EffectHost>,
    form: ContactForm<T, C>,
    viewport: (u32, u32),
    settings: InstanceSettings,
    renderer: HtmlRenderer,
}

impl<T, C> std::fmt::Debug for Site<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("route", &self.page.route)
            .field("hosts", &self.hosts.len())
            .field("live_effects", &self.live_effects())
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl<T> Site<T, SystemClock> {
    /// A site showing the home page (not yet mounted) with a fresh form.
    pub fn new(relay: RelayConfig, transport: T) -> Self {
        Self::with_form(ContactForm::new(relay, transport))
    }
}

impl<T, C> Site<T, C> {
    pub fn with_form(form: ContactForm<T, C>) -> Self {
        let page = Page::for_route(Route::Home);
        let layout = page.layout(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1);
        Self {
            page,
            layout,
            hosts: Vec::new(),
            form,
            viewport: DEFAULT_VIEWPORT,
            settings: InstanceSettings::default(),
            renderer: HtmlRenderer::default(),
        }
    }

    /// Initial viewport size. Use [`resize`](Self::resize) once hosts exist.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self.layout = self.page.layout(width, height);
        self
    }

    /// Settings applied to every effect instance.
    pub fn with_settings(mut self, settings: InstanceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_renderer(mut self, renderer: HtmlRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn route(&self) -> Route {
        self.page.route
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn hosts(&self) -> &[EffectHost] {
        &self.hosts
    }

    pub fn host(&self, element: ElementId) -> Option<&EffectHost> {
        self.hosts.iter().find(|h| h.target() == element)
    }

    /// Number of hosts currently holding a live instance.
    pub fn live_effects(&self) -> usize {
        self.hosts.iter().filter(|h| h.is_active()).count()
    }

    pub fn form(&self) -> &ContactForm<T, C> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm<T, C> {
        &mut self.form
    }

    pub const fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn mount_size(&self, mount: &Mount) -> (u32, u32) {
        match mount.placement {
            Placement::Fixed => self.viewport,
            Placement::Section => self
                .layout
                .mount_rect(&self.page, mount.element)
                .map_or(self.viewport, |r| (r.width, r.height)),
        }
    }

    /// Switch to `route`: tear down the current page's hosts, then mount the
    /// new page's hosts with `source`. Instances appear once entries arrive.
    pub fn open<S, E>(&mut self, route: Route, source: &mut S, env: &mut E)
    where
        S: IntersectionSource + ?Sized,
        E: EffectEnvironment + ?Sized,
    {
        let _span =
            tracing::info_span!("dexlora.site.open", from = %self.page.route, to = %route)
                .entered();
        self.close(source, env);
        self.page = Page::for_route(route);
        self.layout = self.page.layout(self.viewport.0, self.viewport.1);
        let mut hosts = Vec::new();
        for mount in self.page.mounts() {
            let (width, height) = self.mount_size(mount);
            let mut host = EffectHost::new(mount.element, mount.config.clone(), width, height)
                .with_settings(self.settings);
            host.mount(source);
            hosts.push(host);
        }
        tracing::info!(route = %route, hosts = hosts.len(), "page opened");
        self.hosts = hosts;
    }

    /// Resolve `path` and [`open`](Self::open) it.
    pub fn navigate<S, E>(&mut self, path: &str, source: &mut S, env: &mut E) -> Route
    where
        S: IntersectionSource + ?Sized,
        E: EffectEnvironment + ?Sized,
    {
        let route = Route::from_path(path);
        self.open(route, source, env);
        route
    }

    /// Tear down every host of the current page. Idempotent.
    pub fn close<S, E>(&mut self, source: &mut S, env: &mut E)
    where
        S: IntersectionSource + ?Sized,
        E: EffectEnvironment + ?Sized,
    {
        for mut host in self.hosts.drain(..) {
            host.teardown(source, env);
        }
    }

    /// Route an intersection entry to the host that owns its observation.
    pub fn apply_entry<E: EffectEnvironment + ?Sized>(
        &mut self,
        entry: &IntersectionEntry,
        env: &mut E,
    ) -> bool {
        self.hosts
            .iter_mut()
            .find(|h| h.gate().observation() == Some(entry.observation))
            .is_some_and(|host| host.apply_entry(entry, env))
    }

    /// Deliver a frame callback. Returns `true` if some instance rendered.
    pub fn on_frame<E: EffectEnvironment + ?Sized>(
        &mut self,
        env: &mut E,
        request: FrameRequestId,
        dt: f64,
    ) -> bool {
        self.hosts
            .iter_mut()
            .any(|host| host.on_frame(env, request, dt))
    }

    /// Deliver an event raised by `listener`.
    pub fn handle_input<E: EffectEnvironment + ?Sized>(
        &mut self,
        env: &mut E,
        listener: ListenerId,
        event: &InputEvent,
    ) -> bool {
        self.hosts
            .iter_mut()
            .any(|host| host.handle_input(env, listener, event))
    }

    /// Viewport resized: relayout and resize every host.
    pub fn resize<E: EffectEnvironment + ?Sized>(&mut self, env: &mut E, width: u32, height: u32) {
        self.viewport = (width, height);
        self.layout = self.page.layout(width, height);
        let sizes: Vec<_> = self.page.mounts().map(|m| (m.element, self.mount_size(m))).collect();
        for host in &mut self.hosts {
            if let Some((_, (w, h))) = sizes.iter().find(|(e, _)| *e == host.target()) {
                host.resize(env, *w, *h);
            }
        }
    }

    /// Document rectangle for each mount. Fixed mounts span the whole
    /// document so they intersect any scroll position.
    pub fn mount_rects(&self) -> Vec<(ElementId, Rect)> {
        let document = Rect::new(
            0,
            0,
            self.viewport.0,
            self.layout.height.max(self.viewport.1),
        );
        self.page
            .mounts()
            .filter_map(|m| match m.placement {
                Placement::Fixed => Some((m.element, document)),
                Placement::Section => self
                    .layout
                    .mount_rect(&self.page, m.element)
                    .map(|r| (m.element, r)),
            })
            .collect()
    }

    /// Report mount rectangles to a software viewport.
    pub fn sync_layout(&self, viewport: &mut SoftwareViewport) {
        for (element, rect) in self.mount_rects() {
            viewport.set_element_rect(element, rect);
        }
    }

    /// Render the current page with the live form state.
    pub fn render_html(&self) -> String {
        self.renderer.render(&self.page, Some(FormView::of(&self.form)))
    }

    /// Render only the contact form region with the live form state.
    pub fn render_form_html(&self) -> String {
        self.renderer.render_form(Some(FormView::of(&self.form)))
    }

    /// Deliver every due frame of a headless environment once.
    pub fn pump_frames(&mut self, env: &mut HeadlessEnvironment, dt: f64) -> usize {
        let mut rendered = 0;
        for request in env.take_due_frames() {
            if self.on_frame(env, request, dt) {
                rendered += 1;
            }
        }
        rendered
    }

    /// Drain a software viewport and route its entries.
    pub fn pump_entries<E: EffectEnvironment + ?Sized>(
        &mut self,
        viewport: &mut SoftwareViewport,
        env: &mut E,
    ) -> usize {
        let entries: Vec<_> = viewport.drain_entries().collect();
        entries
            .iter()
            .filter(|entry| self.apply_entry(entry, env))
            .count()
    }
}

impl<T: RelayTransport, C: SubmissionClock> Site<T, C> {
    /// Submit the contact form.
    pub async fn submit_contact(&mut self) -> SubmitOutcome {
        self.form.submit().await
    }
}
