#![forbid(unsafe_code)]

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use dexlora_contact::config::{ENV_FORMSPREE_ID, ENV_WEB3FORMS_KEY};
use dexlora_contact::{ContactForm, Field, HttpTransport, RelayConfig, SubmitOutcome};
use dexlora_fx::{EffectHost, FrameClock, InstanceSettings};
use dexlora_site::{FormView, HtmlRenderer, Page, Route};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Document, Element};

use crate::canvas::{CanvasEnvironment, Waker};
use crate::observer::{DomIntersectionSource, find_element};
use crate::raf::RafLoop;

/// One mounted effect: its host and the canvases it draws into.
struct MountedEffect {
    host: EffectHost,
    env: CanvasEnvironment,
}

struct App {
    document: Document,
    root: Element,
    page: Page,
    effects: Vec<MountedEffect>,
    source: DomIntersectionSource,
    form: ContactForm<HttpTransport>,
    renderer: HtmlRenderer,
    settings: InstanceSettings,
    clock: FrameClock,
    wake: Waker,
}

impl App {
    fn render(&mut self) {
        let html = self
            .renderer
            .render(&self.page, Some(FormView::of(&self.form)));
        self.root.set_inner_html(&html);
    }

    /// Swap the rendered `<form>` for the current form state. Effect hosts
    /// and their canvases are left alone.
    fn render_form(&self) {
        let selector = self.renderer.form_selector();
        match self.root.query_selector(&selector) {
            Ok(Some(element)) => {
                let html = self.renderer.render_form(Some(FormView::of(&self.form)));
                element.set_outer_html(&html);
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(?err, "form lookup failed"),
        }
    }

    fn open(&mut self, route: Route) {
        let _span = tracing::info_span!("dexlora.web.open", to = %route).entered();
        self.close();
        self.page = Page::for_route(route);
        self.render();
        for mount in self.page.mounts() {
            let Some(element) = find_element(&self.document, mount.element) else {
                tracing::warn!(element = mount.element.0, "mount element missing after render");
                continue;
            };
            let env = CanvasEnvironment::new(element, Rc::clone(&self.wake));
            let (width, height) = env.mount_size();
            let mut host = EffectHost::new(mount.element, mount.config.clone(), width, height)
                .with_settings(self.settings);
            host.mount(&mut self.source);
            self.effects.push(MountedEffect { host, env });
        }
        tracing::info!(route = %route, hosts = self.effects.len(), "page opened");
    }

    fn close(&mut self) {
        for mut effect in self.effects.drain(..) {
            effect.host.teardown(&mut self.source, &mut effect.env);
        }
    }

    fn relayout(&mut self) {
        for effect in &mut self.effects {
            let (width, height) = effect.env.mount_size();
            effect.host.resize(&mut effect.env, width, height);
        }
    }

    /// One animation frame: route entries, then input, then due frames.
    /// Returns whether another frame is wanted.
    fn tick(&mut self) -> bool {
        let dt = self.clock.tick();
        for entry in self.source.drain_entries() {
            if let Some(effect) = self
                .effects
                .iter_mut()
                .find(|e| e.host.gate().observation() == Some(entry.observation))
            {
                effect.host.apply_entry(&entry, &mut effect.env);
            }
        }
        for effect in &mut self.effects {
            for (listener, event) in effect.env.take_events() {
                effect.host.handle_input(&mut effect.env, listener, &event);
            }
            for request in effect.env.take_due_frames() {
                effect.host.on_frame(&mut effect.env, request, dt);
            }
        }
        let again = self.effects.iter().any(|e| e.env.has_pending_frames());
        if !again {
            // the next wake starts from a zero delta
            self.clock.reset();
        }
        again
    }
}

#[derive(Serialize)]
struct FieldErrorView {
    field: &'static str,
    message: String,
}

fn outcome_name(outcome: &SubmitOutcome) -> &'static str {
    match outcome {
        SubmitOutcome::Sent => "sent",
        SubmitOutcome::Failed(_) => "failed",
        SubmitOutcome::Busy => "busy",
    }
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Browser entry point. Owns the rendered page, its effects and the form.
#[wasm_bindgen]
pub struct DexloraWeb {
    app: Rc<RefCell<App>>,
    raf: RafLoop,
}

#[wasm_bindgen]
impl DexloraWeb {
    /// Render `path` into `root` and start its effects. Relay credentials
    /// follow the usual precedence: Formspree, then Web3Forms.
    #[wasm_bindgen(constructor)]
    pub fn new(
        root: Element,
        path: &str,
        formspree_id: Option<String>,
        web3forms_key: Option<String>,
    ) -> Result<DexloraWeb, JsValue> {
        let document = root
            .owner_document()
            .ok_or_else(|| js_error("root element is detached"))?;
        let config = RelayConfig::from_lookup(|key| match key {
            ENV_FORMSPREE_ID => formspree_id.clone(),
            ENV_WEB3FORMS_KEY => web3forms_key.clone(),
            _ => None,
        });
        let transport = HttpTransport::new(config.timeout).map_err(js_error)?;

        let slot: Rc<OnceCell<RafLoop>> = Rc::new(OnceCell::new());
        let wake: Waker = {
            let slot = Rc::clone(&slot);
            Rc::new(move || {
                if let Some(raf) = slot.get() {
                    raf.start();
                }
            })
        };

        let app = Rc::new(RefCell::new(App {
            source: DomIntersectionSource::new(document.clone(), Rc::clone(&wake)),
            document,
            root,
            page: Page::for_route(Route::Home),
            effects: Vec::new(),
            form: ContactForm::new(config, transport),
            renderer: HtmlRenderer::fragment(),
            settings: InstanceSettings::default(),
            clock: FrameClock::new(),
            wake,
        }));

        let weak = Rc::downgrade(&app);
        let raf = RafLoop::new(move || {
            weak.upgrade()
                .and_then(|app| app.try_borrow_mut().ok().map(|mut app| app.tick()))
                .unwrap_or(false)
        });
        // `slot` is fresh, so this is the only `set`.
        slot.set(raf.clone()).ok();

        app.borrow_mut().open(Route::from_path(path));
        raf.start();
        Ok(Self { app, raf })
    }

    /// Current route path.
    pub fn route(&self) -> String {
        self.app.borrow().page.route.path().to_owned()
    }

    /// Tear down the current page and render `path`. Returns the resolved path.
    pub fn navigate(&self, path: &str) -> String {
        let route = Route::from_path(path);
        self.app.borrow_mut().open(route);
        self.raf.start();
        route.path().to_owned()
    }

    /// Re-measure every mount after a layout change.
    pub fn relayout(&self) {
        self.app.borrow_mut().relayout();
        self.raf.start();
    }

    /// Re-render the form region only.
    #[wasm_bindgen(js_name = refreshForm)]
    pub fn refresh_form(&self) {
        self.app.borrow().render_form();
    }

    /// Re-render the whole page with the current form state. Rebuilds every
    /// effect host; prefer [`refresh_form`](Self::refresh_form) for form updates.
    pub fn refresh(&self) {
        let route = self.app.borrow().page.route;
        self.app.borrow_mut().open(route);
        self.raf.start();
    }

    /// Update one form field by control name. Returns `false` for unknown names.
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&self, name: &str, value: &str) -> bool {
        let Some(field) = Field::from_name(name) else {
            return false;
        };
        self.app.borrow_mut().form.set_field(field, value);
        true
    }

    /// Submit the contact form. Resolves to `"sent"`, `"failed"` or `"busy"`.
    /// The form region is re-rendered as the state changes; on `"sent"` the
    /// inputs come back empty.
    pub fn submit(&self) -> js_sys::Promise {
        let app = Rc::clone(&self.app);
        future_to_promise(async move {
            let begun = app.borrow_mut().form.begin_submit();
            app.borrow().render_form();
            let outcome = match begun {
                Err(outcome) => outcome,
                Ok(pending) => {
                    let transport = app.borrow().form.transport().clone();
                    let result = pending.send(&transport).await;
                    let outcome = app.borrow_mut().form.finish_submit(result);
                    app.borrow().render_form();
                    outcome
                }
            };
            Ok(JsValue::from_str(outcome_name(&outcome)))
        })
    }

    #[wasm_bindgen(js_name = submitLabel)]
    pub fn submit_label(&self) -> String {
        self.app.borrow().form.submit_label().to_owned()
    }

    #[wasm_bindgen(js_name = isSubmitting)]
    pub fn is_submitting(&self) -> bool {
        self.app.borrow().form.is_submitting()
    }

    /// Clear the "sent" state after its display interval.
    #[wasm_bindgen(js_name = acknowledgeSuccess)]
    pub fn acknowledge_success(&self) {
        let mut app = self.app.borrow_mut();
        app.form.acknowledge_success();
        app.render_form();
    }

    /// Field errors as a JSON array of `{field, message}`.
    #[wasm_bindgen(js_name = errorsJson)]
    pub fn errors_json(&self) -> Result<String, JsValue> {
        let app = self.app.borrow();
        let errors: Vec<_> = app
            .form
            .errors()
            .iter()
            .map(|e| FieldErrorView {
                field: e.field.as_str(),
                message: e.error.format_message(),
            })
            .collect();
        serde_json::to_string(&errors).map_err(js_error)
    }

    /// Drain pending toasts as a JSON array.
    #[wasm_bindgen(js_name = takeNoticesJson)]
    pub fn take_notices_json(&self) -> Result<String, JsValue> {
        let notices = self.app.borrow_mut().form.take_notices();
        serde_json::to_string(&notices).map_err(js_error)
    }

    /// Number of effects currently holding a live instance.
    #[wasm_bindgen(js_name = liveEffects)]
    pub fn live_effects(&self) -> usize {
        self.app
            .borrow()
            .effects
            .iter()
            .filter(|e| e.host.is_active())
            .count()
    }

    /// Release every effect, observer and frame callback.
    pub fn destroy(&self) {
        self.raf.stop();
        if let Ok(mut app) = self.app.try_borrow_mut() {
            app.close();
        }
    }
}

impl Drop for DexloraWeb {
    fn drop(&mut self) {
        self.destroy();
        self.raf.dispose();
    }
}
