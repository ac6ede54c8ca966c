//! Browser implementations of the ports.
//!
//! Only compiled with the `browser` feature. The start function binds the
//! controller to the first WPForms form on the page, reading optional
//! overrides from `window.FORM_CACHE_CONFIG`.

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventInit, HtmlDocument, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::config::CacheConfig;
use crate::controller::FormCache;
use crate::ports::{Clock, CookieStore, Dom, EventKind, Handler, Listeners, Task};

const CONFIG_GLOBAL: &str = "FORM_CACHE_CONFIG";

// =============================================================
// Cookies
// =============================================================

/// `document.cookie`.
pub struct WebCookies {
    document: Option<HtmlDocument>,
}

impl WebCookies {
    #[must_use]
    pub fn new(document: &Document) -> Self {
        Self { document: document.dyn_ref::<HtmlDocument>().cloned() }
    }
}

impl CookieStore for WebCookies {
    fn read_all(&self) -> String {
        let Some(document) = &self.document else {
            return String::new();
        };
        match document.cookie() {
            Ok(cookies) => cookies,
            Err(e) => {
                log::warn!("cookie read failed: {e:?}");
                String::new()
            }
        }
    }

    fn write(&self, record: &str) {
        let Some(document) = &self.document else {
            return;
        };
        if let Err(e) = document.set_cookie(record) {
            log::warn!("cookie write failed: {e:?}");
        }
    }
}

// =============================================================
// DOM
// =============================================================

/// The page's document with the bound form, if one was found.
pub struct WebDom {
    document: Document,
    form: Option<Element>,
    next_selector: String,
    submit_selector: String,
}

impl WebDom {
    /// Bind to the first form matching the configured id fragment.
    #[must_use]
    pub fn bind(document: Document, config: &CacheConfig) -> Self {
        let form = match document.query_selector(&config.form_selector()) {
            Ok(form) => form,
            Err(e) => {
                log::warn!("form lookup failed: {e:?}");
                None
            }
        };
        if form.is_none() {
            log::info!("no form matching {:?}; form cache idle", config.form_id_fragment);
        }
        Self {
            document,
            form,
            next_selector: config.next_button_selector(),
            submit_selector: config.submit_selector.clone(),
        }
    }

    fn query_all(root: &Element, selector: &str) -> Vec<Element> {
        match root.query_selector_all(selector) {
            Ok(list) => collect_elements(&list),
            Err(e) => {
                log::warn!("query {selector:?} failed: {e:?}");
                Vec::new()
            }
        }
    }
}

fn collect_elements(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect()
}

impl Dom for WebDom {
    type Element = Element;

    fn form_controls(&self) -> Vec<Element> {
        self.form
            .as_ref()
            .map_or_else(Vec::new, |form| Self::query_all(form, "input, select, textarea"))
    }

    fn control_by_id(&self, id: &str) -> Option<Element> {
        let form = self.form.as_ref()?;
        Self::query_all(form, "input, select, textarea")
            .into_iter()
            .find(|el| el.id() == id)
    }

    fn next_buttons(&self) -> Vec<Element> {
        self.form
            .as_ref()
            .map_or_else(Vec::new, |form| Self::query_all(form, &self.next_selector))
    }

    fn submit_button(&self) -> Option<Element> {
        match self.document.query_selector(&self.submit_selector) {
            Ok(button) => button,
            Err(e) => {
                log::warn!("submit lookup failed: {e:?}");
                None
            }
        }
    }

    fn set_indicators_visible(&self, selector: &str, visible: bool) {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("indicator query {selector:?} failed: {e:?}");
                return;
            }
        };
        let visibility = if visible { "visible" } else { "hidden" };
        for element in collect_elements(&list) {
            if let Some(html) = element.dyn_ref::<HtmlElement>() {
                if let Err(e) = html.style().set_property("visibility", visibility) {
                    log::warn!("indicator toggle failed: {e:?}");
                }
            }
        }
    }

    fn tag_name(&self, element: &Element) -> String {
        element.tag_name().to_uppercase()
    }

    fn input_type(&self, element: &Element) -> Option<String> {
        element
            .dyn_ref::<HtmlInputElement>()
            .map(|input| input.type_().to_lowercase())
    }

    fn id(&self, element: &Element) -> String {
        element.id()
    }

    fn value(&self, element: &Element) -> String {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, element: &Element, value: &str) {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn checked(&self, element: &Element) -> bool {
        element
            .dyn_ref::<HtmlInputElement>()
            .is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&self, element: &Element, checked: bool) {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn dispatch_change(&self, element: &Element) {
        let init = EventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        match Event::new_with_event_init_dict(EventKind::Change.as_str(), &init) {
            Ok(event) => {
                if let Err(e) = element.dispatch_event(&event) {
                    log::warn!("change dispatch failed: {e:?}");
                }
            }
            Err(e) => log::warn!("change event creation failed: {e:?}"),
        }
    }
}

impl Listeners for WebDom {
    fn listen(&self, element: &Element, event: EventKind, handler: Handler) {
        let closure = Closure::<dyn FnMut()>::wrap(handler);
        match element.add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref()) {
            // Listeners live as long as the page.
            Ok(()) => closure.forget(),
            Err(e) => log::warn!("{} listener failed: {e:?}", event.as_str()),
        }
    }
}

// =============================================================
// Clock
// =============================================================

/// `Date.now()` plus gloo timers. Timers are never cancelled.
pub struct WebClock;

impl Clock for WebClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }

    fn schedule_once(&self, delay_ms: u32, task: Task) {
        Timeout::new(delay_ms, task).forget();
    }

    fn schedule_repeating(&self, interval_ms: u32, handler: Handler) {
        Interval::new(interval_ms, handler).forget();
    }
}

// =============================================================
// Entry point
// =============================================================

/// Read `window.FORM_CACHE_CONFIG`, falling back to defaults.
fn read_config(window: &web_sys::Window) -> CacheConfig {
    let raw = match js_sys::Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => return CacheConfig::default(),
    };
    let json = match js_sys::JSON::stringify(&raw) {
        Ok(json) => String::from(json),
        Err(e) => {
            log::warn!("{CONFIG_GLOBAL} is not serializable: {e:?}; using defaults");
            return CacheConfig::default();
        }
    };
    match CacheConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{CONFIG_GLOBAL} rejected: {e}; using defaults");
            CacheConfig::default()
        }
    }
}

/// Install the form cache on page load.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger init failed: {e}")));
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = read_config(&window);
    let dom = WebDom::bind(document.clone(), &config);
    let cookies = WebCookies::new(&document);
    FormCache::new(config, dom, cookies, WebClock).setup();
}
