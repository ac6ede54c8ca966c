//! Capabilities the controller needs from its host.
//!
//! The browser build implements these over `web_sys` (see `web`); tests use
//! an in-memory simulation. Every port is single-threaded and takes `&self`,
//! keeping any interior mutability on the implementation side.

/// Callback attached to a DOM event or scheduled on a timer.
pub type Handler = Box<dyn FnMut()>;

/// One-shot scheduled task.
pub type Task = Box<dyn FnOnce()>;

/// Read/write access to the page's cookie string.
pub trait CookieStore {
    /// The full `document.cookie` string (`a=1; b=2`).
    fn read_all(&self) -> String;

    /// Write a single cookie record (`name=value; expires=...; path=/`).
    fn write(&self, record: &str);
}

/// Element discovery and control accessors.
///
/// Discovery methods are pure queries scoped to the bound form, except
/// [`submit_button`](Dom::submit_button) and
/// [`set_indicators_visible`](Dom::set_indicators_visible), which search the
/// whole page. When no form is bound, every scoped query returns nothing.
pub trait Dom {
    /// Handle to a DOM element.
    type Element: Clone + 'static;

    /// All `input`, `select` and `textarea` descendants of the bound form.
    fn form_controls(&self) -> Vec<Self::Element>;

    /// The descendant of the bound form with the given id.
    fn control_by_id(&self, id: &str) -> Option<Self::Element>;

    /// The "next page" buttons of the form.
    fn next_buttons(&self) -> Vec<Self::Element>;

    /// The page's submit button.
    fn submit_button(&self) -> Option<Self::Element>;

    /// Show or hide every element matching `selector`.
    fn set_indicators_visible(&self, selector: &str, visible: bool);

    /// Upper-case tag name (`INPUT`, `SELECT`, ...).
    fn tag_name(&self, element: &Self::Element) -> String;

    /// Lower-case `type` of an input element, `None` for other elements.
    fn input_type(&self, element: &Self::Element) -> Option<String>;

    /// The element's `id` attribute, empty if missing.
    fn id(&self, element: &Self::Element) -> String;

    fn value(&self, element: &Self::Element) -> String;

    fn set_value(&self, element: &Self::Element, value: &str);

    fn checked(&self, element: &Self::Element) -> bool;

    fn set_checked(&self, element: &Self::Element, checked: bool);

    /// Dispatch a bubbling, cancelable synthetic `change` event.
    fn dispatch_change(&self, element: &Self::Element);
}

/// DOM events the controller subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Change,
    Click,
}

impl EventKind {
    /// The DOM event type string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Click => "click",
        }
    }
}

/// Event subscription. Listeners live for the lifetime of the page.
pub trait Listeners: Dom {
    fn listen(&self, element: &Self::Element, event: EventKind, handler: Handler);
}

/// Wall clock and timers.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Run `task` once after `delay_ms`.
    fn schedule_once(&self, delay_ms: u32, task: Task);

    /// Run `handler` every `interval_ms`, forever.
    fn schedule_repeating(&self, interval_ms: u32, handler: Handler);
}
