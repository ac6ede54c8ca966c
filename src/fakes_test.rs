//! In-memory simulation of the browser ports for controller tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::CacheConfig;
use crate::controller::FormCache;
use crate::cookie;
use crate::doc::FormDocument;
use crate::ports::{Clock, CookieStore, Dom, EventKind, Handler, Listeners, Task};

// =============================================================
// DOM
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    InForm,
    OutsideForm,
    NextButton,
    Submit,
}

#[derive(Debug, Clone)]
struct FakeElement {
    tag: String,
    input_type: Option<String>,
    id: String,
    value: String,
    checked: bool,
    placement: Placement,
}

#[derive(Default)]
struct DomState {
    elements: Vec<FakeElement>,
    form_missing: bool,
    listeners: Vec<(usize, EventKind, Rc<RefCell<Handler>>)>,
    change_events: Vec<usize>,
    indicator_log: Vec<(String, bool)>,
}

/// A single form plus page-level buttons. Elements are addressed by index.
#[derive(Clone, Default)]
pub(crate) struct FakeDom {
    state: Rc<RefCell<DomState>>,
}

impl FakeDom {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A page where the form lookup found nothing.
    pub(crate) fn without_form() -> Self {
        let dom = Self::new();
        dom.state.borrow_mut().form_missing = true;
        dom
    }

    fn push(&self, tag: &str, input_type: Option<&str>, id: &str, placement: Placement) -> usize {
        let mut state = self.state.borrow_mut();
        state.elements.push(FakeElement {
            tag: tag.to_owned(),
            input_type: input_type.map(str::to_owned),
            id: id.to_owned(),
            value: String::new(),
            checked: false,
            placement,
        });
        state.elements.len() - 1
    }

    pub(crate) fn add_input(&self, id: &str, input_type: &str) -> usize {
        self.push("INPUT", Some(input_type), id, Placement::InForm)
    }

    pub(crate) fn add_select(&self, id: &str) -> usize {
        self.push("SELECT", None, id, Placement::InForm)
    }

    pub(crate) fn add_textarea(&self, id: &str) -> usize {
        self.push("TEXTAREA", None, id, Placement::InForm)
    }

    pub(crate) fn add_outside_input(&self, id: &str, input_type: &str) -> usize {
        self.push("INPUT", Some(input_type), id, Placement::OutsideForm)
    }

    pub(crate) fn add_next_button(&self) -> usize {
        self.push("BUTTON", None, "", Placement::NextButton)
    }

    pub(crate) fn add_submit(&self) -> usize {
        self.push("BUTTON", None, "", Placement::Submit)
    }

    /// Blank every control, as a fresh page load would.
    pub(crate) fn blank(&self) {
        for element in &mut self.state.borrow_mut().elements {
            element.value.clear();
            element.checked = false;
        }
    }

    /// Simulate the user or browser firing `event` on `element`.
    pub(crate) fn fire(&self, element: usize, event: EventKind) {
        let handlers: Vec<Rc<RefCell<Handler>>> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|(el, kind, _)| *el == element && *kind == event)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            let mut call = handler.borrow_mut();
            (*call)();
        }
    }

    pub(crate) fn listener_count(&self, element: usize, event: EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|(el, kind, _)| *el == element && *kind == event)
            .count()
    }

    pub(crate) fn change_events(&self) -> Vec<usize> {
        self.state.borrow().change_events.clone()
    }

    pub(crate) fn indicator_log(&self) -> Vec<(String, bool)> {
        self.state.borrow().indicator_log.clone()
    }

    pub(crate) fn get_value(&self, element: usize) -> String {
        self.state.borrow().elements[element].value.clone()
    }

    pub(crate) fn is_checked(&self, element: usize) -> bool {
        self.state.borrow().elements[element].checked
    }

    pub(crate) fn type_into(&self, element: usize, value: &str) {
        self.state.borrow_mut().elements[element].value = value.to_owned();
    }

    pub(crate) fn tick(&self, element: usize, checked: bool) {
        self.state.borrow_mut().elements[element].checked = checked;
    }

    fn in_form(&self) -> Vec<usize> {
        let state = self.state.borrow();
        if state.form_missing {
            return Vec::new();
        }
        state
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.placement == Placement::InForm)
            .map(|(index, _)| index)
            .collect()
    }
}

impl Dom for FakeDom {
    type Element = usize;

    fn form_controls(&self) -> Vec<usize> {
        self.in_form()
    }

    fn control_by_id(&self, id: &str) -> Option<usize> {
        let state = self.state.borrow();
        self.in_form().into_iter().find(|index| state.elements[*index].id == id)
    }

    fn next_buttons(&self) -> Vec<usize> {
        let state = self.state.borrow();
        if state.form_missing {
            return Vec::new();
        }
        state
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.placement == Placement::NextButton)
            .map(|(index, _)| index)
            .collect()
    }

    fn submit_button(&self) -> Option<usize> {
        self.state
            .borrow()
            .elements
            .iter()
            .position(|el| el.placement == Placement::Submit)
    }

    fn set_indicators_visible(&self, selector: &str, visible: bool) {
        self.state
            .borrow_mut()
            .indicator_log
            .push((selector.to_owned(), visible));
    }

    fn tag_name(&self, element: &usize) -> String {
        self.state.borrow().elements[*element].tag.clone()
    }

    fn input_type(&self, element: &usize) -> Option<String> {
        self.state.borrow().elements[*element].input_type.clone()
    }

    fn id(&self, element: &usize) -> String {
        self.state.borrow().elements[*element].id.clone()
    }

    fn value(&self, element: &usize) -> String {
        self.get_value(*element)
    }

    fn set_value(&self, element: &usize, value: &str) {
        self.type_into(*element, value);
    }

    fn checked(&self, element: &usize) -> bool {
        self.is_checked(*element)
    }

    fn set_checked(&self, element: &usize, checked: bool) {
        self.tick(*element, checked);
    }

    fn dispatch_change(&self, element: &usize) {
        self.state.borrow_mut().change_events.push(*element);
        self.fire(*element, EventKind::Change);
    }
}

impl Listeners for FakeDom {
    fn listen(&self, element: &usize, event: EventKind, handler: Handler) {
        self.state
            .borrow_mut()
            .listeners
            .push((*element, event, Rc::new(RefCell::new(handler))));
    }
}

// =============================================================
// Cookies
// =============================================================

#[derive(Default)]
struct JarState {
    cookies: BTreeMap<String, String>,
    writes: Vec<String>,
}

/// Cookie jar keeping the latest value per name and every raw record written.
#[derive(Clone, Default)]
pub(crate) struct FakeCookies {
    state: Rc<RefCell<JarState>>,
}

impl FakeCookies {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed a cookie with an already-encoded value.
    pub(crate) fn seed(&self, name: &str, encoded: &str) {
        self.state
            .borrow_mut()
            .cookies
            .insert(name.to_owned(), encoded.to_owned());
    }

    /// Seed a cookie with a JSON document, encoding it first.
    pub(crate) fn seed_json(&self, name: &str, json: &str) {
        self.seed(name, &cookie::encode_component(json));
    }

    pub(crate) fn writes(&self) -> Vec<String> {
        self.state.borrow().writes.clone()
    }

    /// Decoded JSON currently stored under `name`.
    pub(crate) fn json(&self, name: &str) -> Option<String> {
        let state = self.state.borrow();
        let encoded = state.cookies.get(name)?;
        Some(cookie::decode_component(encoded).unwrap())
    }

    /// Parsed document currently stored under `name`.
    pub(crate) fn document(&self, name: &str) -> Option<FormDocument> {
        self.json(name).map(|json| FormDocument::from_json(&json).unwrap())
    }
}

impl CookieStore for FakeCookies {
    fn read_all(&self) -> String {
        self.state
            .borrow()
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, record: &str) {
        let mut state = self.state.borrow_mut();
        state.writes.push(record.to_owned());
        let pair = record.split(';').next().unwrap_or_default();
        if let Some((name, value)) = pair.split_once('=') {
            state.cookies.insert(name.to_owned(), value.to_owned());
        }
    }
}

// =============================================================
// Clock
// =============================================================

enum Job {
    Once(Option<Task>),
    Repeating { interval: u32, handler: Rc<RefCell<Handler>> },
}

struct Scheduled {
    due: i64,
    seq: u64,
    job: Job,
}

#[derive(Default)]
struct ClockState {
    now: i64,
    seq: u64,
    queue: Vec<Scheduled>,
}

/// Virtual clock. Time only moves through [`FakeClock::advance`].
#[derive(Clone, Default)]
pub(crate) struct FakeClock {
    state: Rc<RefCell<ClockState>>,
}

impl FakeClock {
    pub(crate) fn starting_at(now_ms: i64) -> Self {
        let clock = Self::default();
        clock.state.borrow_mut().now = now_ms;
        clock
    }

    pub(crate) fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    fn push(&self, delay_ms: u32, job: Job) {
        let mut state = self.state.borrow_mut();
        state.seq += 1;
        let scheduled = Scheduled { due: state.now + i64::from(delay_ms), seq: state.seq, job };
        state.queue.push(scheduled);
    }

    /// Move time forward, running every job that falls due in order.
    pub(crate) fn advance(&self, ms: i64) {
        let target = self.state.borrow().now + ms;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let Some(index) = state
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, job)| job.due <= target)
                    .min_by_key(|(_, job)| (job.due, job.seq))
                    .map(|(index, _)| index)
                else {
                    break;
                };
                let job = state.queue.remove(index);
                state.now = job.due;
                job
            };
            match next.job {
                Job::Once(task) => {
                    if let Some(task) = task {
                        task();
                    }
                }
                Job::Repeating { interval, handler } => {
                    {
                        let mut call = handler.borrow_mut();
                        (*call)();
                    }
                    self.push(interval, Job::Repeating { interval, handler });
                }
            }
        }
        self.state.borrow_mut().now = target;
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        self.state.borrow().now
    }

    fn schedule_once(&self, delay_ms: u32, task: Task) {
        self.push(delay_ms, Job::Once(Some(task)));
    }

    fn schedule_repeating(&self, interval_ms: u32, handler: Handler) {
        self.push(interval_ms, Job::Repeating { interval: interval_ms, handler: Rc::new(RefCell::new(handler)) });
    }
}

// =============================================================
// Harness
// =============================================================

pub(crate) type FakeCache = FormCache<FakeDom, FakeCookies, FakeClock>;

pub(crate) struct Page {
    pub(crate) cache: FakeCache,
    pub(crate) dom: FakeDom,
    pub(crate) cookies: FakeCookies,
    pub(crate) clock: FakeClock,
}

impl Page {
    pub(crate) fn new(config: CacheConfig, dom: FakeDom, cookies: FakeCookies) -> Self {
        let clock = FakeClock::starting_at(0);
        let cache = FormCache::new(config, dom.clone(), cookies.clone(), clock.clone());
        Self { cache, dom, cookies, clock }
    }

    pub(crate) fn with_defaults(dom: FakeDom) -> Self {
        Self::new(CacheConfig::default(), dom, FakeCookies::new())
    }

    /// The persisted document under the configured cookie name.
    pub(crate) fn stored(&self) -> Option<FormDocument> {
        self.cookies.document(&self.cache.config().cookie_name)
    }
}
