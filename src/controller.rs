//! The form cache controller.
//!
//! [`FormCache`] owns the in-memory [`FormDocument`] and drives the three
//! cycles against its ports:
//!
//! - **setup**: after a short deferral, restore the cookie onto the form and
//!   wire listeners (control `change` and next-button `click` save, submit
//!   `change` resets); optionally start the autosave timer.
//! - **save**: show the waiting indicators, defer, read every control into the
//!   document, write the cookie, hide the indicators.
//! - **load**: parse the cookie, replace the document, push each entry into the
//!   control with the matching id.
//!
//! The controller is a cheap `Rc` handle; listeners and timers hold clones of
//! it for the lifetime of the page.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CacheConfig;
use crate::control::ControlBinding;
use crate::cookie;
use crate::doc::{FieldValue, FormDocument};
use crate::error::CacheError;
use crate::ports::{Clock, CookieStore, EventKind, Listeners};

struct Inner<D, S, C> {
    config: CacheConfig,
    dom: D,
    store: S,
    clock: C,
    document: RefCell<FormDocument>,
}

/// Cookie-backed cache bound to one form.
pub struct FormCache<D, S, C> {
    inner: Rc<Inner<D, S, C>>,
}

impl<D, S, C> Clone for FormCache<D, S, C> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<D, S, C> FormCache<D, S, C>
where
    D: Listeners + 'static,
    S: CookieStore + 'static,
    C: Clock + 'static,
{
    /// Create a controller with an empty document. Nothing is wired until [`setup`](Self::setup).
    #[must_use]
    pub fn new(config: CacheConfig, dom: D, store: S, clock: C) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                dom,
                store,
                clock,
                document: RefCell::new(FormDocument::new()),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Snapshot of the in-memory document.
    #[must_use]
    pub fn document(&self) -> FormDocument {
        self.inner.document.borrow().clone()
    }

    // --- Setup ---

    /// Start the autosave timer (if enabled) and schedule the deferred wiring.
    pub fn setup(&self) {
        let config = &self.inner.config;
        if config.periodic_save {
            let this = self.clone();
            self.inner
                .clock
                .schedule_repeating(config.save_interval_ms, Box::new(move || this.save_form()));
        }

        let this = self.clone();
        self.inner
            .clock
            .schedule_once(config.setup_delay_ms, Box::new(move || this.wire()));
    }

    fn wire(&self) {
        match self.load_form() {
            Ok(applied) => log::debug!("form cache restored {applied} controls"),
            Err(e) => log::warn!("form cache restore failed: {e}"),
        }
        self.listen_to_controls();
        self.listen_to_next_buttons();
        self.listen_to_submit_button();
    }

    fn listen_to_controls(&self) {
        let dom = &self.inner.dom;
        for element in dom.form_controls() {
            let this = self.clone();
            dom.listen(&element, EventKind::Change, Box::new(move || this.save_form()));
        }
    }

    fn listen_to_next_buttons(&self) {
        let dom = &self.inner.dom;
        for element in dom.next_buttons() {
            let this = self.clone();
            dom.listen(&element, EventKind::Click, Box::new(move || this.save_form()));
        }
    }

    fn listen_to_submit_button(&self) {
        let dom = &self.inner.dom;
        let Some(submit) = dom.submit_button() else {
            log::warn!("form cache found no submit button; cache will survive submission");
            return;
        };
        let this = self.clone();
        dom.listen(
            &submit,
            EventKind::Change,
            Box::new(move || {
                if let Err(e) = this.reset() {
                    log::warn!("form cache reset failed: {e}");
                }
            }),
        );
    }

    // --- Load ---

    /// Replace the document with the cookie's contents and restore the controls.
    ///
    /// Returns the number of controls written. Cached ids with no matching
    /// control in the form are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::MalformedEncoding`] or
    /// [`CacheError::MalformedDocument`] if the cookie cannot be parsed; the
    /// in-memory document is left unchanged in that case.
    pub fn load_form(&self) -> Result<usize, CacheError> {
        let config = &self.inner.config;
        let dom = &self.inner.dom;

        let raw = cookie::find_value(&self.inner.store.read_all(), &config.cookie_name)?;
        let loaded = FormDocument::from_json(&raw)?;
        *self.inner.document.borrow_mut() = loaded.clone();

        let mut applied = 0;
        for (id, value) in loaded.iter() {
            let Some(element) = dom.control_by_id(id) else {
                log::debug!("form cache skipping {id:?}: no such control");
                continue;
            };
            if ControlBinding::new(dom, &element).write(value) {
                applied += 1;
            }
        }
        Ok(applied)
    }

    // --- Save ---

    /// Fire-and-forget save: show indicators now, capture and persist after the save deferral.
    pub fn save_form(&self) {
        self.show_waiting_indicator();

        let this = self.clone();
        self.inner.clock.schedule_once(
            self.inner.config.save_delay_ms,
            Box::new(move || {
                match this.save_now() {
                    Ok(count) => log::debug!("form cache saved {count} controls"),
                    Err(e) => log::warn!("form cache save failed: {e}"),
                }
                this.hide_waiting_indicator();
            }),
        );
    }

    /// Read every control into the document and write the cookie immediately.
    ///
    /// Returns the number of controls with an id that were merged.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Encode`] or [`CacheError::Expiry`] if the cookie
    /// record cannot be built; the document keeps the merged readings.
    pub fn save_now(&self) -> Result<usize, CacheError> {
        let dom = &self.inner.dom;
        let readings: Vec<(String, Option<FieldValue>)> = dom
            .form_controls()
            .iter()
            .map(|element| {
                let binding = ControlBinding::new(dom, element);
                (binding.id(), binding.read())
            })
            .collect();

        let mut merged = 0;
        {
            let mut document = self.inner.document.borrow_mut();
            for (id, value) in readings {
                if document.merge(&id, value) {
                    merged += 1;
                }
            }
        }

        self.persist()?;
        Ok(merged)
    }

    /// Forget everything and persist the empty document.
    ///
    /// # Errors
    ///
    /// Propagates [`CacheError::Encode`] or [`CacheError::Expiry`] from writing the cookie.
    pub fn reset(&self) -> Result<(), CacheError> {
        self.inner.document.borrow_mut().clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), CacheError> {
        let config = &self.inner.config;
        let json = self.inner.document.borrow().to_json()?;
        let record = cookie::encode_record(
            &config.cookie_name,
            &json,
            self.inner.clock.now_ms(),
            config.cookie_lifetime_ms,
        )?;
        self.inner.store.write(&record);
        Ok(())
    }

    // --- Waiting indicators ---

    /// Make every waiting indicator visible.
    pub fn show_waiting_indicator(&self) {
        self.inner
            .dom
            .set_indicators_visible(&self.inner.config.waiting_indicator_selector, true);
    }

    /// Hide every waiting indicator.
    pub fn hide_waiting_indicator(&self) {
        self.inner
            .dom
            .set_indicators_visible(&self.inner.config.waiting_indicator_selector, false);
    }
}
