//! Runtime configuration for the cache controller.
//!
//! Every field has a default matching the WPForms conventions in
//! [`crate::consts`]. Hosts override individual fields by passing a partial
//! JSON object; missing fields keep their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::CacheError;

/// Knobs controlling naming, timing and element discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Name of the cookie holding the document.
    pub cookie_name: String,
    /// Cookie lifetime in milliseconds from the moment of each save.
    pub cookie_lifetime_ms: u64,
    /// Whether a repeating timer saves the form independently of user input.
    pub periodic_save: bool,
    /// Period of the autosave timer in milliseconds.
    pub save_interval_ms: u32,
    /// CSS selector of the waiting indicators toggled during a save.
    pub waiting_indicator_selector: String,
    /// Delay between [`setup`](crate::controller::FormCache::setup) and wiring.
    pub setup_delay_ms: u32,
    /// Delay between a save trigger and reading the controls.
    pub save_delay_ms: u32,
    /// Substring of the id of the form to bind to.
    pub form_id_fragment: String,
    /// Exact class attribute of "next page" buttons.
    pub next_button_class: String,
    /// CSS selector of the submit button.
    pub submit_selector: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cookie_name: consts::COOKIE_NAME.to_owned(),
            cookie_lifetime_ms: consts::COOKIE_LIFETIME_MS,
            periodic_save: false,
            save_interval_ms: consts::SAVE_INTERVAL_MS,
            waiting_indicator_selector: consts::WAITING_INDICATOR_SELECTOR.to_owned(),
            setup_delay_ms: consts::SETUP_DELAY_MS,
            save_delay_ms: consts::SAVE_DELAY_MS,
            form_id_fragment: consts::FORM_ID_FRAGMENT.to_owned(),
            next_button_class: consts::NEXT_BUTTON_CLASS.to_owned(),
            submit_selector: consts::SUBMIT_SELECTOR.to_owned(),
        }
    }
}

impl CacheConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfig`] if the JSON does not describe a
    /// configuration object or if [`validate`](Self::validate) rejects it.
    pub fn from_json(raw: &str) -> Result<Self, CacheError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| CacheError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values that would otherwise produce broken cookies or timers.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.cookie_name.trim().is_empty() {
            return Err(CacheError::InvalidConfig("cookie_name must not be empty".to_owned()));
        }
        if self
            .cookie_name
            .chars()
            .any(|c| matches!(c, ';' | '=' | ',') || c.is_whitespace())
        {
            return Err(CacheError::InvalidConfig(format!(
                "cookie_name {:?} contains a reserved character",
                self.cookie_name
            )));
        }
        if self.waiting_indicator_selector.trim().is_empty() {
            return Err(CacheError::InvalidConfig(
                "waiting_indicator_selector must not be empty".to_owned(),
            ));
        }
        if self.periodic_save && self.save_interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "save_interval_ms must be positive when periodic_save is on".to_owned(),
            ));
        }
        Ok(())
    }

    /// CSS selector locating the bound form.
    #[must_use]
    pub fn form_selector(&self) -> String {
        format!("form[id*=\"{}\"]", self.form_id_fragment)
    }

    /// CSS selector locating the "next page" buttons by exact class value.
    #[must_use]
    pub fn next_button_selector(&self) -> String {
        format!("button[class=\"{}\"]", self.next_button_class)
    }
}
