//! Plugin conventions and default timings.

// ── Cookie ──────────────────────────────────────────────────────

/// Default cookie name. The spelling matches cookies already in the wild.
pub const COOKIE_NAME: &str = "wpfromscache";

/// Default cookie lifetime: 360 days in milliseconds.
pub const COOKIE_LIFETIME_MS: u64 = 360 * 24 * 60 * 60 * 1000;

/// Path scope written into every cookie record.
pub const COOKIE_PATH: &str = "/";

// ── Timing ──────────────────────────────────────────────────────

/// Delay between construction and wiring, so the plugin can finish rendering.
pub const SETUP_DELAY_MS: u32 = 200;

/// Delay between a save trigger and reading the controls.
pub const SAVE_DELAY_MS: u32 = 100;

/// Default period of the autosave timer.
pub const SAVE_INTERVAL_MS: u32 = 5000;

// ── WPForms markup ──────────────────────────────────────────────

/// Substring every WPForms form id contains.
pub const FORM_ID_FRAGMENT: &str = "wpforms-form";

/// Exact class attribute of the plugin's "next page" buttons.
pub const NEXT_BUTTON_CLASS: &str = "wpforms-page-button wpforms-page-next";

/// Selector of the page's submit button.
pub const SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";

/// Selector of the elements shown while a save is in flight.
pub const WAITING_INDICATOR_SELECTOR: &str = "#formularTestamentWaiting";

/// Input types whose state is their value string.
pub const TEXT_LIKE_INPUT_TYPES: [&str; 4] = ["text", "number", "tel", "email"];
