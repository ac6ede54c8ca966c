//! Cookie-backed form state cache for WPForms pages.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to a
//! WPForms form. It watches the form's controls, keeps a flat id → value
//! document of their last committed values, and persists that document in a
//! cookie so a multi-step form survives page reloads. All browser access goes
//! through the traits in [`ports`], so the controller logic runs and is tested
//! natively against an in-memory simulation.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | The [`controller::FormCache`] controller: setup, save and load cycles |
//! | [`doc`] | The cached document and its value type |
//! | [`control`] | Control kinds and their read/write strategies |
//! | [`cookie`] | Cookie record encoding and lookup |
//! | [`ports`] | Storage, DOM, listener and clock capabilities |
//! | [`config`] | Runtime configuration knobs |
//! | [`error`] | Crate error type |
//! | [`consts`] | Plugin conventions and default timings |
//! | `web` | Browser implementations of the ports (`browser` feature) |

pub mod config;
pub mod consts;
pub mod control;
pub mod controller;
pub mod cookie;
pub mod doc;
pub mod error;
pub mod ports;
#[cfg(feature = "browser")]
pub mod web;

#[cfg(test)]
#[path = "fakes_test.rs"]
pub(crate) mod fakes;
