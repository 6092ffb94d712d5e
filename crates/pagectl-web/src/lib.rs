#![forbid(unsafe_code)]

//! Browser binding for the pagectl page controller.
//!
//! On `wasm32` targets this crate exports `startPageController`, which scans
//! the live document into a [`Markup`](pagectl_runtime::Markup), wires DOM
//! listeners to [`SiteController::dispatch`](pagectl_runtime::SiteController::dispatch)
//! and applies the returned patches. Timeouts and animation frames are
//! scheduled from the controller's deadlines.
//!
//! The option parsing, selectors and errors compile on every target so they
//! can be tested natively.

pub mod error;
pub mod options;
pub mod selectors;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::WebBindError;
pub use options::InitOptions;

#[cfg(target_arch = "wasm32")]
pub use wasm::{PageController, start_page_controller};
