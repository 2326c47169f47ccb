//! Engine seam between the session driver and the browser.
//!
//! The session never talks to the automation engine directly; it goes
//! through [`PageBackend`], which the real [`cdp::CdpBackend`] implements
//! over the Chrome DevTools Protocol and the test backend implements over a
//! scripted DOM snapshot.

pub mod cdp;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Primitive page operations the driver consumes.
///
/// Data handed to evaluated functions travels as structured call arguments,
/// never as text spliced into script source.
#[async_trait]
pub trait PageBackend: Send + Sync {
	/// Navigates the page.
	async fn goto(&self, url: &str) -> Result<()>;

	/// Evaluates an expression in the page context, returning its value
	/// verbatim.
	async fn evaluate(&self, expression: &str) -> Result<Value>;

	/// Calls a function declaration in the page context with structured
	/// arguments, awaiting any returned promise.
	async fn call_function(&self, declaration: &str, args: Vec<Value>) -> Result<Value>;

	/// Dispatches a synthetic left-button click at viewport coordinates.
	async fn click_at(&self, x: f64, y: f64) -> Result<()>;

	/// Clicks the first element matching a CSS selector; errors when the
	/// selector matches nothing.
	async fn click_selector(&self, selector: &str) -> Result<()>;

	/// Focuses the first element matching a CSS selector and types into it.
	async fn fill(&self, selector: &str, text: &str) -> Result<()>;

	/// Dispatches a keyboard event for a named key.
	async fn press_key(&self, key: &str) -> Result<()>;

	/// Captures the current viewport as PNG bytes.
	async fn screenshot(&self) -> Result<Vec<u8>>;

	/// Releases engine handles. Idempotent; later calls are no-ops.
	async fn close(&self) -> Result<()>;
}
