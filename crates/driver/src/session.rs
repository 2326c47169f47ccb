//! The session driver: one browser, one page, primitive interactions.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::backend::PageBackend;
use crate::backend::cdp::CdpBackend;
use crate::config::DriverConfig;
use crate::dom::DomNode;
use crate::element::{ElementDescriptor, ElementQuery, Point, TextClick};
use crate::error::{DriverError, Result};
use crate::js;

/// Renderer diagnostics read from the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererInfo {
	pub url: String,
	pub user_agent: String,
	pub viewport: Viewport,
	pub device_pixel_ratio: f64,
	pub has_flutter: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub renderer: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
	pub width: u32,
	pub height: u32,
}

/// Active driver session over a running target app.
///
/// A session owns the engine backend and is the process's single handle on
/// the browser; operations run strictly sequentially. The lifecycle is
/// linear: [`Session::connect`] → operations → [`Session::close`], with
/// close consuming the session.
pub struct Session {
	backend: Box<dyn PageBackend>,
	config: DriverConfig,
}

impl Session {
	/// Launches the browser, navigates to the configured app address, and
	/// waits (bounded by `config.startup_wait`) for the app to go idle.
	///
	/// There is no retry: launch or navigation failures propagate.
	pub async fn connect(config: DriverConfig) -> Result<Self> {
		let backend = CdpBackend::launch(&config).await?;
		let session = Self::with_backend(Box::new(backend), config);

		info!(url = %session.config.app_url, "connecting to target app");
		session.backend.goto(session.config.app_url.as_str()).await?;
		session.wait_for_idle(session.config.startup_wait).await?;
		info!("connected");

		Ok(session)
	}

	/// Wraps an already-running backend. Used by tests and by callers that
	/// manage engine launch themselves; performs no I/O.
	pub fn with_backend(backend: Box<dyn PageBackend>, config: DriverConfig) -> Self {
		Self { backend, config }
	}

	pub fn config(&self) -> &DriverConfig {
		&self.config
	}

	/// Clicks the first element matching a CSS selector.
	pub async fn click(&self, selector: &str) -> Result<()> {
		self.backend.click_selector(selector).await
	}

	/// Types text into the first element matching a CSS selector.
	pub async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
		self.backend.fill(selector, text).await
	}

	/// Evaluates an expression in the page context, returning its result
	/// verbatim.
	pub async fn evaluate(&self, code: &str) -> Result<Value> {
		self.backend.evaluate(code).await
	}

	/// Scans the page for elements matching any of the query's criteria.
	///
	/// Matches come back in DOM traversal order. An empty query returns an
	/// empty collection without touching the engine.
	pub async fn find_elements(&self, query: &ElementQuery) -> Result<Vec<ElementDescriptor>> {
		if query.is_empty() {
			return Ok(Vec::new());
		}
		let args = vec![serde_json::to_value(query)?];
		let value = self.backend.call_function(js::SCAN_ELEMENTS, args).await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Clicks the midpoint of the first element whose visible text contains
	/// `text`.
	///
	/// Returns [`TextClick::NotFound`] (and issues no pointer event) when
	/// nothing matches; a `Clicked` outcome does not verify that the page
	/// reacted.
	pub async fn click_text(&self, text: &str) -> Result<TextClick> {
		let mut hits = self.find_elements(&ElementQuery::text(text)).await?;
		if hits.is_empty() {
			warn!(text, "no element matched visible text");
			return Ok(TextClick::NotFound);
		}
		let descriptor = hits.remove(0);
		let point = descriptor.center();
		self.click_point(point).await?;
		debug!(text, x = point.x, y = point.y, "clicked by text");
		Ok(TextClick::Clicked { descriptor, point })
	}

	/// Dispatches a synthetic click at viewport coordinates.
	pub async fn click_point(&self, point: Point) -> Result<()> {
		self.backend.click_at(point.x, point.y).await
	}

	/// Captures the viewport to a PNG file at `path`.
	pub async fn screenshot(&self, path: &Path) -> Result<()> {
		let bytes = self.backend.screenshot().await?;
		tokio::fs::write(path, bytes)
			.await
			.map_err(|source| DriverError::Screenshot {
				path: path.to_path_buf(),
				source,
			})?;
		info!(path = %path.display(), "screenshot saved");
		Ok(())
	}

	/// Reads the page structure as a tree rooted at `document.body`.
	pub async fn structure(&self) -> Result<DomNode> {
		let value = self.backend.call_function(js::PAGE_STRUCTURE, Vec::new()).await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Dispatches a keyboard event for a named key.
	pub async fn press_key(&self, key: &str) -> Result<()> {
		self.backend.press_key(key).await
	}

	/// Polls the animation/transition idle predicate until it holds or the
	/// budget runs out.
	///
	/// Probe intervals back off per the configured [`crate::WaitPolicy`].
	/// An exhausted budget returns `false`, never an error; engine failures
	/// during a probe still propagate.
	pub async fn wait_for_idle(&self, budget: Duration) -> Result<bool> {
		let deadline = Instant::now() + budget;
		let mut interval = self.config.wait.poll_start;

		loop {
			let idle = self
				.backend
				.call_function(js::IDLE_PROBE, Vec::new())
				.await?
				.as_bool()
				.unwrap_or(false);
			if idle {
				return Ok(true);
			}
			if Instant::now() >= deadline {
				debug!(budget_ms = budget.as_millis() as u64, "idle wait budget exhausted");
				return Ok(false);
			}
			tokio::time::sleep(interval).await;
			interval = (interval * 2).min(self.config.wait.poll_max);
		}
	}

	/// Bounded idle wait used between flow steps, per the configured settle
	/// budget.
	pub async fn settle(&self) -> Result<bool> {
		self.wait_for_idle(self.config.wait.settle).await
	}

	/// Writes text to the system clipboard via the page.
	///
	/// The text travels as a structured call argument, so quotes and
	/// backslashes in it are inert.
	pub async fn set_clipboard(&self, text: &str) -> Result<()> {
		self.backend
			.call_function(js::SET_CLIPBOARD, vec![Value::String(text.to_string())])
			.await?;
		Ok(())
	}

	/// Reads renderer diagnostics from the page.
	pub async fn renderer_info(&self) -> Result<RendererInfo> {
		let value = self.backend.call_function(js::RENDERER_INFO, Vec::new()).await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Releases the page, browser, and engine handles, best effort.
	pub async fn close(self) -> Result<()> {
		self.backend.close().await
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use tempfile::TempDir;

	use super::*;
	use crate::element::BoundingRect;
	use crate::testing::{BackendEvent, MockBackend};

	fn labeled(text: &str, rect: BoundingRect) -> ElementDescriptor {
		ElementDescriptor {
			tag: "FLT-SEMANTICS".into(),
			text: Some(text.into()),
			rect,
			..ElementDescriptor::default()
		}
	}

	fn session_over(mock: MockBackend) -> Session {
		Session::with_backend(Box::new(mock), DriverConfig::default())
	}

	#[tokio::test]
	async fn find_elements_with_empty_query_skips_the_engine() {
		let mock = MockBackend::new();
		let events = mock.events();
		let session = session_over(mock);

		let hits = session.find_elements(&ElementQuery::default()).await.unwrap();
		assert!(hits.is_empty());
		assert!(events.snapshot().is_empty());
	}

	#[tokio::test]
	async fn find_elements_matches_by_key_text_or_type() {
		let mut keyed = labeled("Send", BoundingRect::default());
		keyed.key = Some("send-button".into());
		let mut typed = labeled("", BoundingRect::default());
		typed.widget_type = Some("TextField".into());
		let mock = MockBackend::new().with_elements(vec![
			keyed,
			labeled("Communities", BoundingRect::default()),
			typed,
		]);
		let session = session_over(mock);

		let by_key = session.find_elements(&ElementQuery::key("send-button")).await.unwrap();
		assert_eq!(by_key.len(), 1);
		assert_eq!(by_key[0].key.as_deref(), Some("send-button"));

		let by_text = session.find_elements(&ElementQuery::text("Commun")).await.unwrap();
		assert_eq!(by_text.len(), 1);

		let by_type = session
			.find_elements(&ElementQuery::widget_type("TextField"))
			.await
			.unwrap();
		assert_eq!(by_type.len(), 1);
	}

	#[tokio::test]
	async fn click_text_without_a_match_issues_no_pointer_event() {
		let mock = MockBackend::new().with_elements(vec![labeled(
			"Settings",
			BoundingRect { x: 0.0, y: 0.0, width: 10.0, height: 10.0 },
		)]);
		let events = mock.events();
		let session = session_over(mock);

		let outcome = session.click_text("Login").await.unwrap();
		assert_eq!(outcome, TextClick::NotFound);
		assert!(events.pointer_clicks().is_empty());
	}

	#[tokio::test]
	async fn click_text_hits_the_center_of_the_first_match() {
		let mock = MockBackend::new().with_elements(vec![
			labeled("Communities", BoundingRect { x: 10.0, y: 20.0, width: 100.0, height: 40.0 }),
			labeled("Communities", BoundingRect { x: 500.0, y: 500.0, width: 10.0, height: 10.0 }),
		]);
		let events = mock.events();
		let session = session_over(mock);

		let outcome = session.click_text("Communities").await.unwrap();
		assert!(outcome.clicked());
		assert_eq!(events.pointer_clicks(), vec![(60.0, 40.0)]);
	}

	#[tokio::test(start_paused = true)]
	async fn wait_for_idle_returns_false_on_exhausted_budget() {
		let mock = MockBackend::new().with_idle_answers([false, false, false, false, false]);
		let session = session_over(mock);

		let idle = session.wait_for_idle(Duration::from_millis(300)).await.unwrap();
		assert!(!idle);
	}

	#[tokio::test(start_paused = true)]
	async fn wait_for_idle_returns_true_once_the_page_settles() {
		let mock = MockBackend::new().with_idle_answers([false, false, true]);
		let session = session_over(mock);

		let idle = session.wait_for_idle(Duration::from_secs(30)).await.unwrap();
		assert!(idle);
	}

	#[tokio::test]
	async fn wait_for_idle_returns_true_immediately_when_already_idle() {
		let mock = MockBackend::new();
		let events = mock.events();
		let session = session_over(mock);

		let idle = session.wait_for_idle(Duration::from_secs(30)).await.unwrap();
		assert!(idle);
		assert_eq!(events.snapshot().len(), 1);
	}

	#[tokio::test]
	async fn screenshot_writes_png_bytes_to_the_given_path() {
		let temp = TempDir::new().unwrap();
		let path = temp.path().join("shot.png");
		let mock = MockBackend::new();
		let session = session_over(mock);

		session.screenshot(&path).await.unwrap();
		let bytes = std::fs::read(&path).unwrap();
		assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
	}

	#[tokio::test]
	async fn screenshot_into_a_missing_directory_propagates_io_error() {
		let temp = TempDir::new().unwrap();
		let path = temp.path().join("missing").join("shot.png");
		let session = session_over(MockBackend::new());

		let err = session.screenshot(&path).await.unwrap_err();
		assert!(matches!(err, DriverError::Screenshot { .. }));
	}

	#[tokio::test]
	async fn set_clipboard_passes_text_as_a_structured_argument() {
		let mock = MockBackend::new();
		let clipboard = mock.clipboard();
		let session = session_over(mock);

		let hostile = r#"plur://join?code=");alert(1);//"#;
		session.set_clipboard(hostile).await.unwrap();
		assert_eq!(clipboard.lock().unwrap().as_deref(), Some(hostile));
	}

	#[tokio::test]
	async fn structure_deserializes_the_scripted_tree() {
		let mock = MockBackend::new().with_structure(serde_json::json!({
			"tag": "BODY",
			"depth": 0,
			"children": [{ "tag": "FLT-GLASS-PANE", "depth": 1 }],
		}));
		let session = session_over(mock);

		let root = session.structure().await.unwrap();
		assert_eq!(root.tag, "BODY");
		assert_eq!(root.children.unwrap()[0].tag, "FLT-GLASS-PANE");
	}

	#[tokio::test]
	async fn close_records_a_close_event() {
		let mock = MockBackend::new();
		let events = mock.events();
		let session = session_over(mock);

		session.close().await.unwrap();
		assert_eq!(events.snapshot(), vec![BackendEvent::Close]);
	}
}
