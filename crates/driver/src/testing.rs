//! Scripted engine backend for tests.
//!
//! [`MockBackend`] answers the page-side scripts from an in-memory DOM
//! snapshot and records every primitive it is asked to perform, so session
//! and flow logic can be exercised without a browser. The snapshot handle
//! can be mutated mid-test to simulate the UI changing between steps.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::PageBackend;
use crate::element::{ElementDescriptor, ElementQuery};
use crate::error::Result;
use crate::js;

/// Everything a mock backend was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
	Goto(String),
	Evaluate(String),
	Scan(Value),
	IdleProbe,
	StructureRead,
	ClipboardWrite(String),
	RendererInfoRead,
	CallFunction(String),
	ClickAt { x: f64, y: f64 },
	ClickSelector(String),
	Fill { selector: String, text: String },
	PressKey(String),
	Screenshot,
	Close,
}

/// Shared view of a mock backend's recorded events.
#[derive(Debug, Clone)]
pub struct EventLog(Arc<Mutex<Vec<BackendEvent>>>);

impl EventLog {
	pub fn snapshot(&self) -> Vec<BackendEvent> {
		self.0.lock().unwrap().clone()
	}

	/// Coordinates of every synthetic pointer click, in dispatch order.
	pub fn pointer_clicks(&self) -> Vec<(f64, f64)> {
		self.snapshot()
			.into_iter()
			.filter_map(|event| match event {
				BackendEvent::ClickAt { x, y } => Some((x, y)),
				_ => None,
			})
			.collect()
	}

	/// Text typed into matching selectors, in dispatch order.
	pub fn fills(&self) -> Vec<(String, String)> {
		self.snapshot()
			.into_iter()
			.filter_map(|event| match event {
				BackendEvent::Fill { selector, text } => Some((selector, text)),
				_ => None,
			})
			.collect()
	}
}

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Engine backend over a scripted DOM snapshot.
pub struct MockBackend {
	elements: Arc<Mutex<Vec<ElementDescriptor>>>,
	idle_answers: Mutex<VecDeque<bool>>,
	structure: Value,
	clipboard: Arc<Mutex<Option<String>>>,
	events: Arc<Mutex<Vec<BackendEvent>>>,
}

impl Default for MockBackend {
	fn default() -> Self {
		Self::new()
	}
}

impl MockBackend {
	pub fn new() -> Self {
		Self {
			elements: Arc::new(Mutex::new(Vec::new())),
			idle_answers: Mutex::new(VecDeque::new()),
			structure: serde_json::json!({ "tag": "BODY", "depth": 0 }),
			clipboard: Arc::new(Mutex::new(None)),
			events: Arc::new(Mutex::new(Vec::new())),
		}
	}

	/// Seeds the DOM snapshot the scan script answers from.
	pub fn with_elements(self, elements: Vec<ElementDescriptor>) -> Self {
		*self.elements.lock().unwrap() = elements;
		self
	}

	/// Scripts answers for consecutive idle probes; once exhausted, the
	/// page reads as idle.
	pub fn with_idle_answers(self, answers: impl IntoIterator<Item = bool>) -> Self {
		*self.idle_answers.lock().unwrap() = answers.into_iter().collect();
		self
	}

	/// Scripts the structure-walk response.
	pub fn with_structure(mut self, structure: Value) -> Self {
		self.structure = structure;
		self
	}

	/// Handle for asserting on (or mutating) the DOM snapshot mid-test.
	pub fn elements_handle(&self) -> Arc<Mutex<Vec<ElementDescriptor>>> {
		Arc::clone(&self.elements)
	}

	/// Handle for asserting on the scripted clipboard.
	pub fn clipboard(&self) -> Arc<Mutex<Option<String>>> {
		Arc::clone(&self.clipboard)
	}

	pub fn events(&self) -> EventLog {
		EventLog(Arc::clone(&self.events))
	}

	fn record(&self, event: BackendEvent) {
		self.events.lock().unwrap().push(event);
	}

	fn scan(&self, query_arg: Option<&Value>) -> Value {
		let query: ElementQuery = query_arg
			.and_then(|value| serde_json::from_value(value.clone()).ok())
			.unwrap_or_default();
		let hits: Vec<ElementDescriptor> = self
			.elements
			.lock()
			.unwrap()
			.iter()
			.filter(|element| matches(element, &query))
			.cloned()
			.collect();
		serde_json::to_value(hits).expect("descriptors serialize")
	}
}

/// Mirror of the scan script's OR semantics: attribute equality for key and
/// widget type, containment for visible text.
fn matches(element: &ElementDescriptor, query: &ElementQuery) -> bool {
	if let Some(key) = &query.key {
		if element.key.as_deref() == Some(key.as_str()) {
			return true;
		}
	}
	if let Some(text) = &query.text {
		if element.text.as_deref().is_some_and(|t| t.contains(text.as_str())) {
			return true;
		}
	}
	if let Some(widget_type) = &query.widget_type {
		if element.widget_type.as_deref() == Some(widget_type.as_str()) {
			return true;
		}
	}
	false
}

#[async_trait]
impl PageBackend for MockBackend {
	async fn goto(&self, url: &str) -> Result<()> {
		self.record(BackendEvent::Goto(url.to_string()));
		Ok(())
	}

	async fn evaluate(&self, expression: &str) -> Result<Value> {
		self.record(BackendEvent::Evaluate(expression.to_string()));
		Ok(Value::Null)
	}

	async fn call_function(&self, declaration: &str, args: Vec<Value>) -> Result<Value> {
		if declaration == js::SCAN_ELEMENTS {
			let query = args.first().cloned().unwrap_or(Value::Null);
			self.record(BackendEvent::Scan(query));
			return Ok(self.scan(args.first()));
		}
		if declaration == js::IDLE_PROBE {
			self.record(BackendEvent::IdleProbe);
			let answer = self.idle_answers.lock().unwrap().pop_front().unwrap_or(true);
			return Ok(Value::Bool(answer));
		}
		if declaration == js::PAGE_STRUCTURE {
			self.record(BackendEvent::StructureRead);
			return Ok(self.structure.clone());
		}
		if declaration == js::SET_CLIPBOARD {
			let text = args
				.first()
				.and_then(|value| value.as_str())
				.unwrap_or_default()
				.to_string();
			self.record(BackendEvent::ClipboardWrite(text.clone()));
			*self.clipboard.lock().unwrap() = Some(text);
			return Ok(Value::Null);
		}
		if declaration == js::RENDERER_INFO {
			self.record(BackendEvent::RendererInfoRead);
			return Ok(serde_json::json!({
				"url": "http://localhost:8080/",
				"userAgent": "mock",
				"viewport": { "width": 1280, "height": 720 },
				"devicePixelRatio": 1.0,
				"hasFlutter": true,
				"renderer": "html",
			}));
		}
		self.record(BackendEvent::CallFunction(declaration.to_string()));
		Ok(Value::Null)
	}

	async fn click_at(&self, x: f64, y: f64) -> Result<()> {
		self.record(BackendEvent::ClickAt { x, y });
		Ok(())
	}

	async fn click_selector(&self, selector: &str) -> Result<()> {
		self.record(BackendEvent::ClickSelector(selector.to_string()));
		Ok(())
	}

	async fn fill(&self, selector: &str, text: &str) -> Result<()> {
		self.record(BackendEvent::Fill {
			selector: selector.to_string(),
			text: text.to_string(),
		});
		Ok(())
	}

	async fn press_key(&self, key: &str) -> Result<()> {
		self.record(BackendEvent::PressKey(key.to_string()));
		Ok(())
	}

	async fn screenshot(&self) -> Result<Vec<u8>> {
		self.record(BackendEvent::Screenshot);
		Ok(PNG_MAGIC.to_vec())
	}

	async fn close(&self) -> Result<()> {
		self.record(BackendEvent::Close);
		Ok(())
	}
}
