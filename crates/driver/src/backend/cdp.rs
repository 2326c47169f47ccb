//! Chrome DevTools Protocol backend over chromiumoxide.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{
	DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
	DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::js_protocol::runtime::{CallArgument, CallFunctionOnParams};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::PageBackend;
use crate::config::DriverConfig;
use crate::error::{DriverError, Result};

/// Real engine backend: one launched Chrome process, one page.
///
/// The CDP event handler runs on its own task for the lifetime of the
/// backend; [`CdpBackend::close`] tears down browser and handler in a
/// best-effort, presence-checked way and may be called more than once.
pub struct CdpBackend {
	page: Page,
	browser: Mutex<Option<Browser>>,
	handler_task: Mutex<Option<JoinHandle<()>>>,
}

impl CdpBackend {
	/// Launches the browser and opens a blank page.
	pub async fn launch(config: &DriverConfig) -> Result<Self> {
		let mut builder = BrowserConfig::builder().window_size(1280, 720);
		if !config.headless {
			builder = builder.with_head();
		}
		if let Some(path) = &config.chrome_executable {
			builder = builder.chrome_executable(path);
		}
		let browser_config = builder.build().map_err(DriverError::Launch)?;

		info!(headless = config.headless, "launching browser");
		let (browser, mut handler) = Browser::launch(browser_config)
			.await
			.map_err(|e| DriverError::Launch(e.to_string()))?;

		// Drive CDP traffic until the connection drops.
		let handler_task = tokio::spawn(async move {
			while let Some(event) = handler.next().await {
				if event.is_err() {
					debug!("cdp handler loop ended");
					break;
				}
			}
		});

		let page = browser.new_page("about:blank").await?;

		Ok(Self {
			page,
			browser: Mutex::new(Some(browser)),
			handler_task: Mutex::new(Some(handler_task)),
		})
	}
}

#[async_trait]
impl PageBackend for CdpBackend {
	async fn goto(&self, url: &str) -> Result<()> {
		self.page.goto(url).await.map(|_| ()).map_err(|e| DriverError::Navigation {
			url: url.to_string(),
			source: anyhow::Error::new(e),
		})
	}

	async fn evaluate(&self, expression: &str) -> Result<Value> {
		let result = self
			.page
			.evaluate(expression)
			.await
			.map_err(|e| DriverError::JsEval(e.to_string()))?;
		Ok(result.value().cloned().unwrap_or(Value::Null))
	}

	async fn call_function(&self, declaration: &str, args: Vec<Value>) -> Result<Value> {
		let arguments: Vec<CallArgument> = args
			.into_iter()
			.map(|value| CallArgument::builder().value(value).build())
			.collect();

		let params = CallFunctionOnParams::builder()
			.function_declaration(declaration)
			.arguments(arguments)
			.return_by_value(true)
			.await_promise(true)
			.build()
			.map_err(DriverError::JsEval)?;

		let result = self
			.page
			.evaluate_function(params)
			.await
			.map_err(|e| DriverError::JsEval(e.to_string()))?;
		Ok(result.value().cloned().unwrap_or(Value::Null))
	}

	async fn click_at(&self, x: f64, y: f64) -> Result<()> {
		let pressed = DispatchMouseEventParams::builder()
			.r#type(DispatchMouseEventType::MousePressed)
			.x(x)
			.y(y)
			.button(MouseButton::Left)
			.click_count(1)
			.build()
			.map_err(DriverError::InputDispatch)?;
		self.page.execute(pressed).await?;

		let released = DispatchMouseEventParams::builder()
			.r#type(DispatchMouseEventType::MouseReleased)
			.x(x)
			.y(y)
			.button(MouseButton::Left)
			.click_count(1)
			.build()
			.map_err(DriverError::InputDispatch)?;
		self.page.execute(released).await?;

		Ok(())
	}

	async fn click_selector(&self, selector: &str) -> Result<()> {
		let element = self.page.find_element(selector).await?;
		element.click().await?;
		Ok(())
	}

	async fn fill(&self, selector: &str, text: &str) -> Result<()> {
		let element = self.page.find_element(selector).await?;
		element.click().await?;
		element.type_str(text).await?;
		Ok(())
	}

	async fn press_key(&self, key: &str) -> Result<()> {
		let down = DispatchKeyEventParams::builder()
			.r#type(DispatchKeyEventType::KeyDown)
			.key(key.to_string())
			.build()
			.map_err(DriverError::InputDispatch)?;
		self.page.execute(down).await?;

		let up = DispatchKeyEventParams::builder()
			.r#type(DispatchKeyEventType::KeyUp)
			.key(key.to_string())
			.build()
			.map_err(DriverError::InputDispatch)?;
		self.page.execute(up).await?;

		Ok(())
	}

	async fn screenshot(&self) -> Result<Vec<u8>> {
		let bytes = self
			.page
			.screenshot(
				ScreenshotParams::builder()
					.format(CaptureScreenshotFormat::Png)
					.full_page(false)
					.build(),
			)
			.await?;
		Ok(bytes)
	}

	async fn close(&self) -> Result<()> {
		if let Some(mut browser) = self.browser.lock().await.take() {
			if let Err(err) = browser.close().await {
				warn!(error = %err, "error closing browser");
			}
		}
		if let Some(task) = self.handler_task.lock().await.take() {
			task.abort();
		}
		Ok(())
	}
}
