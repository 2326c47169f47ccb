use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriverError>;

/// Closed error taxonomy for driver operations.
///
/// Expected "not found" conditions are not errors: they surface as
/// [`crate::element::TextClick::NotFound`], empty collections, or `false`
/// returns. Everything here is a genuine failure of the launch, the page,
/// or the engine transport.
#[derive(Debug, Error)]
pub enum DriverError {
	#[error("browser launch failed: {0}")]
	Launch(String),

	#[error("navigation failed: {url}")]
	Navigation {
		url: String,
		#[source]
		source: anyhow::Error,
	},

	#[error("javascript evaluation failed: {0}")]
	JsEval(String),

	#[error("screenshot failed: {path}")]
	Screenshot {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("input dispatch failed: {0}")]
	InputDispatch(String),

	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	#[error(transparent)]
	Engine(#[from] chromiumoxide::error::CdpError),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timeout_display_names_the_condition() {
		let err = DriverError::Timeout {
			ms: 30000,
			condition: "page idle".into(),
		};
		assert_eq!(err.to_string(), "timeout after 30000ms waiting for: page idle");
	}

	#[test]
	fn navigation_display_keeps_the_url() {
		let err = DriverError::Navigation {
			url: "http://localhost:8080".into(),
			source: anyhow::anyhow!("connection refused"),
		};
		assert!(err.to_string().contains("http://localhost:8080"));
	}

	#[test]
	fn io_errors_convert_transparently() {
		let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
		let err: DriverError = io.into();
		assert!(matches!(err, DriverError::Io(_)));
	}
}
