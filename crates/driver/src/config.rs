use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Environment variable overriding the default app address.
pub const APP_URL_ENV: &str = "FW_APP_URL";

const DEFAULT_APP_URL: &str = "http://localhost:8080";

/// Fully owned driver configuration, passed at session construction.
///
/// There are no module-level address constants: the app URL defaults to the
/// standard Flutter web dev-server address, can be overridden by the
/// `FW_APP_URL` environment variable, and on top of that by CLI flags.
#[derive(Debug, Clone)]
pub struct DriverConfig {
	/// Address of the running target application.
	pub app_url: Url,
	/// Whether the browser launches without a visible window.
	///
	/// Defaults to false: this tool is meant to be watched.
	pub headless: bool,
	/// Explicit Chrome/Chromium executable, when autodetection is not wanted.
	pub chrome_executable: Option<PathBuf>,
	/// Budget for the target app to become idle after the initial navigation.
	pub startup_wait: Duration,
	/// Condition-wait policy used by all polling operations.
	pub wait: WaitPolicy,
}

impl Default for DriverConfig {
	fn default() -> Self {
		Self {
			app_url: Url::parse(DEFAULT_APP_URL).expect("default app url parses"),
			headless: false,
			chrome_executable: None,
			startup_wait: Duration::from_secs(2),
			wait: WaitPolicy::default(),
		}
	}
}

impl DriverConfig {
	/// Baseline config with the `FW_APP_URL` override applied when present
	/// and well formed.
	pub fn from_env() -> Self {
		Self::from_env_lookup(|name| std::env::var(name).ok())
	}

	fn from_env_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
		let mut config = Self::default();
		if let Some(url) = get(APP_URL_ENV).and_then(|raw| Url::parse(&raw).ok()) {
			config.app_url = url;
		}
		config
	}

	/// Points the app address at `localhost:<port>`, keeping the scheme.
	pub fn set_port(&mut self, port: u16) {
		let _ = self.app_url.set_host(Some("localhost"));
		let _ = self.app_url.set_port(Some(port));
	}
}

/// Explicit condition-wait policy.
///
/// Polling operations probe the page, sleep, and probe again with the
/// interval doubling from `poll_start` up to `poll_max` until their budget
/// is spent. Fixed sleeps appear nowhere else in the driver.
#[derive(Debug, Clone)]
pub struct WaitPolicy {
	/// First interval between condition probes.
	pub poll_start: Duration,
	/// Upper bound for the backed-off probe interval.
	pub poll_max: Duration,
	/// Budget for flow-level "let the UI settle" waits.
	pub settle: Duration,
	/// Budget for an explicit idle wait (the `wait` command).
	pub idle_budget: Duration,
}

impl Default for WaitPolicy {
	fn default() -> Self {
		Self {
			poll_start: Duration::from_millis(100),
			poll_max: Duration::from_secs(1),
			settle: Duration::from_secs(2),
			idle_budget: Duration::from_secs(30),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config_targets_local_flutter_port() {
		let config = DriverConfig::default();
		assert_eq!(config.app_url.as_str(), "http://localhost:8080/");
		assert!(!config.headless);
	}

	#[test]
	fn env_override_replaces_app_url() {
		let config = DriverConfig::from_env_lookup(|name| {
			(name == APP_URL_ENV).then(|| "http://127.0.0.1:9999".to_string())
		});
		assert_eq!(config.app_url.as_str(), "http://127.0.0.1:9999/");
	}

	#[test]
	fn malformed_env_override_is_ignored() {
		let config = DriverConfig::from_env_lookup(|name| {
			(name == APP_URL_ENV).then(|| "not a url".to_string())
		});
		assert_eq!(config.app_url.as_str(), "http://localhost:8080/");
	}

	#[test]
	fn set_port_rewrites_host_and_port() {
		let mut config = DriverConfig::from_env_lookup(|name| {
			(name == APP_URL_ENV).then(|| "http://10.0.0.5:3000".to_string())
		});
		config.set_port(8081);
		assert_eq!(config.app_url.as_str(), "http://localhost:8081/");
	}

	#[test]
	fn wait_policy_backoff_bounds_are_ordered() {
		let policy = WaitPolicy::default();
		assert!(policy.poll_start < policy.poll_max);
		assert!(policy.settle <= policy.idle_budget);
	}
}
