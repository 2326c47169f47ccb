use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Parser, Subcommand};
use fw_driver::DriverConfig;
use url::Url;

/// Root CLI for the Flutter web app driver.
#[derive(Parser, Debug)]
#[command(name = "fw")]
#[command(about = "Drive a running Flutter web app over CDP")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Address of the running app (overrides FW_APP_URL)
	#[arg(long, global = true, value_name = "URL", conflicts_with = "port")]
	pub url: Option<Url>,

	/// Port on localhost serving the app
	#[arg(long, global = true, value_name = "PORT")]
	pub port: Option<u16>,

	/// Launch the browser without a visible window
	#[arg(long, global = true)]
	pub headless: bool,

	/// Explicit Chrome/Chromium executable
	#[arg(long, global = true, value_name = "PATH")]
	pub chrome: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Command {
	/// App-specific interactive loop (default).
	Interactive,
	/// Generic session-driver interactive loop.
	Drive,
	/// Run the end-to-end invite generation flow.
	#[command(alias = "test_invite_flow")]
	TestInviteFlow,
	/// Run the community creation flow.
	#[command(alias = "test_community_creation")]
	TestCommunityCreation,
}

impl Cli {
	/// Driver configuration with flag overrides applied on top of the
	/// environment baseline.
	pub fn driver_config(&self) -> DriverConfig {
		self.apply_to(DriverConfig::from_env())
	}

	fn apply_to(&self, mut config: DriverConfig) -> DriverConfig {
		if let Some(url) = &self.url {
			config.app_url = url.clone();
		} else if let Some(port) = self.port {
			config.set_port(port);
		}
		config.headless = self.headless;
		config.chrome_executable = self.chrome.clone();
		config
	}
}

/// Cargo-style help colors.
fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Cyan.on_default())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_the_interactive_loop() {
		let cli = Cli::parse_from(["fw"]);
		assert!(cli.command.is_none());
		assert_eq!(cli.verbose, 0);
	}

	#[test]
	fn url_flag_overrides_the_app_address() {
		let cli = Cli::parse_from(["fw", "--url", "http://127.0.0.1:4444", "drive"]);
		let config = cli.apply_to(DriverConfig::default());
		assert_eq!(config.app_url.as_str(), "http://127.0.0.1:4444/");
	}

	#[test]
	fn port_flag_rewrites_only_the_port() {
		let cli = Cli::parse_from(["fw", "--port", "9000"]);
		let config = cli.apply_to(DriverConfig::default());
		assert_eq!(config.app_url.as_str(), "http://localhost:9000/");
	}

	#[test]
	fn url_and_port_flags_conflict() {
		let result = Cli::try_parse_from(["fw", "--url", "http://x.test", "--port", "1"]);
		assert!(result.is_err());
	}

	#[test]
	fn headless_and_chrome_flags_land_in_the_config() {
		let cli = Cli::parse_from(["fw", "--headless", "--chrome", "/usr/bin/chromium"]);
		let config = cli.apply_to(DriverConfig::default());
		assert!(config.headless);
		assert_eq!(config.chrome_executable.as_deref(), Some(std::path::Path::new("/usr/bin/chromium")));
	}

	#[test]
	fn underscore_flow_aliases_parse() {
		let cli = Cli::parse_from(["fw", "test_invite_flow"]);
		assert!(matches!(cli.command, Some(Command::TestInviteFlow)));
		let cli = Cli::parse_from(["fw", "test_community_creation"]);
		assert!(matches!(cli.command, Some(Command::TestCommunityCreation)));
	}
}
