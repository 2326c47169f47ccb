//! Generic session-driver loop: primitives only, no app knowledge.

use std::path::PathBuf;

use fw_driver::{DriverConfig, Session};

const DEFAULT_SCREENSHOT: &str = "fw_screenshot.png";

const BANNER: &str = "\
========= Flutter Web App Driver =========
  click <text>             Click element with visible text
  type <selector> <text>   Type text into element
  eval <code>              Evaluate script in the page
  screenshot [path]        Capture the viewport
  structure                Print the page structure
  info                     Print renderer diagnostics
  wait                     Wait for the page to go idle
  key <name>               Press a named key
  exit/quit                Leave
==========================================";

pub async fn run(config: DriverConfig) -> anyhow::Result<()> {
	let session = Session::connect(config).await?;
	println!("{BANNER}");
	super::print_renderer_info(&session).await;

	let mut lines = super::reader();
	loop {
		super::prompt()?;
		let Some(line) = lines.next_line().await? else { break };
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		if matches!(line, "exit" | "quit") {
			break;
		}
		match DriveCommand::parse(line) {
			Ok(command) => {
				if let Err(err) = dispatch(&session, command).await {
					eprintln!("error: {err:#}");
				}
			}
			Err(message) => println!("{message}"),
		}
	}

	session.close().await?;
	Ok(())
}

#[derive(Debug, Clone, PartialEq)]
enum DriveCommand {
	Click(String),
	Type { selector: String, text: String },
	Eval(String),
	Screenshot(PathBuf),
	Structure,
	Info,
	Wait,
	Key(String),
	Help,
}

impl DriveCommand {
	fn parse(line: &str) -> Result<Self, String> {
		let (verb, rest) = match line.split_once(' ') {
			Some((verb, rest)) => (verb, rest.trim()),
			None => (line, ""),
		};

		match verb {
			"click" if !rest.is_empty() => Ok(Self::Click(rest.to_string())),
			"click" => Err("Usage: click <text>".into()),
			"type" => match rest.split_once(' ') {
				Some((selector, text)) if !text.trim().is_empty() => Ok(Self::Type {
					selector: selector.to_string(),
					text: text.trim().to_string(),
				}),
				_ => Err("Usage: type <selector> <text>".into()),
			},
			"eval" if !rest.is_empty() => Ok(Self::Eval(rest.to_string())),
			"eval" => Err("Usage: eval <code>".into()),
			"screenshot" => Ok(Self::Screenshot(PathBuf::from(if rest.is_empty() {
				DEFAULT_SCREENSHOT
			} else {
				rest
			}))),
			"structure" => Ok(Self::Structure),
			"info" => Ok(Self::Info),
			"wait" => Ok(Self::Wait),
			"key" if !rest.is_empty() => Ok(Self::Key(rest.to_string())),
			"key" => Err("Usage: key <name>".into()),
			"help" => Ok(Self::Help),
			_ => Err(format!("Unknown command: {line}")),
		}
	}
}

async fn dispatch(session: &Session, command: DriveCommand) -> fw_driver::Result<()> {
	match command {
		DriveCommand::Click(text) => {
			let outcome = session.click_text(&text).await?;
			println!("Click {}", if outcome.clicked() { "succeeded" } else { "failed (no match)" });
		}
		DriveCommand::Type { selector, text } => {
			session.type_text(&selector, &text).await?;
			println!("Typed '{text}' into '{selector}'");
		}
		DriveCommand::Eval(code) => {
			let value = session.evaluate(&code).await?;
			println!("{value}");
		}
		DriveCommand::Screenshot(path) => {
			session.screenshot(&path).await?;
			println!("Screenshot saved to {}", path.display());
		}
		DriveCommand::Structure => {
			let root = session.structure().await?;
			println!("\nApp structure:\n{}", root.render_tree());
		}
		DriveCommand::Info => super::print_renderer_info(session).await,
		DriveCommand::Wait => {
			println!("Waiting for the page to go idle...");
			let budget = session.config().wait.idle_budget;
			let idle = session.wait_for_idle(budget).await?;
			println!("Wait {}", if idle { "completed" } else { "timed out" });
		}
		DriveCommand::Key(key) => {
			session.press_key(&key).await?;
			println!("Pressed '{key}'");
		}
		DriveCommand::Help => println!("{BANNER}"),
	}
	Ok(())
}
