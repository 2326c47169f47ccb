//! App-specific loop over the Plur flows.

use std::path::PathBuf;

use fw_driver::{DriverConfig, Session};
use fw_plur::PlurTester;

const DEFAULT_SCREENSHOT: &str = "plur_screenshot.png";

const BANNER: &str = "\
============= Plur App Driver =============
  login              Dismiss the login screen if present
  communities        Navigate to the communities section
  create [name]      Create a community (random name if omitted)
  invite             Generate an invite link
  join <link>        Join a community from an invite link
  list               List visible communities
  screenshot [path]  Capture the viewport
  exit/quit          Leave
===========================================";

pub async fn run(config: DriverConfig) -> anyhow::Result<()> {
	let session = Session::connect(config).await?;
	println!("{BANNER}");
	super::print_renderer_info(&session).await;
	let tester = PlurTester::new(session);

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
		match PlurCommand::parse(line) {
			Ok(command) => {
				if let Err(err) = dispatch(&tester, command).await {
					eprintln!("error: {err:#}");
				}
			}
			Err(message) => println!("{message}"),
		}
	}

	tester.into_session().close().await?;
	Ok(())
}

#[derive(Debug, Clone, PartialEq)]
enum PlurCommand {
	Login,
	Communities,
	Create(Option<String>),
	Invite,
	Join(String),
	List,
	Screenshot(PathBuf),
	Help,
}

impl PlurCommand {
	fn parse(line: &str) -> Result<Self, String> {
		let (verb, rest) = match line.split_once(' ') {
			Some((verb, rest)) => (verb, rest.trim()),
			None => (line, ""),
		};

		match verb {
			"login" => Ok(Self::Login),
			"communities" => Ok(Self::Communities),
			"create" => Ok(Self::Create((!rest.is_empty()).then(|| rest.to_string()))),
			"invite" => Ok(Self::Invite),
			"join" if !rest.is_empty() => Ok(Self::Join(rest.to_string())),
			"join" => Err("Usage: join <link>".into()),
			"list" => Ok(Self::List),
			"screenshot" => Ok(Self::Screenshot(PathBuf::from(if rest.is_empty() {
				DEFAULT_SCREENSHOT
			} else {
				rest
			}))),
			"help" => Ok(Self::Help),
			_ => Err(format!("Unknown command: {line}")),
		}
	}
}

async fn dispatch(tester: &PlurTester, command: PlurCommand) -> fw_driver::Result<()> {
	match command {
		PlurCommand::Login => {
			let detected = tester.login_if_needed().await?;
			println!(
				"{}",
				if detected { "Login attempt completed" } else { "Already logged in or no login required" }
			);
		}
		PlurCommand::Communities => {
			let ok = tester.navigate_to_communities().await?;
			println!("Navigation {}", if ok { "succeeded" } else { "failed" });
		}
		PlurCommand::Create(name) => {
			let ok = tester.create_community(name.as_deref()).await?;
			println!("Community creation {}", if ok { "succeeded" } else { "failed" });
		}
		PlurCommand::Invite => match tester.generate_invite_link().await? {
			Some(link) => println!("Generated link: {link}"),
			None => println!("Failed to generate invite link"),
		},
		PlurCommand::Join(link) => {
			let ok = tester.paste_invite_join(&link).await?;
			println!("Join {}", if ok { "succeeded" } else { "failed" });
		}
		PlurCommand::List => {
			let communities = tester.visible_communities().await?;
			if communities.is_empty() {
				println!("No communities found");
			} else {
				println!("\nVisible communities:");
				for (i, community) in communities.iter().enumerate() {
					println!("{}. {}", i + 1, community.name);
				}
			}
		}
		PlurCommand::Screenshot(path) => {
			tester.session().screenshot(&path).await?;
			println!("Screenshot saved to {}", path.display());
		}
		PlurCommand::Help => println!("{BANNER}"),
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn create_takes_an_optional_name() {
		assert_eq!(PlurCommand::parse("create").unwrap(), PlurCommand::Create(None));
		assert_eq!(
			PlurCommand::parse("create Reading Club").unwrap(),
			PlurCommand::Create(Some("Reading Club".into()))
		);
	}

	#[test]
	fn join_requires_a_link() {
		assert!(PlurCommand::parse("join").is_err());
		assert_eq!(
			PlurCommand::parse("join plur://join?code=abc").unwrap(),
			PlurCommand::Join("plur://join?code=abc".into())
		);
	}

	#[test]
	fn bare_verbs_parse() {
		assert_eq!(PlurCommand::parse("login").unwrap(), PlurCommand::Login);
		assert_eq!(PlurCommand::parse("communities").unwrap(), PlurCommand::Communities);
		assert_eq!(PlurCommand::parse("invite").unwrap(), PlurCommand::Invite);
		assert_eq!(PlurCommand::parse("list").unwrap(), PlurCommand::List);
	}

	#[test]
	fn screenshot_defaults_to_the_plur_path() {
		assert_eq!(
			PlurCommand::parse("screenshot").unwrap(),
			PlurCommand::Screenshot(PathBuf::from(DEFAULT_SCREENSHOT))
		);
	}
}
