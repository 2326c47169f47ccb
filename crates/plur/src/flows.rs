use std::time::{SystemTime, UNIX_EPOCH};

use fw_driver::{ElementDescriptor, ElementQuery, Result, Session, TextClick};
use rand::Rng;
use tracing::{info, warn};

const COMMUNITIES_LABELS: &[&str] = &["Communities", "Groups"];
const CREATE_LABELS: &[&str] = &["Create", "Add"];
const SUBMIT_LABELS: &[&str] = &["Create", "Submit"];
const INVITE_LABELS: &[&str] = &["Invite", "Share"];
const JOIN_LABELS: &[&str] = &["Paste", "Join"];

/// The app's invite-link scheme, doubling as the visible label of the
/// link-type option in the share dialog.
const INVITE_SCHEME: &str = "plur://";

/// A community visible on the current screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityEntry {
	pub name: String,
	pub element: ElementDescriptor,
}

/// Scripted flows against the Plur app.
///
/// Wraps a connected [`Session`]; all state lives in the page.
pub struct PlurTester {
	session: Session,
}

impl PlurTester {
	pub fn new(session: Session) -> Self {
		Self { session }
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Hands the session back, e.g. to close it.
	pub fn into_session(self) -> Session {
		self.session
	}

	/// Dismisses the login screen when one is showing.
	///
	/// Detection is by visible "Login" text. This only clicks the login
	/// affordance and lets the UI settle; credential entry is not part of
	/// the flow. Returns whether a login screen was detected.
	pub async fn login_if_needed(&self) -> Result<bool> {
		let hits = self.session.find_elements(&ElementQuery::text("Login")).await?;
		if hits.is_empty() {
			info!("already logged in or no login required");
			return Ok(false);
		}

		info!("login screen detected");
		self.session.click_text("Login").await?;
		self.session.settle().await?;
		Ok(true)
	}

	/// Navigates to the communities section, falling back from
	/// "Communities" to "Groups". Returns whether either label was hit.
	pub async fn navigate_to_communities(&self) -> Result<bool> {
		if !self.click_first_label(COMMUNITIES_LABELS).await?.clicked() {
			warn!("failed to navigate to communities section");
			return Ok(false);
		}
		self.session.settle().await?;
		Ok(true)
	}

	/// Creates a community, generating a `Test Community NNNN` name when
	/// none is given. Returns whether the whole sequence went through.
	pub async fn create_community(&self, name: Option<&str>) -> Result<bool> {
		let name = name.map(str::to_string).unwrap_or_else(random_community_name);
		info!(name = %name, "creating community");

		// Best effort; the create affordance may be reachable anyway.
		self.navigate_to_communities().await?;

		let mut buttons = self.session.find_elements(&ElementQuery::text(CREATE_LABELS[0])).await?;
		if buttons.is_empty() {
			buttons = self.session.find_elements(&ElementQuery::text(CREATE_LABELS[1])).await?;
		}
		let Some(button) = buttons.first() else {
			warn!("no create affordance found");
			return Ok(false);
		};

		self.session.click_point(button.center()).await?;
		self.session.settle().await?;

		// The dialog's name field is the first text input on the page; there
		// is no label to target it by.
		if let Err(err) = self.session.type_text("input", &name).await {
			warn!(error = %err, "no text input to receive the community name");
			return Ok(false);
		}

		if !self.click_first_label(SUBMIT_LABELS).await?.clicked() {
			warn!(name = %name, "no submit affordance found");
			return Ok(false);
		}
		self.session.settle().await?;
		info!(name = %name, "community created");
		Ok(true)
	}

	/// Opens the first visible community and pulls an invite link out of
	/// its share dialog. Returns the link text, or `None` when any step
	/// finds nothing.
	pub async fn generate_invite_link(&self) -> Result<Option<String>> {
		let communities = self.session.find_elements(&ElementQuery::text("Community")).await?;
		let Some(community) = communities.first() else {
			warn!("no community to invite into");
			return Ok(None);
		};

		self.session.click_point(community.center()).await?;
		self.session.settle().await?;

		if !self.click_first_label(INVITE_LABELS).await?.clicked() {
			warn!("no invite affordance found");
			return Ok(None);
		}
		self.session.settle().await?;

		// Select the app-scheme link type; the dialog may already have it
		// selected, so a miss here is fine.
		self.session.click_text(INVITE_SCHEME).await?;
		self.session.settle().await?;

		let links = self.session.find_elements(&ElementQuery::text(INVITE_SCHEME)).await?;
		let link = links
			.into_iter()
			.next()
			.and_then(|element| element.text)
			.map(|text| text.trim().to_string())
			.filter(|text| !text.is_empty());

		match &link {
			Some(link) => info!(link = %link, "generated invite link"),
			None => warn!("invite dialog produced no link text"),
		}
		Ok(link)
	}

	/// Joins a community from an invite link on the clipboard: writes the
	/// link, returns to the communities section, and clicks the paste/join
	/// affordance.
	pub async fn paste_invite_join(&self, link: &str) -> Result<bool> {
		if link.is_empty() {
			warn!("no invite link provided");
			return Ok(false);
		}

		info!(link = %link, "joining via invite link");
		self.session.set_clipboard(link).await?;
		self.navigate_to_communities().await?;
		self.session.settle().await?;

		if !self.click_first_label(JOIN_LABELS).await?.clicked() {
			warn!("no paste/join affordance found");
			return Ok(false);
		}
		// Joining kicks off a network round trip; give it room.
		self.session.settle().await?;
		Ok(true)
	}

	/// End-to-end scenario: login, create a fresh community, and generate
	/// an invite link for it. Stops and reports at the first failing step.
	pub async fn complete_invite_flow(&self) -> Result<bool> {
		info!("starting invite flow");
		self.login_if_needed().await?;

		let name = timestamped_community_name();
		if !self.create_community(Some(&name)).await? {
			warn!(step = "create", "invite flow aborted");
			return Ok(false);
		}

		let Some(link) = self.generate_invite_link().await? else {
			warn!(step = "invite", "invite flow aborted");
			return Ok(false);
		};

		info!(link = %link, "invite flow complete");
		Ok(true)
	}

	/// Every element currently matching the "Community" label, as
	/// name/descriptor pairs.
	pub async fn visible_communities(&self) -> Result<Vec<CommunityEntry>> {
		self.session.settle().await?;
		let hits = self.session.find_elements(&ElementQuery::text("Community")).await?;
		Ok(hits
			.into_iter()
			.map(|element| CommunityEntry {
				name: element
					.text
					.as_deref()
					.map(str::trim)
					.filter(|name| !name.is_empty())
					.unwrap_or("Unknown")
					.to_string(),
				element,
			})
			.collect())
	}

	/// Clicks the first label in `labels` that matches anything, in order.
	async fn click_first_label(&self, labels: &[&str]) -> Result<TextClick> {
		for label in labels {
			let outcome = self.session.click_text(label).await?;
			if outcome.clicked() {
				return Ok(outcome);
			}
		}
		Ok(TextClick::NotFound)
	}
}

fn random_community_name() -> String {
	let n: u32 = rand::thread_rng().gen_range(1000..10000);
	format!("Test Community {n}")
}

fn timestamped_community_name() -> String {
	let secs = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs();
	format!("Test Community {secs}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn random_names_carry_a_four_digit_suffix() {
		for _ in 0..32 {
			let name = random_community_name();
			let suffix = name.strip_prefix("Test Community ").expect("prefix");
			assert_eq!(suffix.len(), 4);
			let n: u32 = suffix.parse().expect("numeric suffix");
			assert!((1000..10000).contains(&n));
		}
	}

	#[test]
	fn timestamped_names_share_the_prefix() {
		let name = timestamped_community_name();
		let suffix = name.strip_prefix("Test Community ").expect("prefix");
		assert!(suffix.parse::<u64>().is_ok());
	}
}
