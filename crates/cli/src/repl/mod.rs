//! Interactive command loops.
//!
//! Two independent read-eval-print loops share the plumbing here: a
//! blocking-style prompt over tokio stdin, and the renderer banner printed
//! once a session is up. Per-command errors are printed and the loop keeps
//! going; only end-of-input or an explicit exit command ends a loop.

pub mod drive;
pub mod plur;

use std::io::Write as _;

use fw_driver::Session;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

pub(crate) fn prompt() -> std::io::Result<()> {
	print!("\nCommand > ");
	std::io::stdout().flush()
}

pub(crate) fn reader() -> Lines<BufReader<Stdin>> {
	BufReader::new(tokio::io::stdin()).lines()
}

pub(crate) async fn print_renderer_info(session: &Session) {
	match session.renderer_info().await {
		Ok(info) => {
			println!("Target app:");
			println!("  url: {}", info.url);
			println!("  viewport: {}x{} @{}x", info.viewport.width, info.viewport.height, info.device_pixel_ratio);
			println!("  flutter: {}", if info.has_flutter { "detected" } else { "not detected" });
			if let Some(renderer) = &info.renderer {
				println!("  renderer: {renderer}");
			}
		}
		Err(err) => warn!(error = %err, "could not read renderer info"),
	}
}
