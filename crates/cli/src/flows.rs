//! Scripted flow entry points.
//!
//! Each runner connects, drives one flow to completion, closes the browser
//! best-effort, and reports failure through the process exit code.

use fw_driver::DriverConfig;
use fw_driver::Session;
use fw_plur::PlurTester;
use tracing::error;

pub async fn run_invite_flow(config: DriverConfig) -> anyhow::Result<()> {
	let session = Session::connect(config).await?;
	let tester = PlurTester::new(session);

	let outcome = tester.complete_invite_flow().await;
	close_best_effort(tester).await;

	match outcome {
		Ok(true) => {
			println!("Invite flow completed successfully");
			Ok(())
		}
		Ok(false) => anyhow::bail!("invite flow failed"),
		Err(err) => Err(err.into()),
	}
}

pub async fn run_community_creation(config: DriverConfig) -> anyhow::Result<()> {
	let session = Session::connect(config).await?;
	let tester = PlurTester::new(session);

	let outcome = async {
		tester.login_if_needed().await?;
		tester.create_community(None).await
	}
	.await;
	close_best_effort(tester).await;

	match outcome {
		Ok(true) => {
			println!("Community creation succeeded");
			Ok(())
		}
		Ok(false) => anyhow::bail!("community creation failed"),
		Err(err) => Err(err.into()),
	}
}

async fn close_best_effort(tester: PlurTester) {
	if let Err(err) = tester.into_session().close().await {
		error!(error = %err, "error closing session");
	}
}
