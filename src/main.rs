use anyhow::Result;

use aws_resource_controller::controller;
use aws_resource_controller::runtime::initialize;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the controller runtime
    let init_result = initialize().await?;

    // Run one controller per resource kind; all share the client and exit
    // together on signal.
    tokio::try_join!(
        controller::iam::role::run(init_result.client.clone()),
        controller::iam::user_policy_attachment::run(init_result.client.clone()),
        controller::secretsmanager::secret::run(init_result.client.clone()),
    )?;

    Ok(())
}
