mod telemetry;

use courtside_engine::Application;
use courtside_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("courtside".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context();
    let _app = Application::new(context);

    // The schedulers run until the timer source is stopped; an in-flight
    // pass completes naturally.
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping schedulers");
    Ok(())
}
