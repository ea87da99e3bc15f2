use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging; the guard flushes buffered lines on exit
    let _log_guard = almanakka::startup::init_logging()?;

    info!("Starting almanakka");

    // Load configuration
    let config = almanakka::startup::load_config()?;

    // Run the viewer
    almanakka::startup::run(config).await
}
