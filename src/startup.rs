use crate::config::Config;
use crate::error::Error;
use std::fs;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration.
///
/// Log lines go to a file rather than stdout, which belongs to the
/// terminal UI. The returned guard must stay alive for the duration of
/// the program so buffered lines are flushed.
pub fn init_logging() -> miette::Result<WorkerGuard> {
    fs::create_dir_all("config").ok();
    let file_appender = tracing_appender::rolling::never("config", "almanakka.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(guard)
}

/// Load and validate the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Run the viewer until the user quits
pub async fn run(config: Config) -> miette::Result<()> {
    info!("Starting terminal UI");
    crate::ui::run(config).await?;
    info!("Terminal UI exited");
    Ok(())
}
