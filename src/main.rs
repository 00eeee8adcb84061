use add_numbers_mcp::{config::Config, logging, serve_until, AppState, Shutdown};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let logging = logging::init_logging(&config)?;

    let state = AppState::new();
    info!(
        name = state.server_name,
        version = env!("CARGO_PKG_VERSION"),
        log_file = ?config.log_file,
        "server starting"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(serve_until(
        tokio::io::stdin(),
        tokio::io::stdout(),
        &state,
        interrupted(),
    ));

    // A stdin read in flight on the blocking pool cannot be cancelled.
    runtime.shutdown_background();

    match &result {
        Ok(Shutdown::Interrupted) => info!("session interrupted before end of input"),
        Ok(Shutdown::EndOfInput) => {}
        Err(err) => error!(error = %err, "transport failed"),
    }
    info!("shutdown complete");
    drop(logging);

    result.map(|_| ()).map_err(Into::into)
}

async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
