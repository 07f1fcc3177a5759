pub mod utils;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::time::timeout;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::http_server::{self, HttpServerError};
use crate::service_state::StateSetupError;
use crate::{ServiceConfig, ServiceState};

/// How long in-flight requests get to finish once shutdown starts.
const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to install signal handlers: {0}")]
    Signals(#[from] std::io::Error),
    #[error("error creating server state: {0}")]
    State(#[from] StateSetupError),
    #[error("API server error: {0}")]
    Api(#[from] HttpServerError),
    #[error("failed to shut down within {} seconds", .0.as_secs())]
    ShutdownTimeout(Duration),
}

/// Initialize logging and the panic handler, and report build info.
/// Returns guards that must be kept alive for the duration of the program.
fn init_logging(
    service_config: &ServiceConfig,
) -> Vec<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::fmt::format::FmtSpan;

    let env_filter = || {
        EnvFilter::builder()
            .with_default_directive(service_config.log_level.into())
            .from_env_lossy()
    };
    let mut guards = Vec::new();

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(env_filter());

    let file_layer = service_config.log_dir.as_ref().map(|log_dir| {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Warning: Failed to create log directory {:?}: {}", log_dir, e);
        }
        let file_appender = tracing_appender::rolling::daily(log_dir, "fragments.log");
        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        guards.push(file_guard);

        tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter())
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

/// Build state and serve the API until SIGINT or SIGTERM.
pub async fn run_service(service_config: &ServiceConfig) -> Result<(), ServiceError> {
    let shutdown_rx = utils::shutdown_signal()?;
    let state = ServiceState::from_config(service_config).await?;

    let api_addr = SocketAddr::from(([0, 0, 0, 0], service_config.api_port));
    let api_config = http_server::Config::new(api_addr, service_config.api_url.clone());
    tracing::info!(
        port = service_config.api_port,
        backend = state.store().backend_name(),
        "Running: fragments API"
    );

    let mut signal_rx = shutdown_rx.clone();
    let api = http_server::run_api(api_config, state, shutdown_rx);
    tokio::pin!(api);

    tokio::select! {
        result = &mut api => return Ok(result?),
        _ = signal_rx.changed() => {}
    }

    match timeout(FINAL_SHUTDOWN_TIMEOUT, api).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ServiceError::ShutdownTimeout(FINAL_SHUTDOWN_TIMEOUT)),
    }
}

/// Set up logging, then run the service to completion.
pub async fn serve(service_config: &ServiceConfig) -> Result<(), ServiceError> {
    let _guards = init_logging(service_config);
    let result = run_service(service_config).await;
    if let Err(e) = &result {
        tracing::error!("{}", e);
    }
    result
}
