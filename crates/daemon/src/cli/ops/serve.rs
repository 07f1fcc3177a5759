use clap::Args;
use url::Url;

use fragments_daemon::state::AppState;
use fragments_daemon::{serve, ServiceConfig, ServiceError};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Override the public base URL (default from config)
    #[arg(long)]
    pub api_url: Option<Url>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Default log level, RUST_LOG takes precedence
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("state error: {0}")]
    StateError(#[from] fragments_daemon::state::StateError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let config = ServiceConfig {
            api_port: self.api_port.unwrap_or(state.config.api_port),
            api_url: self.api_url.clone().or(state.config.api_url),
            store: state.config.store,
            users: state.config.users,
            log_level: self.log_level,
            log_dir: self.log_dir.clone(),
        };

        serve(&config).await?;
        Ok("service ended".to_string())
    }
}
