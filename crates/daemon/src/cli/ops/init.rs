use clap::Args;
use url::Url;

use fragments_daemon::state::{AppConfig, AppState};
use fragments_daemon::UserConfig;
use store::StoreConfig;

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 8080)]
    pub api_port: u16,

    /// Public base URL used in Location headers (defaults to the request host)
    #[arg(long)]
    pub api_url: Option<Url>,

    /// Keep fragments in memory instead of on disk
    #[arg(long)]
    pub memory: bool,

    /// A user allowed to call the API, as EMAIL:PASSWORD (repeatable)
    #[arg(long = "user", value_parser = parse_user)]
    pub users: Vec<UserConfig>,
}

fn parse_user(value: &str) -> Result<UserConfig, String> {
    match value.split_once(':') {
        Some((email, password)) if !email.trim().is_empty() && !password.is_empty() => {
            UserConfig::new(email.trim(), password).map_err(|e| e.to_string())
        }
        _ => Err("expected EMAIL:PASSWORD".to_string()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] fragments_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let fragments_dir = AppState::fragments_dir(ctx.config_path.clone())?;
        let store = if self.memory {
            StoreConfig::Memory
        } else {
            AppState::local_store_config(&fragments_dir)
        };

        let config = AppConfig {
            api_port: self.api_port,
            api_url: self.api_url.clone(),
            store,
            users: self.users.clone(),
        };

        let state = AppState::init(Some(fragments_dir), Some(config))?;

        let store_str = match &state.config.store {
            StoreConfig::Memory => "memory".to_string(),
            StoreConfig::Durable { sqlite_path, .. } => format!(
                "durable ({})",
                sqlite_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "in-memory sqlite".to_string())
            ),
        };

        let output = format!(
            "Initialized fragments directory at: {}\n\
             - Config: {}\n\
             - Store: {}\n\
             - API port: {}\n\
             - Users: {}",
            state.fragments_dir.display(),
            state.config_path.display(),
            store_str,
            state.config.api_port,
            state.config.users.len()
        );

        Ok(output)
    }
}
