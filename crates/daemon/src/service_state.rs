use std::sync::Arc;

use store::{Store, StoreError};

use super::service_config::Config;
use super::users::{UserError, Users};

/// Main service state, cloned into every request handler
#[derive(Debug, Clone)]
pub struct State {
    store: Store,
    users: Arc<Users>,
}

impl State {
    pub fn new(store: Store, users: Users) -> Self {
        Self {
            store,
            users: Arc::new(users),
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let store = Store::from_config(&config.store).await?;

        let users = Users::new(&config.users)?;
        if users.is_empty() {
            tracing::warn!("no users configured, every /v1 request will be rejected");
        } else {
            tracing::info!(users = users.len(), "loaded users");
        }

        Ok(Self::new(store, users))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn users(&self) -> Arc<Users> {
        self.users.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Store setup error: {0}")]
    Store(#[from] StoreError),
    #[error("User setup error: {0}")]
    Users(#[from] UserError),
}
