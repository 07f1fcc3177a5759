// Service modules (daemon functionality)
pub mod http_server;
pub mod process;
pub mod service_config;
pub mod service_state;
pub mod users;

// App state (configuration, paths)
pub mod state;

pub use process::{run_service, serve, ServiceError};
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;
pub use state::{AppConfig, AppState, StateError};
pub use users::{UserConfig, UserError, Users};
