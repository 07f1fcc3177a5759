use std::path::PathBuf;

use store::StoreConfig;
use url::Url;

use crate::users::UserConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,
    /// External base URL for `Location` headers, the request host if not set
    pub api_url: Option<Url>,

    // storage configuration
    /// Which backend fragments are stored in
    pub store: StoreConfig,

    // auth
    pub users: Vec<UserConfig>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
