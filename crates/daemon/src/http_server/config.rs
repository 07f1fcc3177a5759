use std::net::SocketAddr;

use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // Public base URL for `Location` headers
    pub api_url: Option<Url>,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, api_url: Option<Url>) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, api_url={:?}",
            listen_addr,
            api_url.as_ref().map(Url::as_str)
        );
        Self {
            listen_addr,
            api_url,
            log_level: tracing::Level::INFO,
        }
    }

    /// Absolute URL of a fragment, based on `api_url` or else the request host.
    pub fn fragment_url(&self, host: Option<&str>, id: &str) -> String {
        let base = match (&self.api_url, host) {
            (Some(url), _) => url.as_str().trim_end_matches('/').to_string(),
            (None, Some(host)) => format!("http://{}", host),
            (None, None) => format!("http://{}", self.listen_addr),
        };
        format!("{}/v1/fragments/{}", base, id)
    }
}
