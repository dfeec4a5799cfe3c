use std::{fmt, sync::Arc, time::Duration};

use bsky::{BskyClient, Credentials};
use url::Url;

/// Process-wide settings, read once at startup from flags or the environment.
///
/// The identifier and password are not checked here; a bad pair only shows up
/// as a failed `createSession` on the first request.
#[derive(Clone, clap::Args)]
pub struct AppConfig {
    /// bsky.social user id
    #[arg(short, long, env = "BSKY_ID", value_name = "BSKY_ID", default_value = "")]
    pub identifier: String,

    /// bsky.social app password
    #[arg(
        short,
        long,
        env = "BSKY_PW",
        value_name = "BSKY_PW",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// port to listen on
    #[arg(short, long, env = "PORT", value_name = "PORT", default_value_t = 3000)]
    pub listen_port: u16,

    /// base URL of the PDS to authenticate against and query
    #[arg(long, env = "BSKY_SERVICE", default_value = bsky::DEFAULT_SERVICE)]
    pub service: Url,

    /// seconds in-flight requests get to finish after a shutdown signal
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 30)]
    pub shutdown_grace_secs: u64,
}

impl AppConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.identifier, &self.password)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("identifier", &self.identifier)
            .field("listen_port", &self.listen_port)
            .field("service", &self.service.as_str())
            .field("shutdown_grace_secs", &self.shutdown_grace_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub credentials: Arc<Credentials>,
    pub bsky: BskyClient,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            credentials: Arc::new(config.credentials()),
            bsky: BskyClient::new(config.service.clone()),
        }
    }
}
