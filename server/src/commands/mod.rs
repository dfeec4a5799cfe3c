use clap::Subcommand;
use color_eyre::Result;

use self::fetch::FetchThread;
use crate::AppConfig;

pub(crate) mod fetch;

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the HTTP relay (the default)
    Serve,
    /// Look up one thread with the configured account and print it
    Fetch(FetchThread),
}

impl Default for Command {
    fn default() -> Self {
        Self::Serve
    }
}

impl Command {
    pub(crate) async fn run(&self, config: &AppConfig) -> Result<()> {
        match &self {
            Command::Serve => crate::http_server::cmd::serve(config).await,
            Command::Fetch(cmd) => cmd.fetch_thread(config).await,
        }
    }
}
