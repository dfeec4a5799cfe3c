use bsky::ResourceRef;
use clap::Args;
use color_eyre::{eyre::Context, Result};

use crate::{http_server::ThreadEnvelope, AppConfig, AppState};

#[derive(Args, Debug)]
pub(crate) struct FetchThread {
    /// handle or DID of the post's author
    pub author_id: String,
    /// record key of the post
    pub post_id: String,
}

impl FetchThread {
    pub(crate) async fn fetch_thread(&self, config: &AppConfig) -> Result<()> {
        let rendered = self.render_thread(config).await?;
        println!("{rendered}");

        Ok(())
    }

    /// Looks the thread up and renders the same envelope the HTTP route returns.
    async fn render_thread(&self, config: &AppConfig) -> Result<String> {
        let state = AppState::from_config(config);
        let post = ResourceRef::new(&self.author_id, &self.post_id);

        let thread = state.bsky.fetch_thread(&post, &state.credentials).await?;

        serde_json::to_string_pretty(&ThreadEnvelope::success(thread))
            .wrap_err("Failed to render thread as JSON")
    }
}
