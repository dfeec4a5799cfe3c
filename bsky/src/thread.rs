use tracing::{info, instrument};

use crate::{AuthError, BskyClient, Credentials, GET_POST_THREAD};

/// Whatever `getPostThread` returned, relayed without a schema.
pub type ThreadPayload = serde_json::Value;

/// Identifies a post by its author (handle or DID) and record key.
///
/// Neither part is validated or escaped; they are placed into the AT URI as
/// given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub author_id: String,
    pub post_id: String,
}

impl ResourceRef {
    pub fn new(author_id: impl Into<String>, post_id: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            post_id: post_id.into(),
        }
    }

    pub fn uri(&self) -> String {
        format!(
            "at://{}/app.bsky.feed.post/{}",
            self.author_id, self.post_id
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("get post thread request failed with status code: {0}")]
    Status(u16),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl BskyClient {
    /// Authenticates and looks up the thread for `post`.
    ///
    /// A new session is created on every call.
    #[instrument(
        name = "BskyClient::fetch_thread",
        skip_all,
        fields(author_id = %post.author_id, post_id = %post.post_id),
        err
    )]
    pub async fn fetch_thread(
        &self,
        post: &ResourceRef,
        credentials: &Credentials,
    ) -> Result<ThreadPayload, FetchError> {
        let mut url = self.xrpc_url(GET_POST_THREAD);
        url.query_pairs_mut().append_pair("uri", &post.uri());

        let token = self.authenticate(credentials).await?;

        let res = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = res.status().as_u16();
        info!(
            author_id = %post.author_id,
            post_id = %post.post_id,
            status,
            "getPostThread responded"
        );

        if res.status() != reqwest::StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        Ok(res.json::<ThreadPayload>().await?)
    }
}
