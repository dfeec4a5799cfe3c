//! Minimal client for the two Bluesky XRPC calls the relay needs: creating a
//! session for a fixed account, and looking up a post thread with the
//! resulting bearer token.

use url::Url;

pub mod auth;
pub mod thread;

pub use auth::{AuthError, Credentials, SessionToken};
pub use thread::{FetchError, ResourceRef, ThreadPayload};

/// The public PDS the relay talks to unless configured otherwise.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

pub(crate) const CREATE_SESSION: &str = "com.atproto.server.createSession";
pub(crate) const GET_POST_THREAD: &str = "app.bsky.feed.getPostThread";

/// Holds the HTTP connection pool and the upstream base URL.
///
/// There is intentionally no session state in here: every thread lookup
/// creates a fresh session.
#[derive(Debug, Clone)]
pub struct BskyClient {
    http: reqwest::Client,
    service: Url,
}

impl BskyClient {
    pub fn new(service: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            service,
        }
    }

    fn xrpc_url(&self, nsid: &str) -> Url {
        let mut url = self.service.clone();

        url.set_path(&format!("/xrpc/{nsid}"));
        url.set_query(None);

        url
    }
}
