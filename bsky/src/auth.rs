use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{BskyClient, CREATE_SESSION};

/// The fixed account the relay authenticates as.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Bearer token from `createSession`. Only ever lives for a single lookup.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([redacted])")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("auth request failed with status code: {0}")]
    Status(u16),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct CreateSessionInput<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct CreateSessionOutput {
    // A missing token is passed along as an empty bearer; upstream rejects it.
    #[serde(rename = "accessJwt", default)]
    access_jwt: String,
}

impl BskyClient {
    #[instrument(
        name = "BskyClient::authenticate",
        skip_all,
        fields(identifier = %credentials.identifier),
        err
    )]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, AuthError> {
        let body = CreateSessionInput {
            identifier: &credentials.identifier,
            password: &credentials.password,
        };

        let res = self
            .http
            .post(self.xrpc_url(CREATE_SESSION))
            .json(&body)
            .send()
            .await?;

        if res.status() != reqwest::StatusCode::OK {
            return Err(AuthError::Status(res.status().as_u16()));
        }

        let session = res.json::<CreateSessionOutput>().await?;
        if session.access_jwt.is_empty() {
            warn!("createSession succeeded without an accessJwt");
        }

        Ok(SessionToken(session.access_jwt))
    }
}
