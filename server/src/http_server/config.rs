use std::sync::Arc;

use axum::extract::FromRef;
use bsky::{BskyClient, Credentials};

use crate::AppState;

impl FromRef<AppState> for BskyClient {
    fn from_ref(state: &AppState) -> Self {
        state.bsky.clone()
    }
}

impl FromRef<AppState> for Arc<Credentials> {
    fn from_ref(state: &AppState) -> Self {
        state.credentials.clone()
    }
}
