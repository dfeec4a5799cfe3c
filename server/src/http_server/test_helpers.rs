use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde::de::DeserializeOwned;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{http_server::routes, AppConfig, AppState};

pub fn test_config(service: &str) -> AppConfig {
    AppConfig {
        identifier: "relay.example.com".to_string(),
        password: "app-password".to_string(),
        listen_port: 0,
        service: Url::parse(service).unwrap(),
        shutdown_grace_secs: 1,
    }
}

pub fn create_test_app(service: &str) -> Router {
    routes::make_router(AppState::from_config(&test_config(service)))
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Stubs `createSession`, answering with token `T` and `status`, and expects
/// it to be hit exactly `times` times.
pub async fn mount_create_session(mock_server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(serde_json::json!({ "accessJwt": "T" })),
        )
        .expect(times)
        .mount(mock_server)
        .await;
}

pub async fn response_body_string(response: Response<Body>) -> String {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body_bytes.to_vec()).unwrap()
}

pub async fn response_body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}
