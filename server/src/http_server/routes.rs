use std::sync::Arc;

use axum::{
    extract::State,
    http::Uri,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bsky::{BskyClient, Credentials, ResourceRef, ThreadPayload};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::{trace::Tracer, ResponseError, ResponseResult};
use crate::AppState;

pub(crate) const ROOT_BANNER: &str = "api.hrbrmstr.dev";

const MALFORMED_PATH: &str = "Bad Request";

/// Body of a successful thread lookup.
#[derive(Debug, Serialize)]
pub(crate) struct ThreadEnvelope {
    message: &'static str,
    data: ThreadPayload,
}

impl ThreadEnvelope {
    pub(crate) fn success(data: ThreadPayload) -> Self {
        Self {
            message: "Success",
            data,
        }
    }
}

pub(crate) fn make_router(app_state: AppState) -> Router {
    let tracer = Tracer;
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(tracer)
        .on_response(tracer);

    Router::new()
        .route("/", get(root))
        .route("/bsky/", get(post_thread))
        .route("/bsky/{*rest}", get(post_thread))
        .layer(trace_layer)
        .with_state(app_state)
}

async fn root() -> &'static str {
    ROOT_BANNER
}

async fn post_thread(
    uri: Uri,
    State(bsky): State<BskyClient>,
    State(credentials): State<Arc<Credentials>>,
) -> ResponseResult {
    let post = parse_post_path(uri.path())
        .ok_or_else(|| ResponseError::bad_request(MALFORMED_PATH))?;

    let thread = bsky.fetch_thread(&post, &credentials).await?;

    Ok(Json(ThreadEnvelope::success(thread)).into_response())
}

/// Splits a decoded `/bsky/{author}/{post}` path. Anything but exactly four
/// `/`-separated segments is rejected; the segments themselves are not checked.
fn parse_post_path(path: &str) -> Option<ResourceRef> {
    let decoded = urlencoding::decode(path).ok()?;
    let segments = decoded.split('/').collect::<Vec<_>>();

    let [_, _, author_id, post_id] = segments.as_slice() else {
        return None;
    };

    Some(ResourceRef::new(*author_id, *post_id))
}

#[cfg(test)]
mod tests {
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http_server::test_helpers::{
        create_test_app, get_request, mount_create_session, response_body_json,
        response_body_string,
    };

    #[test]
    fn test_parse_post_path() {
        assert_eq!(
            parse_post_path("/bsky/did:plc:abc123/3k2yihcrp6f2c"),
            Some(ResourceRef::new("did:plc:abc123", "3k2yihcrp6f2c"))
        );
        assert_eq!(
            parse_post_path("/bsky/hrbrmstr.dev/"),
            Some(ResourceRef::new("hrbrmstr.dev", ""))
        );
        assert_eq!(
            parse_post_path("/bsky/did%3Aplc%3Aabc123/xyz"),
            Some(ResourceRef::new("did:plc:abc123", "xyz"))
        );

        assert_eq!(parse_post_path("/bsky/"), None);
        assert_eq!(parse_post_path("/bsky/only-author"), None);
        assert_eq!(parse_post_path("/bsky/a/b/c"), None);
        assert_eq!(parse_post_path("/bsky/a%2Fb/c"), None);
        assert_eq!(parse_post_path("/bsky/%FF/c"), None);
    }

    #[tokio::test]
    async fn test_root_banner() {
        let mock_server = MockServer::start().await;
        let app = create_test_app(&mock_server.uri());

        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_body_string(response).await, ROOT_BANNER);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let mock_server = MockServer::start().await;
        let app = create_test_app(&mock_server.uri());

        let response = app.oneshot(get_request("/nope")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_segment_count_is_bad_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        for uri in ["/bsky/", "/bsky/only-author", "/bsky/a/b/c", "/bsky/a/b/c/d"] {
            let app = create_test_app(&mock_server.uri());
            let response = app.oneshot(get_request(uri)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(response_body_string(response).await, "Bad Request", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_relays_thread() {
        let mock_server = MockServer::start().await;
        mount_create_session(&mock_server, 200, 1).await;

        Mock::given(method("GET"))
            .and(path("/xrpc/app.bsky.feed.getPostThread"))
            .and(query_param(
                "uri",
                "at://did:plc:abc123/app.bsky.feed.post/3k2yihcrp6f2c",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "thread": { "post": { "uri": "x" } }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let app = create_test_app(&mock_server.uri());
        let response = app
            .oneshot(get_request("/bsky/did:plc:abc123/3k2yihcrp6f2c"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body: serde_json::Value = response_body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "message": "Success",
                "data": { "thread": { "post": { "uri": "x" } } }
            })
        );
    }

    #[test]
    fn test_envelope_puts_message_first() {
        let rendered =
            serde_json::to_string(&ThreadEnvelope::success(serde_json::json!({"thread": {}})))
                .unwrap();

        assert_eq!(rendered, r#"{"message":"Success","data":{"thread":{}}}"#);
    }

    #[tokio::test]
    async fn test_upstream_error_is_bad_request() {
        let mock_server = MockServer::start().await;
        mount_create_session(&mock_server, 200, 1).await;

        Mock::given(method("GET"))
            .and(path("/xrpc/app.bsky.feed.getPostThread"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let app = create_test_app(&mock_server.uri());
        let response = app
            .oneshot(get_request("/bsky/did:plc:abc123/xyz"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_body_string(response).await,
            "get post thread request failed with status code: 500"
        );
    }

    #[tokio::test]
    async fn test_auth_failure_is_bad_request_without_lookup() {
        let mock_server = MockServer::start().await;
        mount_create_session(&mock_server, 401, 1).await;

        Mock::given(method("GET"))
            .and(path("/xrpc/app.bsky.feed.getPostThread"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let app = create_test_app(&mock_server.uri());
        let response = app
            .oneshot(get_request("/bsky/did:plc:abc123/xyz"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_body_string(response).await,
            "auth request failed with status code: 401"
        );
    }

    #[tokio::test]
    async fn test_each_request_authenticates() {
        let mock_server = MockServer::start().await;
        mount_create_session(&mock_server, 200, 2).await;

        Mock::given(method("GET"))
            .and(path("/xrpc/app.bsky.feed.getPostThread"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(2)
            .mount(&mock_server)
            .await;

        let app = create_test_app(&mock_server.uri());
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(get_request("/bsky/did:plc:abc123/xyz"))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        let mock_server = MockServer::start().await;
        let app = create_test_app(&mock_server.uri());

        let request = Request::builder()
            .method("POST")
            .uri("/bsky/did:plc:abc123/xyz")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
