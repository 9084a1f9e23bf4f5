//! HTTP response building module
//!
//! Builders for the handful of responses the dispatcher produces. Build
//! failures are logged and degrade to an empty body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde_json::Value;

/// Methods accepted by the request entry point
pub const ALLOWED_METHODS: &str = "GET, HEAD, POST, OPTIONS";

/// Build the legacy "nothing matched" response: 200 with an empty body
pub fn build_empty_response(content_type: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("empty", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build an allowlisted asset response with `ETag`
pub fn build_asset_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("asset", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a JSON response
pub fn build_json_response(value: &Value, is_head: bool) -> Response<Full<Bytes>> {
    let content = value.to_string();
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(204)
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_empty_response_is_success() {
        let response = build_empty_response("text/html; charset=utf-8");
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-length"], "0");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_asset_response_head_keeps_length() {
        let response = build_asset_response(Bytes::from_static(b"body{}"), "text/css", "\"e\"", true);
        assert_eq!(response.headers()["content-type"], "text/css");
        assert_eq!(response.headers()["content-length"], "6");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_json_response() {
        let response = build_json_response(&json!({"module": "packages.php"}), false);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(
            body_bytes(response).await,
            Bytes::from(r#"{"module":"packages.php"}"#)
        );
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_405_response().status(), 405);
        assert_eq!(build_405_response().headers()["allow"], ALLOWED_METHODS);
        assert_eq!(build_413_response().status(), 413);
        assert_eq!(build_options_response().status(), 204);
        assert_eq!(build_304_response("\"x\"").status(), 304);
    }
}
