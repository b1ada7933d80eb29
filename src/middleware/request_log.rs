use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Level;

const BODY_PREVIEW_CHARS: usize = 80;

/// Logs one line per `/api` request once the response is ready. At `debug`
/// the response body is buffered and a short preview is logged as well.
pub async fn request_log_middleware(req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if !is_api_path(&path) {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let started = Instant::now();
    let response = next.run(req).await;
    let duration_ms = started.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        tracing::warn!(%method, %path, status, duration_ms, "api request");
    } else {
        tracing::info!(%method, %path, status, duration_ms, "api request");
    }

    if tracing::enabled!(Level::DEBUG) {
        return log_body_preview(response, &path).await;
    }
    response
}

async fn log_body_preview(response: Response, path: &str) -> Response {
    let (parts, body) = response.into_parts();
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            tracing::debug!(%path, body = %body_preview(&bytes), "api response body");
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            tracing::warn!(error = %err, %path, "failed to buffer response body");
            Response::from_parts(parts, Body::empty())
        }
    }
}

fn body_preview(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.chars().count() <= BODY_PREVIEW_CHARS {
        return text.into_owned();
    }
    let mut preview: String = text.chars().take(BODY_PREVIEW_CHARS - 1).collect();
    preview.push('…');
    preview
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_api_paths_are_logged() {
        assert!(is_api_path("/api/traffic"));
        assert!(is_api_path("/api"));
        assert!(!is_api_path("/apiary"));
        assert!(!is_api_path("/health"));
    }

    #[test]
    fn test_body_preview_truncates_long_bodies() {
        let short = br#"{"message":"Not found"}"#;
        assert_eq!(body_preview(short), r#"{"message":"Not found"}"#);

        let long = "x".repeat(200);
        let preview = body_preview(long.as_bytes());
        assert_eq!(preview.chars().count(), BODY_PREVIEW_CHARS);
        assert!(preview.ends_with('…'));
    }

    #[tokio::test]
    async fn test_body_preview_keeps_response_body() {
        let response = Response::new(Body::from(r#"[{"month":7}]"#));
        let response = log_body_preview(response, "/api/traffic").await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"[{"month":7}]"#);
    }
}
