//! HTTP surface of the storage proxy.
//!
//! | Method | Path     | Success                     | Failure          |
//! |--------|----------|-----------------------------|------------------|
//! | GET    | `/list`  | 200, JSON array of keys     |                  |
//! | GET    | `/{key}` | 200, body + content-type    | 400, 404         |
//! | PUT    | `/{key}` | 201                         | 400, 409         |
//!
//! The key is the first segment of the request path.

use crate::core::filename::check_key;
use crate::core::ConfigProvider;
use crate::domain::ports::ObjectStore;
use crate::utils::error::{ProofError, Result};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const LIST_ROUTE: &str = "list";

pub type SharedStore = Arc<dyn ObjectStore>;

pub fn create_router(store: SharedStore, config: &impl ConfigProvider) -> Result<Router> {
    let cors = cors_layer(config.allowed_origin())?;

    Ok(Router::new()
        .route("/", get(missing_key).put(missing_key))
        .route("/list", get(list_handler).put(reserved_key))
        .route("/{*path}", get(get_handler).put(put_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(store))
}

/// Serves until ctrl-c or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(match origin {
        None => layer.allow_origin(Any),
        Some(origin) => {
            let value =
                HeaderValue::from_str(origin).map_err(|e| ProofError::InvalidConfigValueError {
                    field: "server.allowed_origin".to_string(),
                    value: origin.to_string(),
                    reason: e.to_string(),
                })?;
            layer.allow_origin(value)
        }
    })
}

/// First path segment; `a.svg/extra` addresses `a.svg`.
///
/// `path` is the decoded wildcard and `raw` the request path as sent, so a key
/// carrying an escaped separator (`a%2Fb.svg`) is refused instead of truncated.
fn key_from_path<'a>(path: &'a str, raw: &str) -> Result<&'a str> {
    let raw_segment = raw
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if raw_segment.contains("%2f") || raw_segment.contains("%5c") {
        return Err(ProofError::BadRequest {
            message: "object key must not contain path separators".to_string(),
        });
    }

    let key = path.split('/').next().unwrap_or_default();
    check_key(key)?;
    Ok(key)
}

async fn missing_key() -> Result<()> {
    Err(ProofError::BadRequest {
        message: "missing object key".to_string(),
    })
}

async fn reserved_key() -> Result<()> {
    Err(ProofError::BadRequest {
        message: format!("'{}' is a reserved key", LIST_ROUTE),
    })
}

async fn list_handler(State(store): State<SharedStore>) -> Result<Json<Vec<String>>> {
    let keys = store.list().await?;
    tracing::debug!("Listing {} objects", keys.len());
    Ok(Json(keys))
}

async fn get_handler(
    State(store): State<SharedStore>,
    Path(path): Path<String>,
    uri: Uri,
) -> Result<Response> {
    let key = key_from_path(&path, uri.path())?;
    if key == LIST_ROUTE {
        return list_handler(State(store)).await.map(IntoResponse::into_response);
    }

    let object = store.get(key).await?;
    let content_type = object.content_type_or_default().to_string();
    tracing::debug!("Serving '{}' ({}, {} bytes)", key, content_type, object.bytes.len());

    Ok(([(header::CONTENT_TYPE, content_type)], object.bytes).into_response())
}

async fn put_handler(
    State(store): State<SharedStore>,
    Path(path): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let key = key_from_path(&path, uri.path())?;
    if key == LIST_ROUTE {
        return Err(ProofError::BadRequest {
            message: format!("'{}' is a reserved key", LIST_ROUTE),
        });
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let size = body.len();
    store.put(key, body.to_vec(), content_type).await?;

    tracing::info!("Stored '{}' ({} bytes, {:?})", key, size, content_type);
    Ok((StatusCode::CREATED, Json(json!({ "key": key }))))
}

fn status_for(err: &ProofError) -> StatusCode {
    match err {
        ProofError::BadRequest { .. }
        | ProofError::EmptyInput
        | ProofError::MissingField { .. }
        | ProofError::SelectionFull { .. }
        | ProofError::UnknownStyle { .. }
        | ProofError::IncompleteMonogram => StatusCode::BAD_REQUEST,
        ProofError::NotFound { .. } => StatusCode::NOT_FOUND,
        ProofError::Conflict { .. } => StatusCode::CONFLICT,
        ProofError::UploadFailed { .. } | ProofError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ProofError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {} (category: {:?})", self, self.category());
            self.user_friendly_message()
        } else {
            tracing::warn!("Request rejected with {}: {}", status, self);
            self.to_string()
        };

        (status, Json(json!({ "error": self.kind(), "message": message }))).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_path_uses_first_segment() {
        assert_eq!(key_from_path("a.svg", "/a.svg").unwrap(), "a.svg");
        assert_eq!(
            key_from_path("a.svg/extra/parts", "/a.svg/extra/parts").unwrap(),
            "a.svg"
        );
        assert!(matches!(
            key_from_path("/a.svg", "//a.svg"),
            Err(ProofError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_escaped_separator_is_rejected() {
        assert!(matches!(
            key_from_path("a/b.svg", "/a%2Fb.svg"),
            Err(ProofError::BadRequest { .. })
        ));
        assert!(matches!(
            key_from_path("a\\b.svg", "/a%5cb.svg"),
            Err(ProofError::BadRequest { .. })
        ));
        assert_eq!(
            key_from_path("Jane Doe.svg", "/Jane%20Doe.svg").unwrap(),
            "Jane Doe.svg"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ProofError::Conflict { key: "k".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&ProofError::NotFound { key: "k".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ProofError::Storage { message: "down".into() }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_cors_rejects_invalid_origin() {
        assert!(cors_layer(Some("https://shop.example.com")).is_ok());
        assert!(cors_layer(Some("bad\norigin")).is_err());
    }
}
