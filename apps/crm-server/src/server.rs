use std::net::SocketAddr;

use anyhow::{anyhow, Result};
use axum::{
    body::Body,
    http::{HeaderName, Request},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::field::Empty;

use contacts::Contacts;

const REQUEST_ID_HEADER: &str = "x-request-id";
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Full HTTP surface: health probe, contacts routes and the shared middleware.
pub fn build_router(contacts: &Contacts) -> Router {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new().route("/health", get(health_check));
    let router = contacts.register_rest(router);

    // The last layer added runs first, so the request id exists before the trace span opens.
    router
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}

/// Bind `host:port` and serve until Ctrl+C or SIGTERM.
pub async fn serve(router: Router, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| anyhow!("Invalid bind address '{}:{}': {}", host, port, e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match wait_for_shutdown().await {
                Ok(()) => tracing::info!("shutdown: signal received"),
                Err(e) => tracing::warn!(error = %e, "shutdown: signal listener failed"),
            }
        })
        .await
        .map_err(|e| anyhow!(e))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            r = tokio::signal::ctrl_c() => r?,
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use contacts::config::ContactsConfig;
    use tower::ServiceExt;

    fn router() -> Router {
        build_router(&Contacts::in_memory(ContactsConfig::default()))
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn client_request_id_is_propagated() {
        let response = router()
            .oneshot(
                Request::get("/contacts")
                    .header(REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let huge = format!(
            r#"{{"first_name":"{}"}}"#,
            "a".repeat(BODY_LIMIT_BYTES + 1)
        );
        let response = router()
            .oneshot(
                Request::post("/contacts")
                    .header("content-type", "application/json")
                    .header("content-length", huge.len())
                    .body(Body::from(huge))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
