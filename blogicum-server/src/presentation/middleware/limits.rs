use std::time::Duration;

use axum::{BoxError, Router, error_handling::HandleErrorLayer, extract::DefaultBodyLimit};
use axum::http::StatusCode;
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tracing::warn;

use crate::infrastructure::settings::Settings;

/// Body size, in-flight request and per-request time caps.
///
/// `Router::layer` clones the stack into every route, so the in-flight cap
/// uses one semaphore shared by all of them.
pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_overload))
                .layer(GlobalConcurrencyLimitLayer::new(
                    settings.http_concurrency_limit,
                ))
                .timeout(Duration::from_secs(settings.http_request_timeout_secs)),
        )
        .layer(DefaultBodyLimit::max(settings.http_request_body_limit_bytes))
}

async fn handle_overload(err: BoxError) -> (StatusCode, &'static str) {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("request timed out");
        (StatusCode::REQUEST_TIMEOUT, "request timed out")
    } else {
        warn!(error = %err, "request rejected by middleware");
        (StatusCode::SERVICE_UNAVAILABLE, "service unavailable")
    }
}
