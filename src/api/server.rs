//! Axum server setup and router assembly.

use crate::api::routes::report;
use crate::api::state::AppState;
use crate::cf::CloudFoundryApi;
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
};
use tower_http::trace::TraceLayer;

async fn log_request(req: Request, next: Next) -> Response {
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.uri().path());
    log::info!("{} {}", req.method(), path);
    next.run(req).await
}

/// Create the router. There is a single handler: every method and path
/// reaches [`report::report_environment`].
pub fn create_router<C: CloudFoundryApi + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .fallback(report::report_environment::<C>)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
