pub mod admin;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/admin", admin::router())
        // .nest("/api", api::router()) // disabled until the api has endpoints
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
