use axum::{middleware, routing::get, Router};

use super::{handlers, state::AppState};

/// Build the application router
///
/// Every route except `/` needs the vector store and sits behind the
/// readiness check.
pub fn router(state: AppState) -> Router {
    let store_routes = Router::new()
        .route("/load-data", get(handlers::load_data))
        .route("/search", get(handlers::search))
        .route("/search/filter", get(handlers::search_with_filter))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::require_store_ready,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .merge(store_routes)
        .with_state(state)
}
