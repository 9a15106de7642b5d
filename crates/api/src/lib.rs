//! HTTP API server for recipes and their ingredient costs.
//!
//! Provides REST endpoints for recipe and ingredient management, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get};
use domain::RecipeService;
use metrics_exporter_prometheus::PrometheusHandle;
use recipe_store::RecipeStore;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::recipes::{self, AppState};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: RecipeStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/ping", get(routes::ping::pong))
        .route("/recipe", get(recipes::list::<S>).post(recipes::create::<S>))
        .route(
            "/recipe/{recipeId}",
            get(recipes::get::<S>)
                .post(recipes::add_ingredient::<S>)
                .delete(recipes::delete::<S>),
        )
        .route(
            "/recipe/{recipeId}/ingredient/{ingredientId}",
            delete(recipes::remove_ingredient::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .fallback(error::route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(error::handle_panic))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Creates the application state around the given store.
pub fn create_default_state<S: RecipeStore + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        recipe_service: RecipeService::new(store),
    })
}
