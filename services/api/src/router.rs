use axum::{
    Router,
    extract::Request,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::trace::TraceLayer;

use catalog_core::middleware::{X_REQUEST_ID, catch_panic_layer, cors_layer, request_id_layer};

use crate::handlers::{
    auth::{login, register},
    health::{healthz, readyz},
    news::get_news,
    product::{create_product, delete_product, get_product, list_products, update_product},
    user::{get_me, update_me},
};
use crate::state::AppState;

pub fn build_router(state: AppState, cors_origin: Option<&str>) -> Router {
    let http_layers = ServiceBuilder::new()
        .layer(request_id_layer())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request| {
                let request_id = req
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(cors_origin))
        .layer(catch_panic_layer());

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        // Profile
        .route("/api/users", get(get_me).patch(update_me))
        // Products
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        // News
        .route("/api/news", get(get_news))
        .layer(http_layers)
        .with_state(state)
}
