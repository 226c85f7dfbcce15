use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::Catalog;
use crate::config::Config;

use super::api::visibility as visibility_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub async fn run_server(config: Config, catalog: Catalog) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let state = AppState {
        config: Arc::new(config),
        catalog: Arc::new(catalog),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/visibility", get(visibility_handlers::visibility))
        .route("/api/satellites", get(visibility_handlers::list_satellites))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
