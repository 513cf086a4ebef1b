use axum::{Router, http::Uri, routing::get};
use tower_http::services::ServeDir;

use crate::{error::AppError, state::AppState};

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod products;
pub mod sales;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/products", products::router())
        .nest("/customers", customers::router())
        .nest("/sales", sales::router())
        .nest("/dashboard", dashboard::router())
}

/// Full application router without the transport layers added in `main`.
pub fn create_app(state: AppState, static_dir: Option<&str>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs());

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.fallback(not_found).with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
