use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::products::{CreateProductRequest, ProductList},
    error::AppResult,
    extract::ApiJson,
    middleware::auth::AuthUser,
    response::{ActionResponse, ErrorBody},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_products).post(create_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products ordered by name", body = ProductList),
        (status = 401, description = "No active session", body = ErrorBody)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ProductList>> {
    let resp = product_service::list_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product added", body = ActionResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorBody),
        (status = 401, description = "No active session", body = ErrorBody)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CreateProductRequest>,
) -> AppResult<Json<ActionResponse>> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}
