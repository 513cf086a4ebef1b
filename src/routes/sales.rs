use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::sales::{ProcessSaleRequest, SaleList, SaleReceipt, SaleWithItems},
    error::AppResult,
    extract::ApiJson,
    middleware::auth::AuthUser,
    response::ErrorBody,
    services::sale_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales))
        .route("/process", post(process_sale))
        .route("/{id}", get(get_sale))
}

#[utoipa::path(
    post,
    path = "/api/sales/process",
    request_body = ProcessSaleRequest,
    responses(
        (status = 200, description = "Sale recorded and stock decremented", body = SaleReceipt),
        (status = 400, description = "Empty sale, bad quantity or discount", body = ErrorBody),
        (status = 401, description = "No active session", body = ErrorBody),
        (status = 404, description = "Unknown product or customer", body = ErrorBody),
        (status = 409, description = "Insufficient stock; nothing was written", body = ErrorBody)
    ),
    tag = "Sales"
)]
pub async fn process_sale(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<ProcessSaleRequest>,
) -> AppResult<Json<SaleReceipt>> {
    let resp = sale_service::process_sale(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    responses(
        (status = 200, description = "The 50 most recent sales, newest first", body = SaleList),
        (status = 401, description = "No active session", body = ErrorBody)
    ),
    tag = "Sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<SaleList>> {
    let resp = sale_service::list_recent_sales(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    params(
        ("id" = i32, Path, description = "Sale ID")
    ),
    responses(
        (status = 200, description = "Sale with its line items", body = SaleWithItems),
        (status = 401, description = "No active session", body = ErrorBody),
        (status = 404, description = "Sale not found", body = ErrorBody)
    ),
    tag = "Sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<Json<SaleWithItems>> {
    let resp = sale_service::get_sale(&state, id).await?;
    Ok(Json(resp))
}
