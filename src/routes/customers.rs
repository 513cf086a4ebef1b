use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::customers::{CreateCustomerRequest, CustomerList},
    error::AppResult,
    extract::ApiJson,
    middleware::auth::AuthUser,
    response::{ActionResponse, ErrorBody},
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_customers).post(create_customer))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "All customers ordered by name", body = CustomerList),
        (status = 401, description = "No active session", body = ErrorBody)
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<CustomerList>> {
    let resp = customer_service::list_customers(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Customer added", body = ActionResponse),
        (status = 400, description = "Missing name", body = ErrorBody),
        (status = 401, description = "No active session", body = ErrorBody)
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CreateCustomerRequest>,
) -> AppResult<Json<ActionResponse>> {
    let resp = customer_service::create_customer(&state, &user, payload).await?;
    Ok(Json(resp))
}
