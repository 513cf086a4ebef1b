use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    dto::auth::LoginRequest,
    error::AppResult,
    extract::ApiJson,
    middleware::auth::{
        AuthUser, expired_session_cookie, session_cookie, session_id_from_headers,
    },
    models::AdminProfile,
    response::{ActionResponse, ErrorBody},
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = ActionResponse),
        (status = 400, description = "Username or password missing", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let session = auth_service::login_admin(&state, payload).await?;
    let cookie = session_cookie(session.session_id, &state.session);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ActionResponse::success("Login successful")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session ended; cookie cleared", body = ActionResponse)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let resp = auth_service::logout(&state, session_id_from_headers(&headers)).await?;
    let cookie = expired_session_cookie(&state.session);
    Ok(([(header::SET_COOKIE, cookie)], Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current admin", body = AdminProfile),
        (status = 401, description = "No active session", body = ErrorBody)
    ),
    tag = "Auth"
)]
pub async fn me(user: AuthUser) -> Json<AdminProfile> {
    Json(auth_service::current_profile(&user))
}
