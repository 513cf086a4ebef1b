use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header},
};
use uuid::Uuid;

use crate::{
    config::SessionSettings, error::AppError, services::auth_service, state::AppState,
};

pub const SESSION_COOKIE: &str = "pos_session";

/// An admin with an active session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub session_id: Uuid,
    pub admin_id: i32,
    pub username: String,
    pub full_name: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = session_id_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;

        auth_service::find_active_session(state, session_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Session id from the `pos_session` cookie, falling back to an
/// `Authorization: Bearer` header for non-browser clients.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.trim().to_string())
        });

    let raw = from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
    })?;

    Uuid::parse_str(&raw).ok()
}

pub fn session_cookie(session_id: Uuid, settings: &SessionSettings) -> String {
    let max_age = settings.ttl_hours.saturating_mul(60 * 60);
    with_secure_flag(
        format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"),
        settings,
    )
}

pub fn expired_session_cookie(settings: &SessionSettings) -> String {
    with_secure_flag(
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
        settings,
    )
}

fn with_secure_flag(cookie: String, settings: &SessionSettings) -> String {
    if settings.secure_cookie {
        format!("{cookie}; Secure")
    } else {
        cookie
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn reads_session_from_cookie_among_others() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=en")).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {id}")).unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn malformed_or_missing_session_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("pos_session=not-a-uuid"),
        );
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[test]
    fn cookie_attributes_follow_settings() {
        let id = Uuid::new_v4();
        let settings = SessionSettings {
            ttl_hours: 2,
            secure_cookie: true,
        };
        let cookie = session_cookie(id, &settings);
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={id};")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=7200"));
        assert!(cookie.ends_with("; Secure"));

        let expired = expired_session_cookie(&SessionSettings::default());
        assert!(expired.contains("Max-Age=0"));
        assert!(!expired.contains("Secure"));
    }

    #[test]
    fn oversized_ttl_does_not_overflow_max_age() {
        let settings = SessionSettings {
            ttl_hours: i64::MAX,
            secure_cookie: false,
        };
        let cookie = session_cookie(Uuid::new_v4(), &settings);
        assert!(cookie.contains(&format!("Max-Age={}", i64::MAX)));
    }
}
