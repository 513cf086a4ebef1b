use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, ActiveValue::NotSet,
};
use uuid::Uuid;

use crate::{
    audit,
    config::AdminSeed,
    db::OrmConn,
    dto::auth::LoginRequest,
    entity::{
        admin_sessions::{ActiveModel as SessionActive, Column as SessionCol, Entity as Sessions},
        admin_users::{ActiveModel as AdminActive, Column as AdminCol, Entity as AdminUsers},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::AdminProfile,
    response::ActionResponse,
    state::AppState,
};

/// A session created by a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub session_id: Uuid,
    pub profile: AdminProfile,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn login_admin(state: &AppState, payload: LoginRequest) -> AppResult<LoginSession> {
    let username = payload.username.map(|u| u.trim().to_string()).unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Username and password required".into()));
    }

    let admin = AdminUsers::find()
        .filter(AdminCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;

    let admin = match admin {
        Some(a) => a,
        None => {
            tracing::info!(%username, "login rejected: unknown user");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(&password, &admin.password_hash)? {
        tracing::info!(admin_id = admin.id, "login rejected: bad password");
        return Err(AppError::InvalidCredentials);
    }

    Sessions::delete_many()
        .filter(SessionCol::ExpiresAt.lte(Utc::now()))
        .exec(&state.orm)
        .await?;

    let now = Utc::now();
    let expires_at = Duration::try_hours(state.session.ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set session expiry")))?;

    let session = SessionActive {
        id: Set(Uuid::new_v4()),
        admin_id: Set(admin.id),
        username: Set(admin.username.clone()),
        full_name: Set(admin.full_name.clone()),
        created_at: Set(now.into()),
        expires_at: Set(expires_at.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(admin_id = admin.id, "admin logged in");
    audit::record(
        &state.pool,
        Some(admin.id),
        "admin_login",
        "admin_sessions",
        serde_json::json!({ "admin_id": admin.id }),
    )
    .await;

    Ok(LoginSession {
        session_id: session.id,
        profile: AdminProfile {
            id: admin.id,
            username: admin.username,
            full_name: admin.full_name,
        },
    })
}

/// End the given session if it exists. Logging out without a session is not
/// an error.
pub async fn logout(state: &AppState, session_id: Option<Uuid>) -> AppResult<ActionResponse> {
    if let Some(session_id) = session_id {
        let session = Sessions::find_by_id(session_id).one(&state.orm).await?;
        if let Some(session) = session {
            Sessions::delete_by_id(session.id).exec(&state.orm).await?;
            audit::record(
                &state.pool,
                Some(session.admin_id),
                "admin_logout",
                "admin_sessions",
                serde_json::json!({ "admin_id": session.admin_id }),
            )
            .await;
        }
    }

    Ok(ActionResponse::success("Logged out successfully"))
}

pub async fn find_active_session(
    state: &AppState,
    session_id: Uuid,
) -> AppResult<Option<AuthUser>> {
    let session = Sessions::find_by_id(session_id)
        .filter(SessionCol::ExpiresAt.gt(Utc::now()))
        .one(&state.orm)
        .await?;

    Ok(session.map(|s| AuthUser {
        session_id: s.id,
        admin_id: s.admin_id,
        username: s.username,
        full_name: s.full_name,
    }))
}

pub fn current_profile(user: &AuthUser) -> AdminProfile {
    AdminProfile {
        id: user.admin_id,
        username: user.username.clone(),
        full_name: user.full_name.clone(),
    }
}

/// Insert the configured admin account unless a row with that username
/// already exists. Returns the id of a newly created admin.
pub async fn seed_admin(orm: &OrmConn, seed: &AdminSeed) -> anyhow::Result<Option<i32>> {
    let existing = AdminUsers::find()
        .filter(AdminCol::Username.eq(seed.username.as_str()))
        .one(orm)
        .await?;
    if existing.is_some() {
        tracing::debug!(username = %seed.username, "admin account already present");
        return Ok(None);
    }

    let password = seed
        .password
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("ADMIN_PASSWORD must be set to create the admin account"))?;
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let admin = AdminActive {
        id: NotSet,
        username: Set(seed.username.clone()),
        password_hash: Set(password_hash),
        full_name: Set(seed.full_name.clone()),
        email: Set(Some(seed.email.clone())),
        created_date: NotSet,
    }
    .insert(orm)
    .await?;

    tracing::info!(admin_id = admin.id, username = %admin.username, "admin account created");
    Ok(Some(admin.id))
}
