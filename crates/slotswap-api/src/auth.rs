use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use slotswap_core::error::DomainError;
use slotswap_db::Database;
use slotswap_db::models::{UserRow, decode_ts, encode_ts};
use slotswap_types::api::{
    Claims, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    UserResponse,
};

use crate::error::{ApiError, ApiResult, join_error};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub auth: AuthConfig,
}

/// Token issuance settings, built once at startup and injected.
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    // Validate input
    if req.user_name.len() < 3 || req.user_name.len() > 32 {
        return Err(validation("user name must be 3-32 characters"));
    }
    if req.password.len() < 8 {
        return Err(validation("password must be at least 8 characters"));
    }
    if !is_valid_email(&req.email) {
        return Err(validation("invalid email"));
    }

    // Check if the email is taken
    let existing = {
        let state = state.clone();
        let email = req.email.clone();
        tokio::task::spawn_blocking(move || state.db.user_by_email(&email))
            .await
            .map_err(join_error)??
    };
    if existing.is_some() {
        return Err(ApiError::Domain(DomainError::Conflict(
            "a user with this email already exists".to_string(),
        )));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(anyhow!("password hashing failed: {}", e)))?
        .to_string();

    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let row = UserRow {
        id: user_id.to_string(),
        user_name: req.user_name.clone(),
        email: req.email.clone(),
        password: password_hash,
        refresh_token: None,
        created_at: encode_ts(now),
        updated_at: encode_ts(now),
    };

    {
        let state = state.clone();
        tokio::task::spawn_blocking(move || state.db.create_user(&row))
            .await
            .map_err(join_error)??;
    }

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user_id,
            user_name: req.user_name,
            email: req.email,
            created_at: now,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = {
        let state = state.clone();
        let email = req.email.clone();
        tokio::task::spawn_blocking(move || state.db.user_by_email(&email))
            .await
            .map_err(join_error)??
    }
    .ok_or(ApiError::Unauthorized("invalid email or password"))?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::internal(anyhow!("corrupt password hash: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized("invalid email or password"))?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| ApiError::internal(anyhow!("corrupt user id: {}", e)))?;

    let access_token = create_token(
        &state.auth.access_secret,
        user_id,
        &user.user_name,
        state.auth.access_ttl,
    )?;
    let refresh_token = create_token(
        &state.auth.refresh_secret,
        user_id,
        &user.user_name,
        state.auth.refresh_ttl,
    )?;

    // Persist the refresh token for session continuity
    {
        let state = state.clone();
        let token = refresh_token.clone();
        let uid = user.id.clone();
        tokio::task::spawn_blocking(move || {
            state
                .db
                .set_refresh_token(&uid, Some(&token), &encode_ts(Utc::now()))
        })
        .await
        .map_err(join_error)??;
    }

    Ok(Json(LoginResponse {
        user_id,
        user_name: user.user_name,
        access_token,
        refresh_token,
    }))
}

/// Exchange a valid refresh token for a fresh access token. The token may
/// arrive in the Authorization header or the request body.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> ApiResult<Json<RefreshResponse>> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
        .or_else(|| body.and_then(|Json(b)| b.refresh_token))
        .ok_or(ApiError::Unauthorized("refresh token is required"))?;

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.auth.refresh_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized("invalid refresh token"))?;

    let user = {
        let state = state.clone();
        let user_id = token_data.claims.sub.to_string();
        tokio::task::spawn_blocking(move || state.db.user_by_id(&user_id))
            .await
            .map_err(join_error)??
    }
    .ok_or(ApiError::Unauthorized("invalid refresh token"))?;

    // The presented token must match the one stored at login; a logout or
    // a newer login invalidates it.
    if user.refresh_token.as_deref() != Some(token.as_str()) {
        return Err(ApiError::Unauthorized("invalid refresh token"));
    }

    let access_token = create_token(
        &state.auth.access_secret,
        token_data.claims.sub,
        &user.user_name,
        state.auth.access_ttl,
    )?;

    Ok(Json(RefreshResponse { access_token }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    let state2 = state.clone();
    tokio::task::spawn_blocking(move || {
        state2
            .db
            .set_refresh_token(&claims.sub.to_string(), None, &encode_ts(Utc::now()))
    })
    .await
    .map_err(join_error)??;

    Ok(Json(serde_json::json!({ "message": "logged out" })))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<UserResponse>> {
    let user = {
        let state = state.clone();
        let user_id = claims.sub.to_string();
        tokio::task::spawn_blocking(move || state.db.user_by_id(&user_id))
            .await
            .map_err(join_error)??
    }
    .ok_or(ApiError::Domain(DomainError::NotFound(
        "user not found".to_string(),
    )))?;

    Ok(Json(UserResponse {
        id: claims.sub,
        user_name: user.user_name,
        email: user.email,
        created_at: decode_ts(&user.created_at)?,
    }))
}

fn create_token(
    secret: &str,
    user_id: Uuid,
    user_name: &str,
    ttl: Duration,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        user_name: user_name.to_string(),
        exp: (Utc::now() + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

fn validation(msg: &str) -> ApiError {
    ApiError::Domain(DomainError::Validation(msg.to_string()))
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("ann"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann@.com"));
        assert!(!is_valid_email("ann@example."));
    }
}
