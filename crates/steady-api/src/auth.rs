//! Bearer-token auth: password hashing, session tokens, and the
//! [`CurrentUser`] extractor.
//!
//! `POST /api/auth/login` is a unified login-or-register: an unseen email
//! creates the account, an existing one verifies the password. Sessions are
//! HS256 JWTs carrying the user id in `sub`.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{extract::FromRequestParts, extract::State, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use steady_core::{store::RecoveryStore, user::User};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::Json};

/// How long an issued session token stays valid.
const SESSION_TTL_DAYS: i64 = 30;

// ─── Token config and claims ─────────────────────────────────────────────────

/// Signing material for session tokens.
pub struct TokenConfig {
  pub secret: Vec<u8>,
}

/// JWT claims for a session.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// User UUID, hyphenated.
  pub sub: String,
  pub iat: i64,
  pub exp: i64,
}

/// Sign a session token for `user_id`.
pub fn issue_token(config: &TokenConfig, user_id: Uuid) -> Result<String, ApiError> {
  let now = Utc::now();
  let claims = Claims {
    sub: user_id.hyphenated().to_string(),
    iat: now.timestamp(),
    exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
  };
  encode(
    &Header::new(Algorithm::HS256),
    &claims,
    &EncodingKey::from_secret(&config.secret),
  )
  .map_err(|e| ApiError::Store(Box::new(e)))
}

/// Validate a token and return the user id it was issued for.
/// Expired or tampered tokens are indistinguishable to the caller: 401.
pub fn verify_token(config: &TokenConfig, token: &str) -> Result<Uuid, ApiError> {
  let data = decode::<Claims>(
    token,
    &DecodingKey::from_secret(&config.secret),
    &Validation::new(Algorithm::HS256),
  )
  .map_err(|_| ApiError::Unauthorized)?;

  Uuid::parse_str(&data.claims.sub).map_err(|_| ApiError::Unauthorized)
}

// ─── Password hashing ────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Store(Box::new(std::io::Error::other(e.to_string()))))
}

/// Verify a password against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> Result<(), ApiError> {
  let parsed = PasswordHash::new(phc).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthorized)
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated user id, extracted from the `Authorization: Bearer`
/// header. Present in a handler signature means the request carried a valid
/// token.
pub struct CurrentUser(pub Uuid);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: RecoveryStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header_val = parts
      .headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;

    let token = header_val
      .strip_prefix("Bearer ")
      .ok_or(ApiError::Unauthorized)?;

    let user_id = verify_token(&state.tokens, token)?;
    Ok(CurrentUser(user_id))
  }
}

// ─── Login handler ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub user:        User,
  pub token:       String,
  pub is_new_user: bool,
}

/// `POST /api/auth/login` — body: `{"email":"...","password":"..."}`.
///
/// Unseen email: creates the account and returns `is_new_user: true`.
/// Existing email: verifies the password; a mismatch is 401.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: RecoveryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let email = body.email.trim().to_owned();
  if email.is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest(
      "email and password are required".to_owned(),
    ));
  }

  let existing = state
    .store
    .find_user_by_email(email.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let (user, is_new_user) = match existing {
    Some(stored) => {
      verify_password(&body.password, &stored.password_hash)?;
      (stored.user, false)
    }
    None => {
      let hash = hash_password(&body.password)?;
      let stored = state
        .store
        .create_user(email, hash)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?;
      tracing::info!(user_id = %stored.user.user_id, "registered new account");
      (stored.user, true)
    }
  };

  let token = issue_token(&state.tokens, user.user_id)?;
  Ok(Json(LoginResponse { user, token, is_new_user }))
}
