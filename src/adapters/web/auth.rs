//! Authentication backend for axum-login plus the signup/login/logout handlers.
//!
//! Accounts live behind [`IdentityPort`]; the session stores only the user id.
//! The session auth hash mixes in the account's token version, so revoking
//! tokens invalidates every live session for that user.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use axum_login::{AuthUser, AuthnBackend, UserId};
use serde::Deserialize;
use serde_json::{json, Value};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::info;

use crate::domain::error::GatewayError;
use crate::domain::user::{normalize_email, UserRecord};
use crate::ports::identity_port::IdentityPort;

use super::{ApiError, AppState};

pub type AuthSession = axum_login::AuthSession<Backend>;

/// Authenticated user as held by the session layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    auth_hash: Vec<u8>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        let mut auth_hash = record.password_hash.into_bytes();
        auth_hash.extend_from_slice(&record.token_version.to_be_bytes());
        Self {
            id: record.id,
            email: record.email,
            auth_hash,
        }
    }
}

impl AuthUser for User {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn session_auth_hash(&self) -> &[u8] {
        &self.auth_hash
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Verifies credentials against accounts in the identity store.
#[derive(Clone)]
pub struct Backend {
    identity: Arc<dyn IdentityPort + Send + Sync>,
}

impl Backend {
    pub fn new(identity: Arc<dyn IdentityPort + Send + Sync>) -> Self {
        Self { identity }
    }
}

impl AuthnBackend for Backend {
    type User = User;
    type Credentials = Credentials;
    type Error = GatewayError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let Some(record) = self.identity.find_by_email(&creds.email)? else {
            return Ok(None);
        };

        let parsed_hash = match PasswordHash::new(&record.password_hash) {
            Ok(h) => h,
            Err(_) => return Ok(None),
        };

        if Argon2::default()
            .verify_password(creds.password.as_bytes(), &parsed_hash)
            .is_ok()
        {
            Ok(Some(record.into()))
        } else {
            Ok(None)
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok(self.identity.find_by_id(user_id)?.map(User::from))
    }
}

pub fn hash_password(password: &str) -> Result<String, GatewayError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| GatewayError::Auth {
            reason: format!("failed to hash password: {}", e),
        })
}

fn session_error(err: axum_login::Error<Backend>) -> ApiError {
    match err {
        axum_login::Error::Backend(e) => e.into(),
        axum_login::Error::Session(e) => GatewayError::Database {
            reason: format!("session store: {}", e),
        }
        .into(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsBody {
    fn validate(self) -> Result<Credentials, GatewayError> {
        let email = normalize_email(&self.email);
        if email.is_empty() || self.password.is_empty() {
            return Err(GatewayError::invalid_request("email and password are required"));
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    mut auth_session: AuthSession,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = body?;
    let creds = body.validate()?;
    let password_hash = hash_password(&creds.password)?;
    let record = state.identity.create_user(&creds.email, &password_hash)?;
    let user = User::from(record);

    auth_session.login(&user).await.map_err(session_error)?;
    info!(user_id = %user.id, "account created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "uid": user.id })),
    ))
}

pub async fn login(
    mut auth_session: AuthSession,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    let creds = body.validate()?;

    let user = match auth_session.authenticate(creds).await.map_err(session_error)? {
        Some(user) => user,
        None => {
            return Err(GatewayError::Auth {
                reason: "invalid email or password".to_string(),
            }
            .into())
        }
    };

    auth_session.login(&user).await.map_err(session_error)?;
    info!(user_id = %user.id, "logged in");
    Ok(Json(json!({ "message": "Login successful", "uid": user.id })))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    mut auth_session: AuthSession,
) -> Result<Json<Value>, ApiError> {
    if let Some(user) = auth_session.user.clone() {
        state.identity.revoke_tokens(&user.id)?;
        info!(user_id = %user.id, "tokens revoked");
    }
    auth_session.logout().await.map_err(session_error)?;
    Ok(Json(json!({ "message": "Logged out" })))
}

/// Id of the logged-in user; protected routes are already gated by the session layer.
pub fn current_user_id(auth_session: &AuthSession) -> Result<String, ApiError> {
    auth_session
        .user
        .as_ref()
        .map(|u| u.id.clone())
        .ok_or_else(ApiError::unauthorized)
}
