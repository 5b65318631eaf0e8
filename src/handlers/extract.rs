//! Request extractors: bearer-token authentication and JSON/query wrappers
//! that report failures in the API's error format.

use super::error::AppError;
use crate::app_state::AppState;
use crate::domain::{CoreError, RecordId};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// JSON body whose rejections become `400 { "message": ... }`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Query string whose rejections become `400 { "message": ... }`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// The caller, resolved from an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: RecordId,
    pub student_id: String,
    pub is_admin: bool,
    /// The presented token, kept so logout can revoke it.
    pub token: String,
}

impl AuthUser {
    // ---
    /// Students may act only on their own records; admins on anyone's.
    pub fn ensure_self_or_admin(&self, student: &RecordId) -> Result<(), AppError> {
        // ---
        if self.is_admin || &self.user_id == student {
            return Ok(());
        }
        tracing::warn!(caller = %self.user_id, %student, "denied access to another student's records");
        Err(CoreError::Forbidden("Not authorized to access this student's records".into()).into())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // ---
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| CoreError::Unauthorized("Not authorized, no token".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                CoreError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
            })?;

        let info = state
            .sessions()
            .validate(token)
            .await
            .map_err(CoreError::Store)?
            .ok_or_else(|| CoreError::Unauthorized("Not authorized, token failed".into()))?;

        Ok(AuthUser {
            user_id: info.user_id,
            student_id: info.student_id,
            is_admin: info.is_admin,
            token: token.to_string(),
        })
    }
}

/// An authenticated caller with the admin flag set.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // ---
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            tracing::warn!(user_id = %user.user_id, "admin route refused");
            return Err(CoreError::Forbidden("Not authorized as an admin".into()).into());
        }
        Ok(RequireAdmin(user))
    }
}

/// Parse a path segment that must be an internal id.
pub fn record_id(raw: &str) -> Result<RecordId, AppError> {
    // ---
    RecordId::parse(raw)
        .ok_or_else(|| CoreError::Validation(format!("invalid id: {raw:?}")).into())
}
