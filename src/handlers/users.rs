use super::error::AppResult;
use super::extract::{AuthUser, JsonBody, RequireAdmin};
use super::shared_types::MessageResponse;
use crate::app_state::AppState;
use crate::domain::accounts::{
    self, AuthSession, Credentials, LoginCheck, ProfileUpdate, Registration, StudentDirectory,
};
use crate::domain::user::UserProfile;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// `POST /api/user/register`
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(registration): JsonBody<Registration>,
) -> AppResult<(StatusCode, Json<AuthSession>)> {
    // ---
    let session = accounts::register(
        state.repository().as_ref(),
        state.sessions().as_ref(),
        state.session_ttl(),
        registration,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /api/user/login`
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> AppResult<Json<AuthSession>> {
    // ---
    let session = accounts::login(
        state.repository().as_ref(),
        state.sessions().as_ref(),
        state.session_ttl(),
        credentials,
    )
    .await?;

    Ok(Json(session))
}

/// `POST /api/user/logout`
#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<MessageResponse>> {
    // ---
    accounts::logout(state.sessions().as_ref(), &user.token).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// `GET /api/user/profile`
pub async fn get_profile(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<UserProfile>> {
    // ---
    let profile = accounts::profile(state.repository().as_ref(), &user.user_id).await?;
    Ok(Json(profile))
}

/// `PUT /api/user/profile`
#[tracing::instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> AppResult<Json<AuthSession>> {
    // ---
    let session = accounts::update_profile(
        state.repository().as_ref(),
        state.sessions().as_ref(),
        state.session_ttl(),
        &user.user_id,
        update,
    )
    .await?;

    Ok(Json(session))
}

/// `GET /api/user/check-login/{studentId}`
pub async fn check_login(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<Json<LoginCheck>> {
    // ---
    let check = accounts::check_login(state.repository().as_ref(), &student_id).await?;
    Ok(Json(check))
}

/// `GET /api/user/students`
pub async fn list_students(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<StudentDirectory>> {
    // ---
    let directory = accounts::list_students(state.repository().as_ref()).await?;
    Ok(Json(directory))
}
