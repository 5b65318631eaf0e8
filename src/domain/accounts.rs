//! Account lifecycle: registration, login, sessions and profile edits.

use super::error::{not_blank, CoreError, CoreResult};
use super::ids::RecordId;
use super::repository::{DuplicateStudentId, Repository};
use super::session_store::{SessionInfo, SessionStore};
use super::user::{AcademicYear, Semester, User, UserProfile};
use crate::auth::password::{hash_password, verify_password};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(custom(function = "not_blank"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub year: AcademicYear,
    pub semester: Semester,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[validate(custom(function = "not_blank"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Set by the admin console; the account must actually be an admin.
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(custom(function = "not_blank"))]
    pub student_id: Option<String>,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
}

/// A profile together with a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCheck {
    pub exists: bool,
    pub message: &'static str,
}

/// Profiles grouped by academic year, then semester.
pub type StudentDirectory = BTreeMap<AcademicYear, BTreeMap<Semester, Vec<UserProfile>>>;

#[tracing::instrument(skip_all, fields(student_id = %registration.student_id))]
pub async fn register(
    repo: &dyn Repository,
    sessions: &dyn SessionStore,
    ttl: Duration,
    registration: Registration,
) -> CoreResult<AuthSession> {
    // ---
    registration.validate()?;
    let student_id = registration.student_id.trim().to_string();

    if repo.get_user_by_student_id(&student_id).await?.is_some() {
        tracing::info!("registration refused, student ID already taken");
        return Err(CoreError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&registration.password)?;
    let user = repo
        .create_user(User::new(
            student_id,
            hash,
            registration.year,
            registration.semester,
            false,
        ))
        .await
        .map_err(|err| conflict_on_duplicate(err, "User already exists"))?;

    tracing::info!(user_id = %user.id, "user registered");
    issue_session(sessions, &user, ttl).await
}

#[tracing::instrument(skip_all, fields(student_id = %credentials.student_id))]
pub async fn login(
    repo: &dyn Repository,
    sessions: &dyn SessionStore,
    ttl: Duration,
    credentials: Credentials,
) -> CoreResult<AuthSession> {
    // ---
    credentials.validate()?;
    let invalid = || CoreError::Unauthorized("Invalid credentials".into());

    let user = repo
        .get_user_by_student_id(credentials.student_id.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&credentials.password, &user.password_hash)? {
        tracing::info!("login refused, wrong password");
        return Err(invalid());
    }

    if credentials.is_admin && !user.is_admin {
        tracing::warn!(user_id = %user.id, "non-admin attempted admin login");
        return Err(CoreError::Forbidden(
            "Access denied. Admin privileges required.".into(),
        ));
    }

    issue_session(sessions, &user, ttl).await
}

pub async fn logout(sessions: &dyn SessionStore, token: &str) -> CoreResult<()> {
    // ---
    sessions.revoke(token).await?;
    Ok(())
}

pub async fn profile(repo: &dyn Repository, user_id: &RecordId) -> CoreResult<UserProfile> {
    // ---
    let user = repo
        .get_user_by_id(user_id)
        .await?
        .ok_or(CoreError::NotFound("user"))?;
    Ok(user.profile())
}

/// Change the student ID and/or password. Every session of the user is
/// revoked, since sessions carry the student ID, and a new one is issued.
#[tracing::instrument(skip(repo, sessions, update))]
pub async fn update_profile(
    repo: &dyn Repository,
    sessions: &dyn SessionStore,
    ttl: Duration,
    user_id: &RecordId,
    update: ProfileUpdate,
) -> CoreResult<AuthSession> {
    // ---
    update.validate()?;
    let mut user = repo
        .get_user_by_id(user_id)
        .await?
        .ok_or(CoreError::NotFound("user"))?;

    if let Some(student_id) = update.student_id.as_deref().map(str::trim) {
        if student_id != user.student_id {
            if let Some(other) = repo.get_user_by_student_id(student_id).await? {
                if other.id != user.id {
                    return Err(CoreError::Conflict("Student ID already in use".into()));
                }
            }
            user.student_id = student_id.to_string();
        }
    }
    if let Some(password) = update.password.as_deref() {
        user.password_hash = hash_password(password)?;
    }
    user.updated_at = Utc::now();

    repo.update_user(&user)
        .await
        .map_err(|err| conflict_on_duplicate(err, "Student ID already in use"))?;
    sessions.revoke_user(&user.id).await?;
    tracing::info!("profile updated");

    issue_session(sessions, &user, ttl).await
}

pub async fn check_login(repo: &dyn Repository, student_id: &str) -> CoreResult<LoginCheck> {
    // ---
    let exists = repo.get_user_by_student_id(student_id).await?.is_some();
    Ok(LoginCheck {
        exists,
        message: if exists {
            "User login exists"
        } else {
            "User login not found"
        },
    })
}

pub async fn list_students(repo: &dyn Repository) -> CoreResult<StudentDirectory> {
    // ---
    let mut directory = StudentDirectory::new();
    for user in repo.list_users().await? {
        directory
            .entry(user.year)
            .or_default()
            .entry(user.semester)
            .or_default()
            .push(user.profile());
    }
    Ok(directory)
}

/// Make sure an admin account with this student ID exists.
///
/// Returns `true` when the account was created. An existing account is left
/// exactly as it is, even when it is not an admin.
pub async fn bootstrap_admin(
    repo: &dyn Repository,
    student_id: &str,
    password: &str,
) -> CoreResult<bool> {
    // ---
    if let Some(existing) = repo.get_user_by_student_id(student_id).await? {
        if !existing.is_admin {
            tracing::warn!(student_id, "bootstrap admin account exists but is not an admin");
        }
        return Ok(false);
    }

    let admin = User::new(
        student_id.to_string(),
        hash_password(password)?,
        AcademicYear::Year1,
        Semester::First,
        true,
    );
    let admin = repo.create_user(admin).await?;
    tracing::info!(user_id = %admin.id, "bootstrap admin created");
    Ok(true)
}

/// A lost race on the unique student ID is a conflict, not a store failure.
fn conflict_on_duplicate(err: anyhow::Error, message: &str) -> CoreError {
    // ---
    if err.downcast_ref::<DuplicateStudentId>().is_some() {
        tracing::info!("student ID taken concurrently");
        return CoreError::Conflict(message.to_string());
    }
    CoreError::Store(err)
}

async fn issue_session(
    sessions: &dyn SessionStore,
    user: &User,
    ttl: Duration,
) -> CoreResult<AuthSession> {
    // ---
    let info = SessionInfo {
        user_id: user.id.clone(),
        student_id: user.student_id.clone(),
        is_admin: user.is_admin,
        expires_at: Utc::now().timestamp() + ttl.as_secs() as i64,
    };
    let token = sessions.create(info, ttl).await?;

    Ok(AuthSession {
        user: user.profile(),
        token,
    })
}
