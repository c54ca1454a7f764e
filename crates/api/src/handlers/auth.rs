//! Handlers for the `/auth` resource: signup, signin, email verification,
//! and the password-reset flow.
//!
//! One-time tokens live for an hour and exist at most once per user; a
//! repeat request while a token is live is rejected, matching the token
//! tables' unique constraints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use reelbase_core::error::CoreError;
use reelbase_core::token::{generate_otp, generate_reset_token, hash_token};
use reelbase_core::types::DbId;
use reelbase_db::models::user::{CreateUser, User, UserResponse};
use reelbase_db::repositories::{EmailVerificationTokenRepo, PasswordResetTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::handlers::validate_payload;
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/verify-email`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub user_id: DbId,
    pub otp: String,
}

/// Request body for `POST /auth/resend-verify-email`.
#[derive(Debug, Deserialize)]
pub struct ResendVerifyRequest {
    pub user_id: DbId,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /auth/is-valid-token`.
#[derive(Debug, Deserialize)]
pub struct TokenCheckRequest {
    pub user_id: DbId,
    pub token: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub user_id: DbId,
    pub token: String,
    pub password: String,
}

/// Successful authentication response: signed token plus public profile.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Response body for `POST /auth/is-valid-token`.
#[derive(Debug, Serialize)]
pub struct TokenCheckResponse {
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a new account, issue a verification OTP, and email it. Returns
/// 201 with a signed token (the account is usable before verification).
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_payload(&input)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        name: input.name.clone(),
        email: input.email.clone(),
        password_hash,
    };
    let user = UserRepo::create(&state.pool, &create)
        .await
        .map_err(|e| conflict_on_unique(e, "uq_users_email", "Email is already in use"))?;

    let otp = generate_otp();
    EmailVerificationTokenRepo::create(&state.pool, user.id, &hash_token(&otp)).await?;

    send_or_log(
        &state,
        &user.email,
        "Email Verification",
        verification_email_body(&user.email, &otp),
        &otp,
    )
    .await?;

    tracing::info!(user_id = user.id, "User signed up");

    let response = auth_response(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/signin
///
/// Authenticate with email + password.
pub async fn signin(
    State(state): State<AppState>,
    Json(input): Json<SigninRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    Ok(Json(auth_response(&state, &user)?))
}

/// POST /api/v1/auth/verify-email
///
/// Check the OTP, mark the account verified, and burn the token.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<VerifyEmailRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    if user.is_verified {
        return Err(AppError::BadRequest("User is already verified".into()));
    }

    let token = EmailVerificationTokenRepo::find_live(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Verification token not found or expired".into()))?;

    if hash_token(&input.otp) != token.token_hash {
        return Err(AppError::BadRequest("Invalid OTP".into()));
    }

    UserRepo::mark_verified(&state.pool, user.id).await?;
    EmailVerificationTokenRepo::delete_for_user(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Email verified");

    // Re-read so the issued token carries is_verified = true.
    let user = UserRepo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    Ok(Json(auth_response(&state, &user)?))
}

/// POST /api/v1/auth/resend-verify-email
///
/// Issue a fresh OTP, rejected while the previous one is still live.
pub async fn resend_verify_email(
    State(state): State<AppState>,
    Json(input): Json<ResendVerifyRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let user = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    if user.is_verified {
        return Err(AppError::BadRequest("User is already verified".into()));
    }

    if EmailVerificationTokenRepo::find_live(&state.pool, user.id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A verification token was already issued; request another after it expires".into(),
        )));
    }

    EmailVerificationTokenRepo::purge_expired(&state.pool, user.id).await?;

    let otp = generate_otp();
    EmailVerificationTokenRepo::create(&state.pool, user.id, &hash_token(&otp)).await?;

    send_or_log(
        &state,
        &user.email,
        "Re-send Email Verification",
        verification_email_body(&user.email, &otp),
        &otp,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "A new OTP has been sent to your email. Please verify your account before it expires.",
        )),
    ))
}

/// POST /api/v1/auth/forgot-password
///
/// Email a password-reset link, rejected while a reset token is still live.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::NotFound("No account with that email".into()))?;

    if PasswordResetTokenRepo::find_live(&state.pool, user.id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "A reset token was already issued; request another after it expires".into(),
        )));
    }

    PasswordResetTokenRepo::purge_expired(&state.pool, user.id).await?;

    let token = generate_reset_token();
    PasswordResetTokenRepo::create(&state.pool, user.id, &hash_token(&token)).await?;

    let reset_url = format!(
        "{}?token={}&id={}",
        state.config.reset_password_url, token, user.id
    );
    send_or_log(
        &state,
        &user.email,
        "Reset Password Link",
        reset_email_body(&user.email, &reset_url),
        &token,
    )
    .await?;

    Ok(Json(MessageResponse::new("Link sent to your email")))
}

/// POST /api/v1/auth/is-valid-token
///
/// Check a password-reset token without consuming it.
pub async fn is_valid_token(
    State(state): State<AppState>,
    Json(input): Json<TokenCheckRequest>,
) -> AppResult<Json<TokenCheckResponse>> {
    check_reset_token(&state, input.user_id, &input.token).await?;
    Ok(Json(TokenCheckResponse { valid: true }))
}

/// POST /api/v1/auth/reset-password
///
/// Consume a valid reset token and replace the password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    check_reset_token(&state, input.user_id, &input.token).await?;

    validate_password_strength(&input.password)
        .map_err(|msg| AppError::ValidationErrors(vec![msg]))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, input.user_id, &password_hash).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }));
    }

    PasswordResetTokenRepo::delete_for_user(&state.pool, input.user_id).await?;

    tracing::info!(user_id = input.user_id, "Password reset");

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// GET /api/v1/auth/me
///
/// Current profile plus a fresh token.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(auth_response(&state, &user)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign a token for `user` and build the standard auth response.
fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, AppError> {
    let token = generate_token(user, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
}

/// Validate a live password-reset token for `user_id`.
async fn check_reset_token(state: &AppState, user_id: DbId, token: &str) -> AppResult<()> {
    if token.is_empty() {
        return Err(AppError::BadRequest("Invalid token".into()));
    }

    let stored = PasswordResetTokenRepo::find_live(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid token".into()))?;

    if hash_token(token) != stored.token_hash {
        return Err(AppError::BadRequest("Invalid token".into()));
    }
    Ok(())
}

/// Deliver through the mailer when configured; otherwise log the secret at
/// debug level so local development stays usable without SMTP.
async fn send_or_log(
    state: &AppState,
    to: &str,
    subject: &str,
    html_body: String,
    secret: &str,
) -> AppResult<()> {
    match &state.mailer {
        Some(mailer) => {
            mailer.send(to, subject, html_body).await?;
        }
        None => {
            tracing::debug!(to, subject, secret, "SMTP not configured, skipping email");
        }
    }
    Ok(())
}

fn verification_email_body(email: &str, otp: &str) -> String {
    format!(
        "<p>Hello {email}</p>\
         <p>This is your verification token:</p>\
         <h1>{otp}</h1>\
         <p>It expires in one hour.</p>"
    )
}

fn reset_email_body(email: &str, reset_url: &str) -> String {
    format!(
        "<p>Hello {email}</p>\
         <p><a href=\"{reset_url}\">Click here to reset your password</a></p>\
         <p>The link expires in one hour.</p>"
    )
}
