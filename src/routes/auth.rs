use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_OTP_REQUIRED, OTP_TTL_SECS};
use crate::error::{AppError, Result};
use crate::models::UserView;
use crate::routes::validation::normalize_email;
use crate::store;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: UserView,
}

/// Email a one-time sign-in code
///
/// Gate, send, record — strictly in that order. The cooldown is written only
/// after the provider confirms the send, so a failed send never locks the
/// address out of an immediate retry.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<MessageResponse>> {
    let email = normalize_email(&payload.email)?;

    check_cooldown(&state, &email).await?;

    let code = state.auth.issue_otp(&email).await?;
    let body = format!(
        "Your one-time sign-in code is {}. It expires in {} minutes.",
        code,
        OTP_TTL_SECS / 60
    );
    state.mailer.send(&email, "Your sign-in code", &body).await?;

    mark_sent(&state, &email).await?;
    tracing::info!("Sign-in code sent to {}", email);

    Ok(Json(MessageResponse {
        message: "Sign-in code sent".to_string(),
    }))
}

/// Redeem a one-time code for a bearer session
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<SignInResponse>> {
    let email = normalize_email(&payload.email)?;
    let code = payload.otp.trim();
    if code.is_empty() {
        return Err(AppError::InvalidInput(ERR_OTP_REQUIRED.to_string()));
    }

    let signin = state.auth.verify_otp(&email, code).await?;

    tracing::info!("User {} signed in", signin.user_id);

    Ok(Json(SignInResponse {
        token: signin.token,
        user: UserView::from_record(&signin.user_id, &signin.user),
    }))
}

/// Email a password reset link
///
/// Shares the per-address cooldown ledger with the sign-in code flow.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<MessageResponse>> {
    let email = normalize_email(&payload.email)?;

    check_cooldown(&state, &email).await?;

    let token = state.auth.issue_reset_token(&email).await?;
    let link = format!("{}/reset-password?token={}", state.config.base_url, token);
    let body = format!("Follow this link to reset your password: {}", link);
    state
        .mailer
        .send(&email, "Reset your password", &body)
        .await?;

    mark_sent(&state, &email).await?;
    tracing::info!("Password reset link sent to {}", email);

    Ok(Json(MessageResponse {
        message: "Password reset link sent".to_string(),
    }))
}

/// Consult the cooldown gate; rejects with the remaining wait when blocked
async fn check_cooldown(state: &AppState, email: &str) -> Result<()> {
    let db = state.db.clone();
    let email = email.to_string();
    let window = state.config.email_cooldown_secs;
    tokio::task::spawn_blocking(move || store::cooldown::begin_send(&db, &email, window)).await?
}

/// Record the confirmed send in the cooldown ledger
async fn mark_sent(state: &AppState, email: &str) -> Result<()> {
    let db = state.db.clone();
    let email = email.to_string();
    tokio::task::spawn_blocking(move || store::cooldown::record_send(&db, &email)).await?
}
