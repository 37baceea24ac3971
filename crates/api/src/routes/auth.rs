use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use bson::DateTime;
use serde::{Deserialize, Serialize};
use taskwise_db::models::User;
use taskwise_services::AuthService;
use taskwise_services::dao::user::UserDao;
use validator::Validate;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

const RESET_CODE_TTL_MILLIS: i64 = 600_000; // 10 minutes

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub img_key: Option<String>,
    pub img_url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub title: String,
    pub img_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            title: user.title.clone(),
            img_url: user.img_url.clone(),
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if state.users.try_find_by_email(&body.email).await?.is_some() {
        return Err(ApiError::Conflict("User is already registered".to_string()));
    }

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(
            body.username,
            body.email,
            password_hash,
            body.img_key.unwrap_or_default(),
            body.img_url,
            body.title,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    // "guest"/"guest" is an alias for the configured demo account.
    let (email, password) = match (
        body.email.as_str(),
        body.password.as_str(),
        &state.settings.app.guest_email,
        &state.settings.app.guest_password,
    ) {
        ("guest", "guest", Some(guest_email), Some(guest_password)) => {
            (guest_email.clone(), guest_password.clone())
        }
        _ => (body.email, body.password),
    };

    let user = state
        .users
        .try_find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;
    if !state.auth.verify_password(&password, password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let user_id = user.id.expect("loaded user has an id");
    let token = state
        .auth
        .generate_token(user_id, &user.email, &user.username)?;

    let mut headers = HeaderMap::new();
    let cookie = format!(
        "access_token={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        token,
        state.auth.token_ttl_secs()
    );
    headers.insert(header::SET_COOKIE, cookie.parse().expect("valid cookie"));

    Ok((
        headers,
        Json(AuthResponse {
            token,
            user: UserResponse::from_user(&user),
        }),
    ))
}

pub async fn logout() -> (HeaderMap, Json<serde_json::Value>) {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        "access_token=; HttpOnly; Path=/; Max-Age=0"
            .parse()
            .expect("valid cookie"),
    );
    (
        headers,
        Json(serde_json::json!({ "message": "You've been signed out!" })),
    )
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = send_reset_code(&state, &body.email).await?;
    Ok(Json(serde_json::json!({
        "message": "Reset code sent to email",
        "email": email,
    })))
}

pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = send_reset_code(&state, &body.email).await?;
    Ok(Json(serde_json::json!({
        "message": "Reset code resent to email",
        "email": email,
    })))
}

async fn send_reset_code(state: &AppState, email: &str) -> Result<String, ApiError> {
    let user = state
        .users
        .try_find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let user_id = user.id.expect("loaded user has an id");

    let code = AuthService::generate_reset_code();
    let expiry = DateTime::from_millis(DateTime::now().timestamp_millis() + RESET_CODE_TTL_MILLIS);
    state.users.set_reset_code(user_id, &code, expiry).await?;

    state
        .mailer
        .send_reset_code(&user.email, &code)
        .await
        .map_err(|e| ApiError::Internal(format!("Error sending reset code: {}", e)))?;

    Ok(user.email)
}

#[derive(Debug, Deserialize)]
pub struct VerifyResetCodeRequest {
    pub email: String,
    pub code: String,
}

pub async fn verify_reset_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyResetCodeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .users
        .try_find_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !UserDao::reset_code_is_valid(&user, &body.code) {
        return Err(ApiError::BadRequest(
            "Invalid or expired reset code".to_string(),
        ));
    }
    Ok(Json(serde_json::json!({ "message": "Reset code verified" })))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state
        .users
        .try_find_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !UserDao::reset_code_is_valid(&user, &body.code) {
        return Err(ApiError::BadRequest(
            "Invalid or expired reset code".to_string(),
        ));
    }

    let hash = state.auth.hash_password(&body.new_password)?;
    state
        .users
        .update_password(user.id.expect("loaded user has an id"), &hash)
        .await?;

    Ok(Json(
        serde_json::json!({ "message": "Password reset successful" }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.users.base.find_by_id(auth.user_id).await?;
    let password_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Invalid current password".to_string()))?;

    if !state
        .auth
        .verify_password(&body.current_password, password_hash)?
    {
        return Err(ApiError::BadRequest(
            "Invalid current password".to_string(),
        ));
    }

    let hash = state.auth.hash_password(&body.new_password)?;
    state.users.update_password(auth.user_id, &hash).await?;

    Ok(Json(
        serde_json::json!({ "message": "Password changed successfully" }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub title: String,
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.users.update_title(auth.user_id, &body.title).await?;
    let user = state.users.base.find_by_id(auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Profile updated successfully",
        "user": UserResponse::from_user(&user),
    })))
}
