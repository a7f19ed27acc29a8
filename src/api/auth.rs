//! Authentication endpoints: register, login, logout

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, RegisterRequest},
};

use super::SESSION_COOKIE;

/// Registration response
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Status message
    pub message: String,
    /// New user id
    pub id: i32,
}

/// Login response body (the session token travels in the cookie)
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Authenticated user id
    pub id: i32,
    /// Authenticated username
    pub username: String,
}

/// Logout response
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn session_cookie(token: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(max_age)
        .build()
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let id = state.services.auth.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created".to_string(),
            id,
        }),
    ))
}

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (token, user) = state.services.auth.login(request).await?;

    let max_age = time::Duration::hours(state.config.auth.jwt_expiration_hours as i64);
    let jar = jar.add(session_cookie(token, max_age));

    Ok((
        jar,
        Json(LoginResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// Log out by expiring the session cookie.
///
/// Only the cookie is cleared; a token captured elsewhere stays valid
/// until its natural expiry.
#[utoipa::path(
    post,
    path = "/users/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(session_cookie(String::new(), time::Duration::ZERO));

    (
        jar,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}
