use axum::{extract::Json, http::StatusCode};
use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};
use contracts::system::users::User;

use crate::system::auth::extractor::CurrentUser;
use crate::system::{auth::jwt, users::service as user_service};

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    }
}

/// POST /api/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    let user = user_service::verify_credentials(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::error!("Credential check failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // An employee account cannot log in through the admin form and vice versa
    if user.role != request.role {
        tracing::warn!(
            "Login of {} rejected: account is {}, form is {}",
            user.email,
            user.role.as_str(),
            request.role.as_str()
        );
        return Err(StatusCode::UNAUTHORIZED);
    }

    let jwt = jwt::generate_access_token(&user).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(LoginResponse {
        jwt,
        user: user_info(user),
    }))
}

/// GET /api/auth/me
pub async fn current_user(CurrentUser(claims): CurrentUser) -> Result<Json<UserInfo>, StatusCode> {
    let user = user_service::get_by_id(&claims.sub)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(user_info(user)))
}
