use contracts::system::auth::{LoginRequest, LoginResponse};
use contracts::system::users::UserRole;
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;
use crate::shared::store::StoreError;

/// Login with email and password from the form of the given role
pub async fn login(
    email: String,
    password: String,
    role: UserRole,
) -> Result<LoginResponse, StoreError> {
    let request = LoginRequest {
        email,
        password,
        role,
    };

    let response = Request::post(&api_url("/api/auth/login"))
        .json(&request)
        .map_err(|e| StoreError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| StoreError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(StoreError::from_status(response.status()));
    }

    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}
