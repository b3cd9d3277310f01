use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use contracts::system::auth::TokenClaims;
use serde_json::{json, Value};

/// Claims of the caller, put in the request by `require_auth`
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<TokenClaims>() {
            Some(claims) => Ok(CurrentUser(claims.clone())),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Authentification requise" })),
            )),
        }
    }
}
