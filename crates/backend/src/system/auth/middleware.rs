use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use contracts::system::auth::TokenClaims;

/// Claims from the `Authorization: Bearer <jwt>` header
fn bearer_claims(req: &Request<Body>) -> Result<TokenClaims, StatusCode> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    super::jwt::validate_token(token).map_err(|e| {
        tracing::warn!("Rejected bearer token on {}: {}", req.uri().path(), e);
        StatusCode::UNAUTHORIZED
    })
}

/// Validates the JWT and stores its claims for `CurrentUser`
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let claims = bearer_claims(&req)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Admin-only routes; runs inside `require_auth`
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    match req.extensions().get::<TokenClaims>() {
        Some(claims) if claims.is_admin() => Ok(next.run(req).await),
        Some(claims) => {
            tracing::warn!("{} is not allowed on {}", claims.email, req.uri().path());
            Err(StatusCode::FORBIDDEN)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
