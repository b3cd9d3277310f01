use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use contracts::system::users::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use rand::Rng;

const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 24;
const JWT_SECRET_KEY: &str = "jwt_secret";

static JWT_SECRET: OnceCell<String> = OnceCell::new();

/// Install the signing secret: the configured one, else the one kept in
/// `sys_settings`, else a freshly generated one (then persisted).
pub async fn init_secret(configured: Option<String>) -> Result<()> {
    let secret = match configured.filter(|s| !s.trim().is_empty()) {
        Some(secret) => {
            tracing::info!("Using JWT secret from configuration");
            secret
        }
        None => match get_jwt_secret_from_db().await? {
            Some(secret) => secret,
            None => {
                tracing::info!("Generating a new JWT secret");
                let secret = generate_jwt_secret();
                save_jwt_secret_to_db(&secret).await?;
                secret
            }
        },
    };

    JWT_SECRET
        .set(secret)
        .map_err(|_| anyhow::anyhow!("JWT secret already initialized"))
}

fn secret() -> Result<&'static str> {
    JWT_SECRET
        .get()
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("JWT secret has not been initialized"))
}

/// Claims for `user`, valid for 24 hours from now
pub fn claims_for(user: &User) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role,
        exp: (now + chrono::Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn generate_access_token(user: &User) -> Result<String> {
    encode_token(&claims_for(user), secret()?)
}

pub fn validate_token(token: &str) -> Result<TokenClaims> {
    decode_token(token, secret()?)
}

pub fn encode_token(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

/// 256 random bits, base64
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

async fn get_jwt_secret_from_db() -> Result<Option<String>> {
    use crate::shared::data::db::get_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let result = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db(secret: &str) -> Result<()> {
    use crate::shared::data::db::get_connection;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let now = Utc::now().to_rfc3339();

    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            [
                JWT_SECRET_KEY.into(),
                secret.to_string().into(),
                "Auto-generated JWT secret for authentication".into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::users::UserRole;

    fn employee() -> User {
        User {
            id: "u-1".into(),
            email: "employee@test.tld".into(),
            name: None,
            role: UserRole::Employee,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_token_carries_identity() {
        let token = encode_token(&claims_for(&employee()), "secret").unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.email, "employee@test.tld");
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = encode_token(&claims_for(&employee()), "secret").unwrap();
        assert!(decode_token(&token, "another").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut claims = claims_for(&employee());
        claims.iat -= 3 * 24 * 3600;
        claims.exp = claims.iat + 60;
        let token = encode_token(&claims, "secret").unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }

    #[test]
    fn test_generated_secret_is_random() {
        assert_ne!(generate_jwt_secret(), generate_jwt_secret());
    }
}
