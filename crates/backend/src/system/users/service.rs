use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{CreateUserDto, User};

use super::repository;
use crate::system::auth::password;

/// Create a new user, returning its id
pub async fn create(dto: CreateUserDto) -> Result<String> {
    let email = dto.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(anyhow::anyhow!("Invalid email format"));
    }

    if repository::get_with_password_by_email(&email).await?.is_some() {
        return Err(anyhow::anyhow!("Email already registered"));
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let now = Utc::now().to_rfc3339();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email,
        name: dto.name,
        role: dto.role,
        created_at: now.clone(),
        updated_at: now,
    };

    repository::create_with_password(&user, &password_hash).await?;

    Ok(user.id)
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

/// The user matching `email` and `password`, if any
pub async fn verify_credentials(email: &str, password: &str) -> Result<Option<User>> {
    let email = email.trim().to_lowercase();
    match repository::get_with_password_by_email(&email).await? {
        Some((user, hash)) if password::verify_password(password, &hash)? => Ok(Some(user)),
        _ => Ok(None),
    }
}
