use anyhow::Result;
use contracts::system::users::{CreateUserDto, UserRole};

use crate::system::users::{repository, service};

/// Create the default employee and admin accounts when no user exists yet
pub async fn ensure_default_users() -> Result<()> {
    if repository::count_users().await? > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default accounts...");

    let defaults = [
        ("employee@test.tld", "employee", "Employé", UserRole::Employee),
        ("admin@test.tld", "admin", "Administrateur", UserRole::Admin),
    ];

    for (email, password, name, role) in defaults {
        let id = service::create(CreateUserDto {
            email: email.to_string(),
            password: password.to_string(),
            name: Some(name.to_string()),
            role,
        })
        .await?;
        tracing::warn!(
            "Default {} account created: {} / {} (id {}). Change the password before going live.",
            role.as_str(),
            email,
            password,
            id
        );
    }

    Ok(())
}
