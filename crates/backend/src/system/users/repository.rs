use anyhow::{Context, Result};
use contracts::system::users::{User, UserRole};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};

use crate::shared::data::db::get_connection;

const USER_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

fn user_from_row(row: &QueryResult) -> Result<User> {
    let role: String = row.try_get("", "role")?;
    Ok(User {
        id: row.try_get("", "id")?,
        email: row.try_get("", "email")?,
        name: row.try_get("", "name")?,
        role: UserRole::parse(&role)
            .ok_or_else(|| anyhow::anyhow!("Unknown user role: {}", role))?,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
    })
}

/// Create user with password hash
pub async fn create_with_password(user: &User, password_hash: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_users (id, email, name, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            [
                user.id.clone().into(),
                user.email.clone().into(),
                user.name.clone().into(),
                password_hash.to_string().into(),
                user.role.as_str().into(),
                user.created_at.clone().into(),
                user.updated_at.clone().into(),
            ],
        ))
        .await
        .context("Failed to insert user")?;

    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    let result = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS),
            [id.into()],
        ))
        .await?;

    result.as_ref().map(user_from_row).transpose()
}

/// User and stored password hash, looked up by email
pub async fn get_with_password_by_email(email: &str) -> Result<Option<(User, String)>> {
    let result = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            &format!(
                "SELECT {}, password_hash FROM sys_users WHERE email = ?",
                USER_COLUMNS
            ),
            [email.into()],
        ))
        .await?;

    match result {
        Some(row) => {
            let user = user_from_row(&row)?;
            let hash: String = row.try_get("", "password_hash")?;
            Ok(Some((user, hash)))
        }
        None => Ok(None),
    }
}

pub async fn count_users() -> Result<usize> {
    let result = get_connection()
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) as count FROM sys_users".to_string(),
        ))
        .await?;

    match result {
        Some(row) => {
            let count: i64 = row.try_get("", "count")?;
            Ok(count as usize)
        }
        None => Ok(0),
    }
}
