use contracts::domain::a001_bill::aggregate::Bill;
use contracts::domain::common::AggregateRoot;
use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_BILL_TABLE: &str = r#"
    CREATE TABLE a001_bill (
        id TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL,
        expense_type TEXT,
        name TEXT NOT NULL DEFAULT '',
        amount REAL NOT NULL DEFAULT 0,
        date TEXT NOT NULL DEFAULT '',
        vat TEXT NOT NULL DEFAULT '',
        pct INTEGER NOT NULL DEFAULT 20,
        commentary TEXT NOT NULL DEFAULT '',
        file_url TEXT,
        file_name TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        comment_admin TEXT,
        is_draft INTEGER NOT NULL DEFAULT 1,
        created_at TEXT,
        updated_at TEXT,
        version INTEGER NOT NULL DEFAULT 0
    );
"#;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE sys_users (
        id TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL UNIQUE,
        name TEXT,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

const CREATE_SETTINGS_TABLE: &str = r#"
    CREATE TABLE sys_settings (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
"#;

pub async fn initialize_database(db_file: &str) -> anyhow::Result<()> {
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    ensure_table(&conn, &Bill::full_name(), CREATE_BILL_TABLE).await?;
    ensure_table(&conn, "sys_users", CREATE_USERS_TABLE).await?;
    ensure_table(&conn, "sys_settings", CREATE_SETTINGS_TABLE).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

async fn ensure_table(conn: &DatabaseConnection, name: &str, ddl: &str) -> anyhow::Result<()> {
    let existing = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?",
            [name.into()],
        ))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", name);
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, ddl.to_string()))
            .await?;
    }
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_table_is_named_after_aggregate() {
        assert!(CREATE_BILL_TABLE.contains(&format!("CREATE TABLE {} (", Bill::full_name())));
    }
}
