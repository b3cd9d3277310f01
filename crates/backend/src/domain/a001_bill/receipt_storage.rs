use std::path::{Path, PathBuf};

use contracts::domain::a001_bill::receipt::{is_allowed_receipt, receipt_extension};
use once_cell::sync::OnceCell;

use super::error::BillError;

/// URL prefix the uploads directory is served under
pub const PUBLIC_PREFIX: &str = "/public";

static UPLOADS_DIR: OnceCell<PathBuf> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReceipt {
    pub file_url: String,
    /// Name the user picked, without any client-side directory
    pub file_name: String,
}

pub fn init(dir: PathBuf) -> anyhow::Result<()> {
    std::fs::create_dir_all(&dir)?;
    tracing::info!("Receipts stored in {}", dir.display());
    UPLOADS_DIR
        .set(dir)
        .map_err(|_| anyhow::anyhow!("Uploads directory already initialized"))
}

pub async fn save_receipt(file_name: &str, bytes: &[u8]) -> Result<StoredReceipt, BillError> {
    let dir = UPLOADS_DIR
        .get()
        .ok_or_else(|| anyhow::anyhow!("Uploads directory has not been initialized"))?;
    save_receipt_in(dir, file_name, bytes).await
}

/// Write the receipt under a fresh unique name inside `dir`
pub async fn save_receipt_in(
    dir: &Path,
    file_name: &str,
    bytes: &[u8],
) -> Result<StoredReceipt, BillError> {
    let file_name = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name)
        .trim()
        .to_string();

    if !is_allowed_receipt(&file_name) {
        return Err(BillError::UnsupportedReceipt(file_name));
    }
    if bytes.is_empty() {
        return Err(BillError::Validation("Le justificatif est vide".into()));
    }

    let extension = receipt_extension(&file_name).unwrap_or_default();
    let stored_name = format!("{}.{}", uuid::Uuid::new_v4(), extension);

    tokio::fs::write(dir.join(&stored_name), bytes)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to write receipt {}: {}", stored_name, e))?;

    Ok(StoredReceipt {
        file_url: format!("{}/{}", PUBLIC_PREFIX, stored_name),
        file_name,
    })
}

pub async fn remove_receipt(file_url: &str) -> anyhow::Result<()> {
    let dir = UPLOADS_DIR
        .get()
        .ok_or_else(|| anyhow::anyhow!("Uploads directory has not been initialized"))?;
    remove_receipt_in(dir, file_url).await
}

/// Delete a file previously returned by `save_receipt_in`; a missing file is not an error
pub async fn remove_receipt_in(dir: &Path, file_url: &str) -> anyhow::Result<()> {
    let stored_name = file_url
        .strip_prefix(PUBLIC_PREFIX)
        .map(|rest| rest.trim_start_matches('/'))
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && name != &"..")
        .ok_or_else(|| anyhow::anyhow!("Not a stored receipt: {}", file_url))?;

    match tokio::fs::remove_file(dir.join(stored_name)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(anyhow::anyhow!("Failed to remove receipt {}: {}", stored_name, e)),
    }
}
