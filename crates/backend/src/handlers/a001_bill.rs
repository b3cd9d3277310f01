use axum::{
    extract::{Multipart, Path},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_bill::aggregate::{Bill, BillDto, UploadedReceipt};

use crate::domain::a001_bill::{error::BillError, service};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/bills
pub async fn list(CurrentUser(claims): CurrentUser) -> Result<Json<Vec<Bill>>, BillError> {
    Ok(Json(service::list_for(&claims).await?))
}

/// GET /api/bills/:id
pub async fn get_by_id(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Bill>, BillError> {
    Ok(Json(service::get_for(&claims, &id).await?))
}

/// POST /api/bills (multipart: `file`, optional `email`)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedReceipt>), BillError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut email: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BillError::Validation(format!("Malformed upload: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| BillError::Validation(format!("Malformed upload: {}", e)))?;
                file = Some((file_name, bytes.to_vec()));
            }
            Some("email") => {
                email = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| BillError::Validation(format!("Malformed upload: {}", e)))?,
                );
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| BillError::Validation("Missing `file` field".into()))?;

    let receipt =
        service::create_from_receipt(&claims, email.as_deref(), &file_name, &bytes).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// PATCH /api/bills/:id
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<BillDto>,
) -> Result<Json<Bill>, BillError> {
    Ok(Json(service::update(&claims, &id, dto).await?))
}

/// DELETE /api/bills/:id (admin)
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, BillError> {
    service::delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
