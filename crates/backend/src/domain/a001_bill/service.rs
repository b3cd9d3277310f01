use contracts::domain::a001_bill::aggregate::{Bill, BillDto, BillStatus, UploadedReceipt};
use contracts::domain::a001_bill::aggregate::BillId;
use contracts::domain::common::{AggregateId, AggregateRoot};
use contracts::system::auth::TokenClaims;

use super::error::BillError;
use super::{receipt_storage, repository};

fn parse_id(id: &str) -> Result<BillId, BillError> {
    BillId::from_string(id).map_err(|_| BillError::Validation(format!("Invalid bill id: {}", id)))
}

fn is_owner(claims: &TokenClaims, bill: &Bill) -> bool {
    bill.email.eq_ignore_ascii_case(&claims.email)
}

/// Bills visible to the caller: their own, or every bill for an admin
pub async fn list_for(claims: &TokenClaims) -> anyhow::Result<Vec<Bill>> {
    if claims.is_admin() {
        repository::list_all().await
    } else {
        repository::list_by_email(&claims.email).await
    }
}

pub async fn get_for(claims: &TokenClaims, id: &str) -> Result<Bill, BillError> {
    let bill = repository::get_by_id(parse_id(id)?)
        .await?
        .ok_or(BillError::NotFound)?;
    if !claims.is_admin() && !is_owner(claims, &bill) {
        return Err(BillError::Forbidden("not the owner of this bill"));
    }
    Ok(bill)
}

/// Owner of a new receipt: employees always upload for themselves, an admin
/// may upload on behalf of the email given in the form.
pub fn resolve_owner(claims: &TokenClaims, form_email: Option<&str>) -> Result<String, BillError> {
    match form_email.map(str::trim).filter(|e| !e.is_empty()) {
        None => Ok(claims.email.clone()),
        Some(email) if email.eq_ignore_ascii_case(&claims.email) => Ok(claims.email.clone()),
        Some(email) if claims.is_admin() => Ok(email.to_lowercase()),
        Some(_) => Err(BillError::Forbidden("cannot upload for another user")),
    }
}

/// Drop the owner's unsubmitted drafts and their receipt files
async fn discard_drafts(owner: &str) -> anyhow::Result<()> {
    for draft in repository::list_drafts_by_email(owner).await? {
        repository::delete(draft.id()).await?;
        if let Some(file_url) = draft.file_url.as_deref() {
            if let Err(e) = receipt_storage::remove_receipt(file_url).await {
                tracing::warn!("Receipt of discarded draft {}: {:#}", draft.to_string_id(), e);
            }
        }
        tracing::debug!("Discarded draft bill {}", draft.to_string_id());
    }
    Ok(())
}

/// Store the receipt and create the draft bill it belongs to. A new receipt
/// replaces any draft the owner left unsubmitted.
pub async fn create_from_receipt(
    claims: &TokenClaims,
    form_email: Option<&str>,
    file_name: &str,
    bytes: &[u8],
) -> Result<UploadedReceipt, BillError> {
    let owner = resolve_owner(claims, form_email)?;
    let stored = receipt_storage::save_receipt(file_name, bytes).await?;

    discard_drafts(&owner).await?;
    let draft = Bill::new_draft(owner, stored.file_url.clone(), stored.file_name);
    let key = repository::insert_draft(&draft).await?;

    tracing::info!("Receipt {} stored for draft bill {}", stored.file_url, key.as_string());

    Ok(UploadedReceipt {
        file_url: stored.file_url,
        key: key.as_string(),
    })
}

/// Employees may only edit their own pending bills and keep them pending;
/// admins may set any status.
pub fn check_update_allowed(
    claims: &TokenClaims,
    bill: &Bill,
    dto: &BillDto,
) -> Result<(), BillError> {
    if claims.is_admin() {
        return Ok(());
    }
    if !is_owner(claims, bill) {
        return Err(BillError::Forbidden("not the owner of this bill"));
    }
    if bill.status != BillStatus::Pending {
        return Err(BillError::Forbidden("bill has already been reviewed"));
    }
    if dto.status != BillStatus::Pending {
        return Err(BillError::Forbidden("only an admin can review a bill"));
    }
    Ok(())
}

pub async fn update(claims: &TokenClaims, id: &str, dto: BillDto) -> Result<Bill, BillError> {
    let mut aggregate = repository::get_by_id(parse_id(id)?)
        .await?
        .ok_or(BillError::NotFound)?;

    check_update_allowed(claims, &aggregate, &dto)?;
    dto.validate().map_err(BillError::Validation)?;

    let mut dto = dto;
    if !claims.is_admin() {
        dto.comment_admin = aggregate.comment_admin.clone();
    }

    aggregate.update(&dto);
    aggregate.before_write();
    repository::update(&aggregate).await?;

    tracing::info!(
        "Bill {} saved by {} with status {}",
        aggregate.to_string_id(),
        claims.email,
        aggregate.status.code()
    );

    Ok(aggregate)
}

pub async fn delete(id: &str) -> Result<(), BillError> {
    if repository::delete(parse_id(id)?).await? {
        Ok(())
    } else {
        Err(BillError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_bill::aggregate::ExpenseType;
    use contracts::system::users::UserRole;

    fn claims(email: &str, role: UserRole) -> TokenClaims {
        TokenClaims {
            sub: format!("id-{}", email),
            email: email.into(),
            role,
            exp: usize::MAX,
            iat: 0,
        }
    }

    fn employee() -> TokenClaims {
        claims("employee@test.tld", UserRole::Employee)
    }

    fn admin() -> TokenClaims {
        claims("admin@test.tld", UserRole::Admin)
    }

    fn submitted_dto() -> BillDto {
        BillDto {
            expense_type: Some(ExpenseType::Transports),
            name: "Vol Paris Londres".into(),
            amount: 348.0,
            date: "2022-04-12".into(),
            vat: "70".into(),
            pct: Some(20),
            commentary: String::new(),
            ..Default::default()
        }
    }

    fn pending_bill_of(email: &str) -> Bill {
        Bill::new_draft(email.into(), "/public/a.jpg".into(), "a.jpg".into())
    }

    #[test]
    fn test_owner_of_upload() {
        assert_eq!(resolve_owner(&employee(), None).unwrap(), "employee@test.tld");
        assert_eq!(
            resolve_owner(&employee(), Some("EMPLOYEE@test.tld")).unwrap(),
            "employee@test.tld"
        );
        assert!(matches!(
            resolve_owner(&employee(), Some("other@test.tld")),
            Err(BillError::Forbidden(_))
        ));
        assert_eq!(
            resolve_owner(&admin(), Some("other@test.tld")).unwrap(),
            "other@test.tld"
        );
    }

    #[test]
    fn test_employee_cannot_accept_own_bill() {
        let bill = pending_bill_of("employee@test.tld");
        let dto = BillDto {
            status: BillStatus::Accepted,
            ..submitted_dto()
        };
        assert!(matches!(
            check_update_allowed(&employee(), &bill, &dto),
            Err(BillError::Forbidden(_))
        ));
        assert!(check_update_allowed(&admin(), &bill, &dto).is_ok());
    }

    #[test]
    fn test_employee_cannot_edit_foreign_or_reviewed_bill() {
        let foreign = pending_bill_of("someone@test.tld");
        assert!(check_update_allowed(&employee(), &foreign, &submitted_dto()).is_err());

        let mut refused = pending_bill_of("employee@test.tld");
        refused.status = BillStatus::Refused;
        assert!(check_update_allowed(&employee(), &refused, &submitted_dto()).is_err());

        let own = pending_bill_of("employee@test.tld");
        assert!(check_update_allowed(&employee(), &own, &submitted_dto()).is_ok());
    }

    #[tokio::test]
    async fn test_bill_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        crate::shared::data::db::initialize_database(
            &dir.path().join("billed.db").to_string_lossy(),
        )
        .await
        .unwrap();
        receipt_storage::init(dir.path().join("uploads")).unwrap();

        let uploads = dir.path().join("uploads");
        let abandoned = create_from_receipt(&employee(), None, "brouillon.jpg", b"jpeg")
            .await
            .unwrap();
        let receipt = create_from_receipt(&employee(), None, "ticket.jpg", b"jpeg")
            .await
            .unwrap();
        assert!(receipt.file_url.starts_with("/public/"));

        // Picking another receipt replaces the unsubmitted draft and its file
        let drafts = repository::list_drafts_by_email("employee@test.tld")
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].to_string_id(), receipt.key);
        assert!(matches!(
            get_for(&employee(), &abandoned.key).await,
            Err(BillError::NotFound)
        ));
        assert_eq!(std::fs::read_dir(&uploads).unwrap().count(), 1);

        // A draft stays out of the listings until the form is submitted
        assert!(list_for(&employee()).await.unwrap().is_empty());

        let saved = update(&employee(), &receipt.key, submitted_dto()).await.unwrap();
        assert_eq!(saved.status, BillStatus::Pending);
        assert_eq!(saved.file_name.as_deref(), Some("ticket.jpg"));

        assert_eq!(list_for(&employee()).await.unwrap().len(), 1);
        assert_eq!(list_for(&admin()).await.unwrap().len(), 1);
        let stranger = claims("stranger@test.tld", UserRole::Employee);
        assert!(list_for(&stranger).await.unwrap().is_empty());
        assert!(matches!(
            get_for(&stranger, &receipt.key).await,
            Err(BillError::Forbidden(_))
        ));

        let invalid = BillDto {
            amount: -3.0,
            ..submitted_dto()
        };
        assert!(matches!(
            update(&employee(), &receipt.key, invalid).await,
            Err(BillError::Validation(_))
        ));

        let decision = BillDto {
            status: BillStatus::Accepted,
            comment_admin: Some("ok".into()),
            ..BillDto::from_bill(&saved)
        };
        let accepted = update(&admin(), &receipt.key, decision).await.unwrap();
        assert_eq!(accepted.status, BillStatus::Accepted);
        assert_eq!(accepted.comment_admin.as_deref(), Some("ok"));
        assert!(accepted.metadata.version > saved.metadata.version);

        assert!(matches!(
            update(&employee(), &receipt.key, submitted_dto()).await,
            Err(BillError::Forbidden(_))
        ));

        delete(&receipt.key).await.unwrap();
        assert!(matches!(
            get_for(&admin(), &receipt.key).await,
            Err(BillError::NotFound)
        ));
        assert!(matches!(
            delete(&receipt.key).await,
            Err(BillError::NotFound)
        ));
    }
}
