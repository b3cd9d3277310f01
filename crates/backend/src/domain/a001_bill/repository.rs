use chrono::Utc;
use contracts::domain::a001_bill::aggregate::{Bill, BillId, BillStatus, ExpenseType};
use contracts::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_bill")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub expense_type: Option<String>,
    pub name: String,
    pub amount: f64,
    pub date: String,
    pub vat: String,
    pub pct: i32,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: String,
    pub comment_admin: Option<String>,
    /// Receipt uploaded, form not submitted yet
    pub is_draft: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Rows whose id is not a UUID cannot be addressed by any request; they are
/// skipped with a warning rather than given a made-up id.
pub(crate) fn to_bill(m: Model) -> Option<Bill> {
    let id = match BillId::from_string(&m.id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Skipping bill row '{}': {}", m.id, e);
            return None;
        }
    };
    let metadata = EntityMetadata {
        created_at: m.created_at.unwrap_or_else(Utc::now),
        updated_at: m.updated_at.unwrap_or_else(Utc::now),
        version: m.version,
    };
    let status = BillStatus::from_code(&m.status).unwrap_or_else(|| {
        tracing::warn!("Bill {} has unknown status '{}'", m.id, m.status);
        BillStatus::Pending
    });

    Some(Bill {
        id,
        email: m.email,
        expense_type: m.expense_type.as_deref().and_then(ExpenseType::from_label),
        name: m.name,
        amount: m.amount,
        date: m.date,
        vat: m.vat,
        pct: m.pct.max(0) as u32,
        commentary: m.commentary,
        file_url: m.file_url,
        file_name: m.file_name,
        status,
        comment_admin: m.comment_admin,
        metadata,
    })
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Bill, is_draft: bool) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id().as_string()),
        email: Set(aggregate.email.clone()),
        expense_type: Set(aggregate.expense_type.map(|t| t.label().to_string())),
        name: Set(aggregate.name.clone()),
        amount: Set(aggregate.amount),
        date: Set(aggregate.date.clone()),
        vat: Set(aggregate.vat.clone()),
        pct: Set(aggregate.pct as i32),
        commentary: Set(aggregate.commentary.clone()),
        file_url: Set(aggregate.file_url.clone()),
        file_name: Set(aggregate.file_name.clone()),
        status: Set(aggregate.status.code().to_string()),
        comment_admin: Set(aggregate.comment_admin.clone()),
        is_draft: Set(is_draft),
        created_at: Set(Some(aggregate.metadata().created_at)),
        updated_at: Set(Some(aggregate.metadata().updated_at)),
        version: Set(aggregate.metadata().version),
    }
}

/// Submitted bills of every employee, newest first
pub async fn list_all() -> anyhow::Result<Vec<Bill>> {
    let items = Entity::find()
        .filter(Column::IsDraft.eq(false))
        .order_by_desc(Column::Date)
        .all(conn())
        .await?
        .into_iter()
        .filter_map(to_bill)
        .collect();
    Ok(items)
}

/// Submitted bills of one employee, newest first
pub async fn list_by_email(email: &str) -> anyhow::Result<Vec<Bill>> {
    let items = Entity::find()
        .filter(Column::IsDraft.eq(false))
        .filter(Column::Email.eq(email))
        .order_by_desc(Column::Date)
        .all(conn())
        .await?
        .into_iter()
        .filter_map(to_bill)
        .collect();
    Ok(items)
}

/// Unsubmitted drafts of one employee
pub async fn list_drafts_by_email(email: &str) -> anyhow::Result<Vec<Bill>> {
    let items = Entity::find()
        .filter(Column::IsDraft.eq(true))
        .filter(Column::Email.eq(email))
        .all(conn())
        .await?
        .into_iter()
        .filter_map(to_bill)
        .collect();
    Ok(items)
}

/// Any bill, drafts included
pub async fn get_by_id(id: BillId) -> anyhow::Result<Option<Bill>> {
    let result = Entity::find_by_id(id.as_string()).one(conn()).await?;
    Ok(result.and_then(to_bill))
}

pub async fn insert_draft(aggregate: &Bill) -> anyhow::Result<BillId> {
    to_active(aggregate, true).insert(conn()).await?;
    Ok(aggregate.id())
}

/// Persist the aggregate; the bill stops being a draft
pub async fn update(aggregate: &Bill) -> anyhow::Result<()> {
    let mut active = to_active(aggregate, false);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: BillId) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.as_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> Model {
        Model {
            id: id.into(),
            email: "employee@test.tld".into(),
            expense_type: Some("Transports".into()),
            name: "Vol Paris Londres".into(),
            amount: 348.0,
            date: "2022-04-12".into(),
            vat: "70".into(),
            pct: 20,
            commentary: String::new(),
            file_url: Some("/public/a.jpg".into()),
            file_name: Some("a.jpg".into()),
            status: "accepted".into(),
            comment_admin: None,
            is_draft: false,
            created_at: None,
            updated_at: None,
            version: 3,
        }
    }

    #[test]
    fn test_row_keeps_its_id() {
        let id = BillId::new_v4();
        let bill = to_bill(row(&id.as_string())).unwrap();
        assert_eq!(bill.id, id);
        assert_eq!(bill.status, BillStatus::Accepted);
        assert_eq!(bill.expense_type, Some(ExpenseType::Transports));
        assert_eq!(bill.metadata.version, 3);
    }

    #[test]
    fn test_row_with_malformed_id_is_skipped() {
        assert!(to_bill(row("not-a-uuid")).is_none());

        let rows = vec![row("legacy-42"), row(&BillId::new_v4().as_string())];
        assert_eq!(rows.into_iter().filter_map(to_bill).count(), 1);
    }
}
