use contracts::domain::a001_bill::aggregate::{Bill, BillDto, BillStatus};

use crate::shared::store::{Store, StoreError};

/// Bills sharing one status, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct StatusGroup {
    pub status: BillStatus,
    pub bills: Vec<Bill>,
}

impl StatusGroup {
    pub fn count(&self) -> usize {
        self.bills.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DashboardState {
    #[default]
    Loading,
    Loaded(Vec<StatusGroup>),
    Failed(StoreError),
}

/// One group per status, in `BillStatus::ALL` order, empty groups included
pub fn group_by_status(bills: &[Bill]) -> Vec<StatusGroup> {
    BillStatus::ALL
        .iter()
        .map(|status| {
            let mut group: Vec<Bill> = bills
                .iter()
                .filter(|b| b.status == *status)
                .cloned()
                .collect();
            group.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
            StatusGroup {
                status: *status,
                bills: group,
            }
        })
        .collect()
}

/// Payload accepting or refusing `bill`
pub fn decision(bill: &Bill, status: BillStatus, comment_admin: &str) -> BillDto {
    let comment = comment_admin.trim();
    BillDto {
        status,
        comment_admin: (!comment.is_empty()).then(|| comment.to_string()),
        ..BillDto::from_bill(bill)
    }
}

pub async fn load_groups(store: &dyn Store) -> Result<Vec<StatusGroup>, StoreError> {
    let bills = store.bills().list().await?;
    Ok(group_by_status(&bills))
}

pub async fn handle_decision(
    store: &dyn Store,
    bill: &Bill,
    status: BillStatus,
    comment_admin: &str,
) -> Result<Bill, StoreError> {
    let dto = decision(bill, status, comment_admin);
    let saved = store.bills().update(&bill.to_string_id(), &dto).await?;
    log::info!("Bill {} set to {}", saved.to_string_id(), saved.status.code());
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::store::mock::{fixture_bills, MockStore};
    use futures::executor::block_on;

    #[test]
    fn test_groups_by_status() {
        let groups = group_by_status(&fixture_bills());

        let summary: Vec<(BillStatus, usize)> =
            groups.iter().map(|g| (g.status, g.count())).collect();
        assert_eq!(
            summary,
            [
                (BillStatus::Pending, 1),
                (BillStatus::Accepted, 2),
                (BillStatus::Refused, 1)
            ]
        );
        let accepted: Vec<&str> = groups[1].bills.iter().map(|b| b.date.as_str()).collect();
        assert_eq!(accepted, ["2003-03-03", "2002-02-02"]);
    }

    #[test]
    fn test_empty_list_keeps_three_groups() {
        let groups = group_by_status(&[]);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.count() == 0));
    }

    #[test]
    fn test_decision_payload() {
        let bill = fixture_bills().remove(0);
        let dto = decision(&bill, BillStatus::Refused, "  hors politique  ");
        assert_eq!(dto.status, BillStatus::Refused);
        assert_eq!(dto.comment_admin.as_deref(), Some("hors politique"));
        assert_eq!(dto.name, bill.name);
        assert_eq!(dto.file_url, bill.file_url);

        assert_eq!(decision(&bill, BillStatus::Accepted, " ").comment_admin, None);
    }

    #[test]
    fn test_handle_decision_updates_store() {
        let bills = fixture_bills();
        let store = MockStore::with_bills(bills.clone());

        let saved =
            block_on(handle_decision(&store, &bills[0], BillStatus::Accepted, "ok")).unwrap();

        assert_eq!(saved.status, BillStatus::Accepted);
        assert_eq!(store.update_count(), 1);
        let updates = store.updates.lock().unwrap();
        assert_eq!(updates[0].0, bills[0].to_string_id());
    }

    #[test]
    fn test_load_failure() {
        let store = MockStore::failing_list(StoreError::Server);
        assert_eq!(block_on(load_groups(&store)), Err(StoreError::Server));
    }
}
