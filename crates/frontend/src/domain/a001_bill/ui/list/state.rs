use contracts::domain::a001_bill::aggregate::{parse_bill_date, Bill};

use crate::routes::routes::Route;
use crate::shared::date_utils::format_date;
use crate::shared::store::{Store, StoreError};

/// One line of the bills table
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub id: String,
    pub expense_type: String,
    pub name: String,
    /// `YYYY-MM-DD`, or the stored value when it does not parse
    pub date: String,
    pub amount: f64,
    pub status: String,
    pub file_url: Option<String>,
}

impl From<&Bill> for BillRow {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.to_string_id(),
            expense_type: bill
                .expense_type
                .map(|t| t.label().to_string())
                .unwrap_or_default(),
            name: bill.name.clone(),
            date: format_date(&bill.date),
            amount: bill.amount,
            status: bill.status.label().to_string(),
            file_url: bill.file_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum BillsState {
    #[default]
    Loading,
    Loaded(Vec<BillRow>),
    Failed(StoreError),
}

/// Receipt shown in the preview modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptPreview {
    pub url: String,
}

/// Bills of the current user with display dates, in store order
pub async fn get_bills(store: &dyn Store) -> Result<Vec<BillRow>, StoreError> {
    let bills = store.bills().list().await?;
    log::debug!("Fetched {} bills", bills.len());
    Ok(bills.iter().map(BillRow::from).collect())
}

/// Newest first; rows whose date does not parse go last
pub fn rows_for_display(mut rows: Vec<BillRow>) -> Vec<BillRow> {
    rows.sort_by(|a, b| parse_bill_date(&b.date).cmp(&parse_bill_date(&a.date)));
    rows
}

pub fn handle_click_new_bill(on_navigate: impl FnOnce(Route)) {
    on_navigate(Route::NewBill);
}

/// `bill_url` is the `data-bill-url` attribute of the clicked eye icon
pub fn handle_click_icon_eye(bill_url: &str) -> Option<ReceiptPreview> {
    let url = bill_url.trim();
    if url.is_empty() || url == "null" {
        log::warn!("Bill has no receipt to preview");
        return None;
    }
    Some(ReceiptPreview {
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::store::mock::{fixture_bills, MockStore};
    use futures::executor::block_on;

    #[test]
    fn test_rows_are_newest_first() {
        let store = MockStore::with_bills(fixture_bills());
        let rows = rows_for_display(block_on(get_bills(&store)).unwrap());

        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]);
    }

    #[test]
    fn test_get_bills_keeps_store_order_and_formats() {
        let mut bills = fixture_bills();
        bills[1].date = "2001-01-01T10:00:00.000Z".into();
        let store = MockStore::with_bills(bills);
        let rows = block_on(get_bills(&store)).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].name, "encore");
        assert_eq!(rows[1].date, "2001-01-01");
        assert_eq!(rows[0].status, "En attente");
        assert_eq!(rows[0].expense_type, "Hôtel et logement");
    }

    #[test]
    fn test_unparsable_date_is_kept_and_sorted_last() {
        let mut bills = fixture_bills();
        bills[0].date = "pas une date".into();
        let store = MockStore::with_bills(bills);
        let rows = rows_for_display(block_on(get_bills(&store)).unwrap());

        assert_eq!(rows.last().unwrap().date, "pas une date");
        assert_eq!(rows[0].date, "2003-03-03");
    }

    #[test]
    fn test_store_errors_give_messages() {
        let store = MockStore::failing_list(StoreError::from_status(404));
        let err = block_on(get_bills(&store)).unwrap_err();
        assert_eq!(err.to_string(), "Erreur 404");

        let store = MockStore::failing_list(StoreError::from_status(500));
        let err = block_on(get_bills(&store)).unwrap_err();
        assert_eq!(err.to_string(), "Erreur 500");
    }

    #[test]
    fn test_click_icon_eye_opens_preview() {
        let rows = block_on(get_bills(&MockStore::with_bills(fixture_bills()))).unwrap();
        let url = rows[0].file_url.clone().unwrap();

        let preview = handle_click_icon_eye(&url);
        assert_eq!(preview, Some(ReceiptPreview { url }));
        assert_eq!(handle_click_icon_eye(""), None);
    }

    #[test]
    fn test_click_new_bill_navigates() {
        let mut target = None;
        handle_click_new_bill(|route| target = Some(route));
        assert_eq!(target, Some(Route::NewBill));
    }
}
