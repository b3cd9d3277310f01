use contracts::domain::a001_bill::aggregate::{
    Bill, BillDto, BillStatus, ExpenseType, UploadedReceipt, DEFAULT_PCT,
};
use contracts::domain::a001_bill::receipt::{
    is_allowed_receipt, receipt_content_type, RECEIPT_FORMAT_MESSAGE,
};

use crate::routes::routes::Route;
use crate::shared::store::{ReceiptUpload, Store, StoreError};

/// Raw values of the form inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBillForm {
    pub expense_type: ExpenseType,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// Bill update sent when the form is submitted
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub bill_id: String,
    pub dto: BillDto,
}

/// State of the new bill page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBillViewModel {
    pub form: NewBillForm,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    /// Key of the draft bill created by the receipt upload
    pub bill_id: Option<String>,
    pub error: Option<String>,
    /// Bumped on every file pick; uploads started for an older pick are dropped
    selection: u64,
}

/// Browsers report `C:\fakepath\name.jpg` for file inputs
fn base_name(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path)
}

impl NewBillViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the picked receipt; returns whether it may be uploaded
    pub fn handle_change_file(&mut self, file_name: &str, alert: impl FnOnce(&str)) -> bool {
        self.selection += 1;
        self.file_url = None;
        self.bill_id = None;

        let name = base_name(file_name);
        if !is_allowed_receipt(name) {
            log::warn!("Rejected receipt '{}'", name);
            self.file_name = None;
            alert(RECEIPT_FORMAT_MESSAGE);
            return false;
        }

        self.file_name = Some(name.to_string());
        true
    }

    /// Current file pick, to be handed back with the upload result
    pub fn selection(&self) -> u64 {
        self.selection
    }

    /// Upload for the accepted receipt, unless another file was picked since
    pub fn upload_request(
        &self,
        selection: u64,
        email: &str,
        bytes: Vec<u8>,
    ) -> Option<ReceiptUpload> {
        if selection != self.selection {
            return None;
        }
        let file_name = self.file_name.clone()?;
        let content_type = receipt_content_type(&file_name)?.to_string();
        Some(ReceiptUpload {
            email: email.to_string(),
            file_name,
            content_type,
            bytes,
        })
    }

    /// Keep the uploaded receipt if it still belongs to the current pick
    pub fn apply_upload(&mut self, selection: u64, receipt: UploadedReceipt) -> bool {
        if selection != self.selection || self.file_name.is_none() {
            log::debug!("Dropping upload of an outdated receipt {}", receipt.file_url);
            return false;
        }
        self.file_url = Some(receipt.file_url);
        self.bill_id = Some(receipt.key);
        self.error = None;
        true
    }

    pub fn apply_upload_error(&mut self, selection: u64, message: String) {
        if selection == self.selection {
            self.error = Some(message);
        }
    }

    pub fn submit_request(&self) -> Result<SubmitRequest, String> {
        let (Some(bill_id), Some(file_url)) = (&self.bill_id, &self.file_url) else {
            return Err("Veuillez joindre un justificatif".into());
        };

        let form = &self.form;
        let amount = form
            .amount
            .trim()
            .parse::<f64>()
            .map_err(|_| "Le montant doit être un nombre positif".to_string())?;
        let pct = match form.pct.trim() {
            "" => DEFAULT_PCT,
            raw => raw
                .parse::<u32>()
                .map_err(|_| "Le pourcentage doit être compris entre 0 et 100".to_string())?,
        };

        let dto = BillDto {
            expense_type: Some(form.expense_type),
            name: form.name.trim().to_string(),
            amount,
            date: form.date.trim().to_string(),
            vat: form.vat.trim().to_string(),
            pct: Some(pct),
            commentary: form.commentary.clone(),
            file_url: Some(file_url.clone()),
            file_name: self.file_name.clone(),
            status: BillStatus::Pending,
            comment_admin: None,
        };
        dto.validate()?;

        Ok(SubmitRequest {
            bill_id: bill_id.clone(),
            dto,
        })
    }
}

pub async fn upload_receipt(
    store: &dyn Store,
    upload: ReceiptUpload,
) -> Result<UploadedReceipt, StoreError> {
    let receipt = store.bills().create(upload).await?;
    log::info!("Receipt uploaded to {}", receipt.file_url);
    Ok(receipt)
}

/// Save the bill, then go back to the list
pub async fn handle_submit(
    store: &dyn Store,
    request: SubmitRequest,
    on_navigate: impl FnOnce(Route),
) -> Result<Bill, StoreError> {
    let bill = store
        .bills()
        .update(&request.bill_id, &request.dto)
        .await?;
    on_navigate(Route::Bills);
    Ok(bill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::store::mock::{fixture_bills, MockStore};
    use futures::executor::block_on;

    fn filled_form() -> NewBillForm {
        NewBillForm {
            expense_type: ExpenseType::Transports,
            name: "Vol Paris Londres".into(),
            date: "2022-04-12".into(),
            amount: "348".into(),
            vat: "70".into(),
            pct: "20".into(),
            commentary: String::new(),
        }
    }

    fn uploaded(vm: &mut NewBillViewModel, store: &MockStore) {
        assert!(vm.handle_change_file("C:\\fakepath\\ticket.jpg", |_| panic!("no alert expected")));
        let selection = vm.selection();
        let upload = vm
            .upload_request(selection, "employee@test.tld", b"jpeg".to_vec())
            .unwrap();
        let receipt = block_on(upload_receipt(store, upload)).unwrap();
        assert!(vm.apply_upload(selection, receipt));
    }

    fn receipt(name: &str, key: &str) -> UploadedReceipt {
        UploadedReceipt {
            file_url: format!("/public/{}", name),
            key: key.into(),
        }
    }

    #[test]
    fn test_accepted_extensions_store_file_name() {
        for name in ["ticket.jpg", "ticket.JPEG", "scan.png"] {
            let mut vm = NewBillViewModel::new();
            let mut alerted = false;
            assert!(vm.handle_change_file(name, |_| alerted = true));
            assert!(!alerted);
            assert_eq!(vm.file_name.as_deref(), Some(name));
        }
    }

    #[test]
    fn test_other_extension_alerts_and_clears() {
        let mut vm = NewBillViewModel::new();
        let store = MockStore::default();
        uploaded(&mut vm, &store);

        let mut message = None;
        assert!(!vm.handle_change_file("facture.pdf", |m| message = Some(m.to_string())));
        assert_eq!(message.as_deref(), Some(RECEIPT_FORMAT_MESSAGE));
        assert_eq!(vm.file_name, None);
        assert_eq!(vm.file_url, None);
        assert_eq!(vm.bill_id, None);
        assert!(vm.upload_request(vm.selection(), "a@a", vec![1]).is_none());
    }

    #[test]
    fn test_upload_keeps_url_and_key() {
        let mut vm = NewBillViewModel::new();
        let store = MockStore::default();
        uploaded(&mut vm, &store);

        assert_eq!(vm.file_name.as_deref(), Some("ticket.jpg"));
        assert_eq!(vm.bill_id.as_deref(), Some("1234"));
        assert!(vm.file_url.as_deref().unwrap().ends_with("ticket.jpg"));

        let uploads = store.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].content_type, "image/jpeg");
        assert_eq!(uploads[0].email, "employee@test.tld");
    }

    #[test]
    fn test_submit_updates_once_and_navigates() {
        let store = MockStore::with_bills(fixture_bills());
        let mut vm = NewBillViewModel::new();
        uploaded(&mut vm, &store);
        vm.form = filled_form();

        let request = vm.submit_request().unwrap();
        assert_eq!(request.dto.status, BillStatus::Pending);
        assert_eq!(request.dto.pct, Some(20));

        let mut target = None;
        let bill = block_on(handle_submit(&store, request, |r| target = Some(r))).unwrap();

        assert_eq!(store.update_count(), 1);
        assert_eq!(target, Some(Route::Bills));
        assert_eq!(bill.name, "Vol Paris Londres");
    }

    #[test]
    fn test_failed_submit_stays_on_page() {
        let store = MockStore {
            update_error: Some(StoreError::Server),
            ..Default::default()
        };
        let mut vm = NewBillViewModel::new();
        uploaded(&mut vm, &store);
        vm.form = filled_form();

        let mut target = None;
        let result = block_on(handle_submit(&store, vm.submit_request().unwrap(), |r| {
            target = Some(r)
        }));

        assert_eq!(result.unwrap_err().to_string(), "Erreur 500");
        assert_eq!(target, None);
    }

    #[test]
    fn test_submit_requires_receipt_and_valid_fields() {
        let mut vm = NewBillViewModel::new();
        vm.form = filled_form();
        assert!(vm.submit_request().is_err());

        let store = MockStore::default();
        uploaded(&mut vm, &store);

        vm.form.amount = "abc".into();
        assert!(vm.submit_request().is_err());

        vm.form.amount = "12".into();
        vm.form.date = "12/04/2022".into();
        assert!(vm.submit_request().is_err());

        vm.form.date = "2022-04-12".into();
        vm.form.pct = String::new();
        assert_eq!(vm.submit_request().unwrap().dto.pct, Some(DEFAULT_PCT));
    }

    #[test]
    fn test_late_upload_after_rejected_pick_is_dropped() {
        let mut vm = NewBillViewModel::new();
        vm.form = filled_form();

        assert!(vm.handle_change_file("a.jpg", |_| ()));
        let first = vm.selection();
        assert!(vm.upload_request(first, "a@a", vec![1]).is_some());

        let mut alerted = false;
        assert!(!vm.handle_change_file("b.pdf", |_| alerted = true));
        assert!(alerted);

        assert!(!vm.apply_upload(first, receipt("a.jpg", "draft-a")));
        assert_eq!(vm.file_url, None);
        assert_eq!(vm.bill_id, None);
        assert!(vm.submit_request().is_err());
    }

    #[test]
    fn test_only_latest_pick_is_kept() {
        let mut vm = NewBillViewModel::new();
        vm.form = filled_form();

        assert!(vm.handle_change_file("a.jpg", |_| ()));
        let first = vm.selection();
        assert!(vm.handle_change_file("b.png", |_| ()));
        let second = vm.selection();

        // The first file must not be sent under the second name
        assert!(vm.upload_request(first, "a@a", vec![1]).is_none());

        assert!(vm.apply_upload(second, receipt("b.png", "draft-b")));
        assert!(!vm.apply_upload(first, receipt("a.jpg", "draft-a")));
        vm.apply_upload_error(first, "Erreur 500".into());

        let request = vm.submit_request().unwrap();
        assert_eq!(request.bill_id, "draft-b");
        assert_eq!(request.dto.file_url.as_deref(), Some("/public/b.png"));
        assert_eq!(request.dto.file_name.as_deref(), Some("b.png"));
        assert_eq!(vm.error, None);
    }
}
