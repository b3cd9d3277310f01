//! Store client: the typed seam between containers and the remote API.
//!
//! Containers only see `Store`; the HTTP implementation lives in
//! `domain::a001_bill::api`, tests plug in-memory mocks.

use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::a001_bill::aggregate::{Bill, BillDto, UploadedReceipt};
use thiserror::Error;

/// Failure of a store call. `Display` is the message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Erreur 404")]
    NotFound,
    #[error("Erreur 500")]
    Server,
    #[error("Erreur 401")]
    Unauthorized,
    #[error("Erreur {0}")]
    Status(u16),
    #[error("Erreur réseau : {0}")]
    Network(String),
    #[error("Réponse invalide : {0}")]
    Decode(String),
}

impl StoreError {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => StoreError::Unauthorized,
            404 => StoreError::NotFound,
            500 => StoreError::Server,
            other => StoreError::Status(other),
        }
    }
}

/// Receipt picked in the new bill form, ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptUpload {
    pub email: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The `bills` collection of the store
#[async_trait(?Send)]
pub trait BillsStore {
    /// Bills of the current user (all bills for an admin)
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;

    /// Upload a receipt; the store creates the draft bill it belongs to
    async fn create(&self, upload: ReceiptUpload) -> Result<UploadedReceipt, StoreError>;

    async fn update(&self, id: &str, dto: &BillDto) -> Result<Bill, StoreError>;
}

pub trait Store: Send + Sync {
    fn bills(&self) -> &dyn BillsStore;
}

/// Handle provided through context by `App`
pub type SharedStore = Arc<dyn Store>;

pub fn use_store() -> SharedStore {
    leptos::prelude::use_context::<SharedStore>().expect("Store context not found")
}

#[cfg(test)]
pub mod mock {
    //! In-memory store used by container tests.

    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockStore {
        pub bills: Vec<Bill>,
        /// Returned by `list` instead of `bills` when set
        pub list_error: Option<StoreError>,
        pub create_error: Option<StoreError>,
        pub update_error: Option<StoreError>,
        pub uploads: Mutex<Vec<ReceiptUpload>>,
        pub updates: Mutex<Vec<(String, BillDto)>>,
    }

    impl MockStore {
        pub fn with_bills(bills: Vec<Bill>) -> Self {
            Self {
                bills,
                ..Default::default()
            }
        }

        pub fn failing_list(error: StoreError) -> Self {
            Self {
                list_error: Some(error),
                ..Default::default()
            }
        }

        pub fn update_count(&self) -> usize {
            self.updates.lock().unwrap().len()
        }
    }

    #[async_trait(?Send)]
    impl BillsStore for MockStore {
        async fn list(&self) -> Result<Vec<Bill>, StoreError> {
            match &self.list_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.bills.clone()),
            }
        }

        async fn create(&self, upload: ReceiptUpload) -> Result<UploadedReceipt, StoreError> {
            if let Some(e) = &self.create_error {
                return Err(e.clone());
            }
            let file_url = format!("https://localhost:3456/images/{}", upload.file_name);
            self.uploads.lock().unwrap().push(upload);
            Ok(UploadedReceipt {
                file_url,
                key: "1234".into(),
            })
        }

        async fn update(&self, id: &str, dto: &BillDto) -> Result<Bill, StoreError> {
            if let Some(e) = &self.update_error {
                return Err(e.clone());
            }
            self.updates
                .lock()
                .unwrap()
                .push((id.to_string(), dto.clone()));
            let mut bill = self
                .bills
                .iter()
                .find(|b| b.to_string_id() == id)
                .cloned()
                .unwrap_or_else(|| {
                    Bill::new_draft("a@a".into(), String::new(), String::new())
                });
            bill.update(dto);
            Ok(bill)
        }
    }

    impl Store for MockStore {
        fn bills(&self) -> &dyn BillsStore {
            self
        }
    }

    /// Bills matching the fixture used across container tests
    pub fn fixture_bills() -> Vec<Bill> {
        use contracts::domain::a001_bill::aggregate::{BillStatus, ExpenseType};

        let make = |name: &str, date: &str, amount: f64, status: BillStatus, file: &str| {
            let mut bill = Bill::new_draft(
                "a@a".into(),
                format!("https://test.storage.tld/{}", file),
                file.into(),
            );
            bill.update(&BillDto {
                expense_type: Some(ExpenseType::HotelAndLodging),
                name: name.into(),
                amount,
                date: date.into(),
                vat: "80".into(),
                pct: Some(20),
                commentary: "séminaire billed".into(),
                status,
                ..Default::default()
            });
            bill
        };

        vec![
            make("encore", "2004-04-04", 400.0, BillStatus::Pending, "preview-facture-free-201801-pdf-1.jpg"),
            make("test1", "2001-01-01", 100.0, BillStatus::Refused, "1592770761.jpeg"),
            make("test3", "2003-03-03", 300.0, BillStatus::Accepted, "facture-client-php-exportee.jpg"),
            make("test2", "2002-02-02", 200.0, BillStatus::Accepted, "facturefreemobile.jpg"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_and_messages() {
        assert_eq!(StoreError::from_status(404), StoreError::NotFound);
        assert_eq!(StoreError::from_status(500), StoreError::Server);
        assert_eq!(StoreError::from_status(401), StoreError::Unauthorized);
        assert_eq!(StoreError::from_status(403), StoreError::Status(403));

        assert_eq!(StoreError::NotFound.to_string(), "Erreur 404");
        assert_eq!(StoreError::Server.to_string(), "Erreur 500");
        assert_eq!(StoreError::Status(403).to_string(), "Erreur 403");
    }
}
