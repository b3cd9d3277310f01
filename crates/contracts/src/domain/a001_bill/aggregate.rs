use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};

/// Percentage applied when the form leaves `pct` empty
pub const DEFAULT_PCT: u32 = 20;

/// Wire and display format of bill dates
pub const BILL_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillId(pub Uuid);

impl BillId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for BillId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(BillId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Review state of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub const ALL: [BillStatus; 3] = [BillStatus::Pending, BillStatus::Accepted, BillStatus::Refused];

    /// Storage / wire code
    pub fn code(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(BillStatus::Pending),
            "accepted" => Some(BillStatus::Accepted),
            "refused" => Some(BillStatus::Refused),
            _ => None,
        }
    }

    /// Label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refusé",
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Expense category offered by the new bill form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpenseType {
    #[default]
    #[serde(rename = "Transports")]
    Transports,
    #[serde(rename = "Restaurants et bars")]
    RestaurantsAndBars,
    #[serde(rename = "Hôtel et logement")]
    HotelAndLodging,
    #[serde(rename = "Services en ligne")]
    OnlineServices,
    #[serde(rename = "IT et électronique")]
    ItAndElectronics,
    #[serde(rename = "Equipement et matériel")]
    Equipment,
    #[serde(rename = "Fournitures de bureau")]
    OfficeSupplies,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Transports,
        ExpenseType::RestaurantsAndBars,
        ExpenseType::HotelAndLodging,
        ExpenseType::OnlineServices,
        ExpenseType::ItAndElectronics,
        ExpenseType::Equipment,
        ExpenseType::OfficeSupplies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::RestaurantsAndBars => "Restaurants et bars",
            ExpenseType::HotelAndLodging => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::ItAndElectronics => "IT et électronique",
            ExpenseType::Equipment => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Expense report submitted by an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: Option<ExpenseType>,
    pub name: String,
    pub amount: f64,
    /// ISO date as stored; older records may carry a datetime or garbage
    pub date: String,
    pub vat: String,
    pub pct: u32,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: BillStatus,
    pub comment_admin: Option<String>,
    #[serde(default)]
    pub metadata: EntityMetadata,
}

impl Bill {
    /// Draft created when a receipt is uploaded, before the form is submitted
    pub fn new_draft(email: String, file_url: String, file_name: String) -> Self {
        Self {
            id: BillId::new_v4(),
            email,
            expense_type: None,
            name: String::new(),
            amount: 0.0,
            date: String::new(),
            vat: String::new(),
            pct: DEFAULT_PCT,
            commentary: String::new(),
            file_url: Some(file_url),
            file_name: Some(file_name),
            status: BillStatus::Pending,
            comment_admin: None,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Calendar date of the bill, if the stored value is parseable
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_bill_date(&self.date)
    }

    /// Copy the submitted fields onto the aggregate
    pub fn update(&mut self, dto: &BillDto) {
        self.expense_type = dto.expense_type;
        self.name = dto.name.trim().to_string();
        self.amount = dto.amount;
        self.date = dto.date.clone();
        self.vat = dto.vat.trim().to_string();
        self.pct = dto.pct.unwrap_or(DEFAULT_PCT);
        self.commentary = dto.commentary.clone();
        if dto.file_url.is_some() {
            self.file_url = dto.file_url.clone();
        }
        if dto.file_name.is_some() {
            self.file_name = dto.file_name.clone();
        }
        self.status = dto.status;
        self.comment_admin = dto.comment_admin.clone();
    }
}

impl AggregateRoot for Bill {
    type Id = BillId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "bill"
    }
}

/// Parse `YYYY-MM-DD`, also accepting a trailing time part (`2004-04-04T10:00:00Z`)
pub fn parse_bill_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, BILL_DATE_FORMAT).ok()
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Bill fields sent by the new bill form and by admin decisions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDto {
    #[serde(rename = "type")]
    pub expense_type: Option<ExpenseType>,
    pub name: String,
    pub amount: f64,
    pub date: String,
    pub vat: String,
    pub pct: Option<u32>,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: BillStatus,
    pub comment_admin: Option<String>,
}

impl BillDto {
    pub fn from_bill(bill: &Bill) -> Self {
        Self {
            expense_type: bill.expense_type,
            name: bill.name.clone(),
            amount: bill.amount,
            date: bill.date.clone(),
            vat: bill.vat.clone(),
            pct: Some(bill.pct),
            commentary: bill.commentary.clone(),
            file_url: bill.file_url.clone(),
            file_name: bill.file_name.clone(),
            status: bill.status,
            comment_admin: bill.comment_admin.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.expense_type.is_none() {
            return Err("Le type de dépense est obligatoire".into());
        }
        if parse_bill_date(&self.date).is_none() {
            return Err("La date doit être au format AAAA-MM-JJ".into());
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("Le montant doit être un nombre positif".into());
        }
        if let Some(pct) = self.pct {
            if pct > 100 {
                return Err("Le pourcentage doit être compris entre 0 et 100".into());
            }
        }
        if !self.vat.trim().is_empty() && self.vat.trim().parse::<f64>().is_err() {
            return Err("La TVA doit être un nombre".into());
        }
        Ok(())
    }
}

/// Response to a receipt upload: where the file lives and the draft bill key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedReceipt {
    pub file_url: String,
    pub key: String,
}
