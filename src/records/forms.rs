//! @ai:module:intent Constructors for new issues and billing corrections, plus billing row labels
//! @ai:module:layer domain
//! @ai:module:public_api NewIssue, NewBillingCorrection, PatientVisit, CorrectionType
//! @ai:module:stateless true

use crate::records::record::{Record, STATUS_OPEN};
use crate::records::timestamp::format_instant;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// @ai:intent Fields entered when reporting an application issue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewIssue {
    pub reporter: String,
    pub department: String,
    pub title: String,
    pub description: String,
}

impl NewIssue {
    /// @ai:intent Build the record appended to the Issues sheet
    /// @ai:post status is Open, createdAt is set, no resolution fields
    /// @ai:effects pure
    pub fn into_record(self, now: DateTime<Utc>) -> Record {
        Record::new()
            .with("reporter", self.reporter)
            .with("department", self.department)
            .with("title", self.title)
            .with("description", self.description)
            .with("date", display_date(now))
            .with("status", STATUS_OPEN)
            .with("createdAt", format_instant(now))
    }
}

/// @ai:intent Kind of billing correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionType {
    Discount,
    #[serde(rename = "Price Change")]
    PriceChange,
    Refund,
}

impl CorrectionType {
    /// @ai:intent Label stored in the record's "type" field
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionType::Discount => "Discount",
            CorrectionType::PriceChange => "Price Change",
            CorrectionType::Refund => "Refund",
        }
    }

    /// @ai:intent Recover the correction type from a stored record
    /// @ai:effects pure
    pub fn of(record: &Record) -> Option<Self> {
        match record.text("type")?.as_str() {
            "Discount" => Some(CorrectionType::Discount),
            "Price Change" => Some(CorrectionType::PriceChange),
            "Refund" => Some(CorrectionType::Refund),
            _ => None,
        }
    }
}

impl std::fmt::Display for CorrectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Patient and bill details shared by discounts and refunds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientVisit {
    pub location: String,
    pub bill_no: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_ph: String,
    pub doctor: String,
    pub service: String,
    pub bill_date: String,
}

impl PatientVisit {
    fn write_into(self, record: Record) -> Record {
        record
            .with("location", self.location)
            .with("billNo", self.bill_no)
            .with("patientId", self.patient_id)
            .with("patientName", self.patient_name)
            .with("patientPh", self.patient_ph)
            .with("doctor", self.doctor)
            .with("service", self.service)
            .with("billDate", self.bill_date)
    }
}

/// @ai:intent Fields entered when requesting a billing correction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NewBillingCorrection {
    Discount {
        visit: PatientVisit,
        requested_by: String,
        reason: String,
        amount: String,
        percent: String,
        month: String,
    },
    PriceChange {
        location: String,
        bill_no: String,
        patient_id: String,
        change_from: String,
        change_to: String,
    },
    Refund {
        visit: PatientVisit,
        requested_by: String,
        approved_by: String,
        amount: String,
    },
}

impl NewBillingCorrection {
    pub fn correction_type(&self) -> CorrectionType {
        match self {
            NewBillingCorrection::Discount { .. } => CorrectionType::Discount,
            NewBillingCorrection::PriceChange { .. } => CorrectionType::PriceChange,
            NewBillingCorrection::Refund { .. } => CorrectionType::Refund,
        }
    }

    /// @ai:intent Build the record appended to the Billing sheet
    /// @ai:post type and createdAt are set, status is left unset (shown as Pending)
    /// @ai:effects pure
    pub fn into_record(self, now: DateTime<Utc>) -> Record {
        let base = Record::new()
            .with("type", self.correction_type().as_str())
            .with("createdAt", format_instant(now));

        match self {
            NewBillingCorrection::Discount {
                visit,
                requested_by,
                reason,
                amount,
                percent,
                month,
            } => visit
                .write_into(base)
                .with("discountRequestedBy", requested_by)
                .with("reasonForDiscount", reason)
                .with("discountAmount", amount)
                .with("discountPercent", percent)
                .with("month", month),
            NewBillingCorrection::PriceChange {
                location,
                bill_no,
                patient_id,
                change_from,
                change_to,
            } => base
                .with("location", location)
                .with("billNo", bill_no)
                .with("patientId", patient_id)
                .with("changeFrom", change_from)
                .with("changeTo", change_to),
            NewBillingCorrection::Refund {
                visit,
                requested_by,
                approved_by,
                amount,
            } => visit
                .write_into(base)
                .with("refundRequestedBy", requested_by)
                .with("refundApprovedBy", approved_by)
                .with("refundAmount", amount),
        }
    }
}

/// @ai:intent Amount column for a billing row
/// @ai:effects pure
pub fn amount_label(record: &Record) -> String {
    match CorrectionType::of(record) {
        Some(CorrectionType::Discount) => record.text_or_empty("discountAmount"),
        Some(CorrectionType::PriceChange) => format!(
            "{} → {}",
            record.text_or_empty("changeFrom"),
            record.text_or_empty("changeTo")
        ),
        Some(CorrectionType::Refund) => record.text_or_empty("refundAmount"),
        None => String::new(),
    }
}

/// @ai:intent Reason column for a billing row
/// @ai:effects pure
pub fn reason_label(record: &Record) -> String {
    match CorrectionType::of(record) {
        Some(CorrectionType::Discount) => record.text_or_empty("reasonForDiscount"),
        Some(CorrectionType::PriceChange) => "Price Adjustment".to_string(),
        Some(CorrectionType::Refund) => record.text_or_empty("refundApprovedBy"),
        None => String::new(),
    }
}

/// Local wall-clock rendering kept in the "date" column, e.g. "1/2/2025, 3:04:05 PM".
fn display_date(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}
