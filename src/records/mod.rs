//! @ai:module:intent Record values and constructors for issues and billing corrections
//! @ai:module:layer domain
//! @ai:module:public_api Record, RecordKind, NewIssue, NewBillingCorrection, CorrectionType

pub mod forms;
pub mod kind;
pub mod record;
pub mod timestamp;

pub use forms::{amount_label, reason_label, CorrectionType, NewBillingCorrection, NewIssue, PatientVisit};
pub use kind::RecordKind;
pub use record::{Record, CREATED_AT_ALIASES, RESOLVED_AT_ALIASES, STATUS_OPEN, STATUS_RESOLVED};
pub use timestamp::{format_instant, parse_instant};
