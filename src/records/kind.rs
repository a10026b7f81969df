//! @ai:module:intent Record kinds and their sheet names
//! @ai:module:layer domain
//! @ai:module:public_api RecordKind
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Which collection a record belongs to
/// @ai:effects pure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Issues,
    Billing,
}

impl RecordKind {
    /// @ai:intent Name of the sheet holding this collection in the remote store
    /// @ai:effects pure
    pub fn sheet_name(&self) -> &'static str {
        match self {
            RecordKind::Issues => "Issues",
            RecordKind::Billing => "Billing",
        }
    }

    /// @ai:intent Convert kind to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Issues => "issues",
            RecordKind::Billing => "billing",
        }
    }

    /// @ai:intent Status shown for a record that has no status field
    /// @ai:effects pure
    pub fn default_status_label(&self) -> &'static str {
        match self {
            RecordKind::Issues => "Open",
            RecordKind::Billing => "Pending",
        }
    }

    pub fn all() -> [RecordKind; 2] {
        [RecordKind::Issues, RecordKind::Billing]
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_names() {
        assert_eq!(RecordKind::Issues.sheet_name(), "Issues");
        assert_eq!(RecordKind::Billing.sheet_name(), "Billing");
    }

    #[test]
    fn test_default_status_label() {
        assert_eq!(RecordKind::Issues.default_status_label(), "Open");
        assert_eq!(RecordKind::Billing.default_status_label(), "Pending");
    }
}
