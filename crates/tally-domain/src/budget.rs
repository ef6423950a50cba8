//! Budget descriptor as seen by the metrics engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    #[serde(default, alias = "startingBalance", skip_serializing_if = "Option::is_none")]
    pub start_balance: Option<Decimal>,
    #[serde(default = "Budget::default_active")]
    pub is_active: bool,
}

impl Budget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_balance: None,
            is_active: Self::default_active(),
        }
    }

    pub fn with_start_balance(mut self, start_balance: Decimal) -> Self {
        self.start_balance = Some(start_balance);
        self
    }

    fn default_active() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_start_balance_reads_as_zero() {
        let raw = r#"{"id":"0b0a3c52-8a37-4a8e-9a8e-5d0cf1a6e2b4","name":"Household"}"#;
        let budget: Budget = serde_json::from_str(raw).expect("parse budget");
        assert_eq!(budget.start_balance, None);
                assert!(budget.is_active);
    }

    #[test]
    fn accepts_legacy_starting_balance_field() {
        let raw = r#"{"id":"0b0a3c52-8a37-4a8e-9a8e-5d0cf1a6e2b4","name":"Trip","startingBalance":"250.00","isActive":false}"#;
        let budget: Budget = serde_json::from_str(raw).expect("parse budget");
        assert_eq!(budget.start_balance, Some(dec!(250)));
        assert!(!budget.is_active);
    }
}
