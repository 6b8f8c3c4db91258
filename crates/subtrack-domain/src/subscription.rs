//! The subscription record tracked by the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::SubscriptionCategory;
use crate::common::*;

pub const DEFAULT_COLOR: &str = "blue";

/// A recurring payment obligation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionRecord {
    pub id: Uuid,
    pub name: String,
    /// Amount charged per `billing_cycle`, not normalized.
    pub price: f64,
    pub billing_cycle: BillingCycle,
    pub category: SubscriptionCategory,
    pub next_billing_date: NaiveDate,
    pub is_active: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub repetition_type: RepetitionType,
}

fn default_color() -> String {
    DEFAULT_COLOR.into()
}

impl SubscriptionRecord {
    /// Creates an active record whose repetition follows its billing cycle.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        billing_cycle: BillingCycle,
        category: SubscriptionCategory,
        next_billing_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            billing_cycle,
            category,
            next_billing_date,
            is_active: true,
            notes: String::new(),
            color: default_color(),
            repetition_type: billing_cycle.into(),
        }
    }

    pub fn with_repetition(mut self, repetition_type: RepetitionType) -> Self {
        self.repetition_type = repetition_type;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn renews_automatically(&self) -> bool {
        self.repetition_type.is_enabled()
    }
}

impl Identifiable for SubscriptionRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for SubscriptionRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_defaults() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let record = SubscriptionRecord::new(
            "Backblaze",
            7.0,
            BillingCycle::Quarterly,
            SubscriptionCategory::Cloud,
            date,
        );
        assert!(record.is_active);
        assert_eq!(record.repetition_type, RepetitionType::Quarterly);
        assert_eq!(record.color, DEFAULT_COLOR);
        assert!(record.notes.is_empty());
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let json = r#"{
            "id": "6f1c1c2e-8a43-4b61-9e0e-6f3c7c1b2a10",
            "name": "Legacy",
            "price": 4.5,
            "billing_cycle": "monthly",
            "category": "news",
            "next_billing_date": "2025-05-10",
            "is_active": true
        }"#;
        let record: SubscriptionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.repetition_type, RepetitionType::Monthly);
        assert_eq!(record.color, DEFAULT_COLOR);
        assert_eq!(record.category, SubscriptionCategory::News);
    }
}
