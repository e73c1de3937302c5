//! Purchase orders.

use super::{null_as_default, status::CompletionStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Categories offered when recording a purchase. The backend accepts any string.
pub const ORDER_CATEGORIES: [&str; 5] = [
    "Attrezzatura",
    "Materiali",
    "Manutenzione",
    "Forniture",
    "Altro",
];

/// A purchase made for the club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: i64,
    /// What was bought
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Price in euro
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    /// Spending category
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Day of purchase
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    /// Pending until paid/delivered
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CompletionStatus,
    /// Free notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Author username
    #[serde(default)]
    pub created_by: Option<String>,
    /// Shift the purchase belongs to
    pub shift_id: i64,
    /// Author id
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Creation timestamp as sent by the backend
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp as sent by the backend
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for a new purchase order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    /// What was bought
    pub title: String,
    /// Price in euro
    pub amount: f64,
    /// Spending category
    pub category: String,
    /// Day of purchase
    pub order_date: NaiveDate,
    /// Initial status
    pub status: CompletionStatus,
    /// Free notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Shift the purchase belongs to (always a real shift)
    pub shift_id: i64,
}

/// Partial update of an order; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderUpdate {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// New category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New purchase day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,
    /// New status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CompletionStatus>,
    /// New notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_nullable_backend_fields_fall_back_to_defaults() -> Result<(), serde_json::Error> {
        let json = r#"{
            "id": 9,
            "title": null,
            "amount": null,
            "category": null,
            "status": null,
            "shift_id": 3
        }"#;
        let order: Order = serde_json::from_str(json)?;
        assert_eq!(order.title, "");
        assert_eq!(order.amount, 0.0);
        assert_eq!(order.status, CompletionStatus::Pending);
        assert_eq!(order.order_date, None);
        Ok(())
    }

    #[test]
    fn test_update_skips_untouched_fields() -> Result<(), serde_json::Error> {
        let update = OrderUpdate {
            status: Some(CompletionStatus::Completed),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update)?, r#"{"status":"completed"}"#);
        Ok(())
    }
}
