use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "return_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Processed,
}

impl ReturnStatus {
    /// A rejected return never paid out, so it must not count against the
    /// per-product accumulated-return-quantity budget.
    pub fn counts_against_returned_budget(&self) -> bool {
        !matches!(self, ReturnStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReturnOrder {
    pub id: i64,
    pub order_id: i64,
    pub reason: String,
    pub status: ReturnStatus,
    pub refund_total: Decimal,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReturnItem {
    pub return_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnOrderWithItems {
    #[serde(flatten)]
    pub return_order: ReturnOrder,
    pub items: Vec<ReturnItem>,
}

#[derive(Debug, Clone)]
pub struct NewReturn {
    pub order_id: i64,
    pub reason: String,
    /// `None` (on both) means "return the entire order".
    pub product_ids: Option<Vec<i64>>,
    pub quantities: Option<Vec<i32>>,
}
