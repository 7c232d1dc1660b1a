use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// `cancelled` is reachable from any non-terminal status; no other
    /// transition is guarded at this layer (the store adapter itself never
    /// validates transitions, per the accompanying design notes).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

/// An order item joined with the product's *current* display name, per
/// `get-order-with-product-names` — the name reflects product-table state
/// at read time while quantity and price stay historical.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItemWithProductName {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price_at_purchase: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemWithProductName>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub product_ids: Vec<i64>,
    pub quantities: Vec<i32>,
}
