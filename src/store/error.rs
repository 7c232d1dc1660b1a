/// Errors raised by the relational store adapter.
///
/// Every variant maps to one of the abstract error kinds the rest of the
/// system reasons about (`invalid-arguments`, `not-found`, `out-of-stock`,
/// `upstream-unavailable`); the tool layer is responsible for translating
/// these into the uniform tool-result failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("product {0} not found")]
    UnknownProduct(i64),

    #[error("order {0} not found")]
    UnknownOrder(i64),

    #[error("support ticket {0} not found")]
    UnknownTicket(i64),

    #[error("return {0} not found")]
    UnknownReturn(i64),

    #[error("product {product_id} is out of stock: requested {requested}, available {available}")]
    OutOfStock {
        product_id: i64,
        requested: i32,
        available: i32,
    },

    #[error("product_ids and quantities must be the same non-zero length")]
    MismatchedArrays,

    #[error("invalid quantity for product {product_id}: {quantity}")]
    InvalidQuantity { product_id: i64, quantity: i32 },

    #[error("product {product_id} is not part of order {order_id}")]
    ProductNotInOrder { order_id: i64, product_id: i64 },

    #[error(
        "return quantity {requested} for product {product_id} exceeds the remaining \
         returnable quantity {remaining} on order {order_id}"
    )]
    QuantityExceedsOrdered {
        order_id: i64,
        product_id: i64,
        requested: i32,
        remaining: i32,
    },

    #[error("no shipping rates found for zip {0}")]
    NoRates(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
