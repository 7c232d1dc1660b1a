use rust_decimal::Decimal;
use tracing::info;

use crate::models::{NewReturn, OrderItem, ReturnItem, ReturnOrder, ReturnOrderWithItems, ReturnStatus};

use super::{Store, StoreError};

impl Store {
    /// If both product arrays are absent or empty, the entire order is
    /// returned (one return item per order item, full quantities).
    /// Otherwise every (product_id, quantity) pair is validated against the
    /// order's items and the product's remaining returnable quantity
    /// (ordered quantity minus the sum of all *non-rejected* prior returns
    /// for that product on that order).
    pub async fn create_return(&self, new_return: NewReturn) -> Result<i64, StoreError> {
        let order_items = self.get_order_items(new_return.order_id).await?;
        if order_items.is_empty() {
            return Err(StoreError::UnknownOrder(new_return.order_id));
        }

        let ids_empty = new_return.product_ids.as_ref().map_or(true, |v| v.is_empty());
        let quantities_empty = new_return.quantities.as_ref().map_or(true, |v| v.is_empty());

        let requested: Vec<(i64, i32)> = if ids_empty && quantities_empty {
            order_items.iter().map(|i| (i.product_id, i.quantity)).collect()
        } else {
            match (&new_return.product_ids, &new_return.quantities) {
                (Some(ids), Some(quantities)) if ids.len() == quantities.len() => {
                    ids.iter().copied().zip(quantities.iter().copied()).collect()
                }
                _ => return Err(StoreError::MismatchedArrays),
            }
        };

        let mut tx = self.pool.begin().await?;

        let mut refund_total = Decimal::ZERO;
        let mut line_items: Vec<(i64, i32, Decimal)> = Vec::with_capacity(requested.len());

        for (product_id, quantity) in &requested {
            let order_item = find_order_item(&order_items, *product_id)
                .ok_or(StoreError::ProductNotInOrder {
                    order_id: new_return.order_id,
                    product_id: *product_id,
                })?;

            let already_returned = self
                .sum_non_rejected_returned_quantity(&mut tx, new_return.order_id, *product_id)
                .await?;
            let remaining = order_item.quantity - already_returned;

            if *quantity < 1 || *quantity > remaining {
                return Err(StoreError::QuantityExceedsOrdered {
                    order_id: new_return.order_id,
                    product_id: *product_id,
                    requested: *quantity,
                    remaining,
                });
            }

            refund_total += order_item.price_at_purchase * Decimal::from(*quantity);
            line_items.push((*product_id, *quantity, order_item.price_at_purchase));
        }

        let return_id: i64 = sqlx::query_scalar(
            "INSERT INTO return_orders (order_id, reason, status, refund_total) \
             VALUES ($1, $2, 'pending', $3) RETURNING id",
        )
        .bind(new_return.order_id)
        .bind(&new_return.reason)
        .bind(refund_total)
        .fetch_one(&mut *tx)
        .await?;

        for (product_id, quantity, price_at_purchase) in &line_items {
            sqlx::query(
                "INSERT INTO return_items (return_id, product_id, quantity, price_at_purchase) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(return_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price_at_purchase)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(return_id, order_id = new_return.order_id, %refund_total, "return created");
        Ok(return_id)
    }

    async fn sum_non_rejected_returned_quantity(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        order_id: i64,
        product_id: i64,
    ) -> Result<i32, StoreError> {
        let sum: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(ri.quantity) FROM return_items ri \
             JOIN return_orders ro ON ro.id = ri.return_id \
             WHERE ro.order_id = $1 AND ri.product_id = $2 AND ro.status != 'rejected'",
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(sum.unwrap_or(0) as i32)
    }

    pub async fn get_return(&self, id: i64) -> Result<ReturnOrderWithItems, StoreError> {
        let return_order = sqlx::query_as::<_, ReturnOrder>(
            "SELECT id, order_id, reason, status, refund_total, created_at, processed_at \
             FROM return_orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::UnknownReturn(id))?;

        let items = sqlx::query_as::<_, ReturnItem>(
            "SELECT return_id, product_id, quantity, price_at_purchase FROM return_items \
             WHERE return_id = $1 ORDER BY product_id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ReturnOrderWithItems { return_order, items })
    }

    pub async fn list_returns(&self, order_id: Option<i64>) -> Result<Vec<ReturnOrder>, StoreError> {
        let returns = match order_id {
            Some(order_id) => {
                sqlx::query_as::<_, ReturnOrder>(
                    "SELECT id, order_id, reason, status, refund_total, created_at, processed_at \
                     FROM return_orders WHERE order_id = $1 ORDER BY created_at DESC",
                )
                .bind(order_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ReturnOrder>(
                    "SELECT id, order_id, reason, status, refund_total, created_at, processed_at \
                     FROM return_orders ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(returns)
    }

    /// `processed_at` is set iff the new status is `processed`.
    pub async fn update_return_status(&self, id: i64, new_status: ReturnStatus) -> Result<(), StoreError> {
        let result = if new_status == ReturnStatus::Processed {
            sqlx::query("UPDATE return_orders SET status = $1, processed_at = now() WHERE id = $2")
                .bind(new_status)
                .bind(id)
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query("UPDATE return_orders SET status = $1 WHERE id = $2")
                .bind(new_status)
                .bind(id)
                .execute(&self.pool)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownReturn(id));
        }
        Ok(())
    }
}

fn find_order_item(items: &[OrderItem], product_id: i64) -> Option<&OrderItem> {
    items.iter().find(|i| i.product_id == product_id)
}
