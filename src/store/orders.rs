use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::{NewOrder, Order, OrderItem, OrderItemWithProductName, OrderStatus, OrderWithItems};

use super::{Store, StoreError};

impl Store {
    /// Validates arrays, checks stock under row locks, and persists the
    /// order header plus items plus stock decrements in one transaction.
    /// Either everything lands or nothing does.
    pub async fn create_order(&self, new_order: NewOrder) -> Result<i64, StoreError> {
        if new_order.product_ids.is_empty()
            || new_order.product_ids.len() != new_order.quantities.len()
        {
            return Err(StoreError::MismatchedArrays);
        }
        for (&product_id, &quantity) in new_order.product_ids.iter().zip(&new_order.quantities) {
            if quantity < 1 {
                return Err(StoreError::InvalidQuantity { product_id, quantity });
            }
        }

        let mut tx = self.pool.begin().await?;

        let mut total_amount = Decimal::ZERO;
        let mut prices = Vec::with_capacity(new_order.product_ids.len());

        for (&product_id, &quantity) in new_order.product_ids.iter().zip(&new_order.quantities) {
            // FOR UPDATE prevents two concurrent orders on the same product
            // from each observing sufficient stock and together overselling.
            let row = sqlx::query_as::<_, (Decimal, i32)>(
                "SELECT price, stock_quantity FROM products WHERE id = $1 FOR UPDATE",
            )
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::UnknownProduct(product_id))?;

            let (price, stock) = row;
            if stock < quantity {
                return Err(StoreError::OutOfStock {
                    product_id,
                    requested: quantity,
                    available: stock,
                });
            }

            total_amount += price * Decimal::from(quantity);
            prices.push(price);
        }

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders \
             (customer_name, customer_email, customer_phone, street_address, city, state, \
              zip_code, status, total_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8) RETURNING id",
        )
        .bind(&new_order.customer_name)
        .bind(&new_order.customer_email)
        .bind(&new_order.customer_phone)
        .bind(&new_order.street_address)
        .bind(&new_order.city)
        .bind(&new_order.state)
        .bind(&new_order.zip_code)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        for ((&product_id, &quantity), price) in
            new_order.product_ids.iter().zip(&new_order.quantities).zip(prices)
        {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price_at_purchase) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET stock_quantity = stock_quantity - $1 WHERE id = $2")
                .bind(quantity)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(order_id, %total_amount, "order created");
        Ok(order_id)
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, StoreError> {
        sqlx::query_as::<_, Order>(
            "SELECT id, customer_name, customer_email, customer_phone, street_address, city, \
             state, zip_code, status, total_amount, created_at, updated_at \
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::UnknownOrder(id))
    }

    /// Joins items with *current* product names for display; quantities and
    /// prices come from the historical item rows.
    pub async fn get_order_with_product_names(&self, id: i64) -> Result<OrderWithItems, StoreError> {
        let order = self.get_order(id).await?;
        let items = sqlx::query_as::<_, OrderItemWithProductName>(
            "SELECT oi.product_id, p.name AS product_name, oi.quantity, oi.price_at_purchase \
             FROM order_items oi JOIN products p ON p.id = oi.product_id \
             WHERE oi.order_id = $1 ORDER BY oi.product_id ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(OrderWithItems { order, items })
    }

    pub async fn get_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
        Ok(sqlx::query_as::<_, OrderItem>(
            "SELECT order_id, product_id, quantity, price_at_purchase FROM order_items \
             WHERE order_id = $1 ORDER BY product_id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreError> {
        let orders = match status {
            Some(status) => {
                sqlx::query_as::<_, Order>(
                    "SELECT id, customer_name, customer_email, customer_phone, street_address, \
                     city, state, zip_code, status, total_amount, created_at, updated_at \
                     FROM orders WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Order>(
                    "SELECT id, customer_name, customer_email, customer_phone, street_address, \
                     city, state, zip_code, status, total_amount, created_at, updated_at \
                     FROM orders ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(orders)
    }

    /// Transitions are not validated at this layer; the orchestrator's tool
    /// layer is responsible for any lifecycle guard it wants.
    pub async fn update_order_status(&self, id: i64, new_status: OrderStatus) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE orders SET status = $1, updated_at = now() WHERE id = $2",
        )
        .bind(new_status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownOrder(id));
        }
        debug!(order_id = id, ?new_status, "order status updated");
        Ok(())
    }
}
