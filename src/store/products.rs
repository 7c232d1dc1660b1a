use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{Product, ProductFilter};

use super::{Store, StoreError};

impl Store {
    /// `search` performs per-word partial matches across name, description,
    /// and specifications, combined disjunctively across fields (a word
    /// matches if it appears in *any* of the three columns) and
    /// conjunctively across words (every word must match somewhere).
    /// Ordering is by name ascending, stable across invocations.
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let mut query = String::from(
            "SELECT id, name, description, category, price, stock_quantity, weight, created_at \
             FROM products WHERE 1=1",
        );
        let mut binds: Vec<String> = Vec::new();
        let mut decimal_binds: Vec<Decimal> = Vec::new();

        if let Some(category) = &filter.category {
            query.push_str(&format!(" AND LOWER(category) = LOWER(${})", binds.len() + 1));
            binds.push(category.clone());
        }

        let words: Vec<&str> = filter
            .search
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default();

        if !words.is_empty() {
            let mut word_clauses = Vec::new();
            for word in &words {
                let idx = binds.len() + 1;
                word_clauses.push(format!(
                    "(name ILIKE ${idx} OR description ILIKE ${idx} OR specifications ILIKE ${idx})"
                ));
                binds.push(format!("%{word}%"));
            }
            query.push_str(&format!(" AND ({})", word_clauses.join(" AND ")));
        }

        if let Some(price) = filter.price {
            let op = filter.price_operator.unwrap_or(crate::models::PriceOperator::Eq);
            let idx = binds.len() + decimal_binds.len() + 1;
            query.push_str(&format!(" AND price {} ${}", op.sql_symbol(), idx));
            decimal_binds.push(price);
        }

        query.push_str(" ORDER BY name ASC");

        debug!(%query, "list_products");

        let mut q = sqlx::query_as::<_, Product>(&query);
        for b in &binds {
            q = q.bind(b);
        }
        for d in &decimal_binds {
            q = q.bind(d);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, category, price, stock_quantity, weight, created_at \
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::UnknownProduct(id))
    }

    pub async fn check_stock(&self, id: i64) -> Result<i32, StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT stock_quantity FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::UnknownProduct(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceOperator;

    #[test]
    fn price_operator_sql_symbols() {
        assert_eq!(PriceOperator::Gt.sql_symbol(), ">");
        assert_eq!(PriceOperator::Lt.sql_symbol(), "<");
        assert_eq!(PriceOperator::Eq.sql_symbol(), "=");
    }
}
