use rust_decimal::Decimal;

use crate::models::{ShippingOption, ShippingRate};

use super::{Store, StoreError};

impl Store {
    pub async fn list_shipping_rates(
        &self,
        carrier: Option<&str>,
        service_type: Option<&str>,
    ) -> Result<Vec<ShippingRate>, StoreError> {
        let mut query = String::from(
            "SELECT carrier, service_type, base_rate, per_pound_rate, estimated_days, \
             destination_zip FROM shipping_rates WHERE 1=1",
        );
        let mut binds = Vec::new();
        if let Some(carrier) = carrier {
            binds.push(carrier.to_string());
            query.push_str(&format!(" AND carrier = ${}", binds.len()));
        }
        if let Some(service_type) = service_type {
            binds.push(service_type.to_string());
            query.push_str(&format!(" AND service_type = ${}", binds.len()));
        }
        query.push_str(" ORDER BY base_rate ASC");

        let mut q = sqlx::query_as::<_, ShippingRate>(&query);
        for b in &binds {
            q = q.bind(b);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Returns every available carrier/service option for the zip, ordered
    /// by estimated days ascending then cost ascending.
    pub async fn estimate_shipping(
        &self,
        zip: &str,
        weight: Decimal,
    ) -> Result<Vec<ShippingOption>, StoreError> {
        let rates = sqlx::query_as::<_, ShippingRate>(
            "SELECT carrier, service_type, base_rate, per_pound_rate, estimated_days, \
             destination_zip FROM shipping_rates WHERE destination_zip = $1 \
             ORDER BY estimated_days ASC, base_rate ASC",
        )
        .bind(zip)
        .fetch_all(&self.pool)
        .await?;

        if rates.is_empty() {
            return Err(StoreError::NoRates(zip.to_string()));
        }

        let mut options: Vec<ShippingOption> = rates.iter().map(|r| r.quote(weight)).collect();
        options.sort_by(|a, b| {
            a.estimated_days
                .cmp(&b.estimated_days)
                .then(a.cost.cmp(&b.cost))
        });
        Ok(options)
    }
}
