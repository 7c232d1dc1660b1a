use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShippingRate {
    pub carrier: String,
    pub service_type: String,
    pub base_rate: Decimal,
    pub per_pound_rate: Decimal,
    pub estimated_days: i32,
    pub destination_zip: String,
}

/// A priced shipping option for a single quoted weight, per
/// `estimate-shipping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingOption {
    pub carrier: String,
    pub service_type: String,
    pub cost: Decimal,
    pub estimated_days: i32,
}

impl ShippingRate {
    pub fn quote(&self, weight: Decimal) -> ShippingOption {
        ShippingOption {
            carrier: self.carrier.clone(),
            service_type: self.service_type.clone(),
            cost: self.base_rate + self.per_pound_rate * weight,
            estimated_days: self.estimated_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quote_is_monotone_in_weight() {
        let rate = ShippingRate {
            carrier: "UPS".into(),
            service_type: "ground".into(),
            base_rate: dec!(5.00),
            per_pound_rate: dec!(0.50),
            estimated_days: 3,
            destination_zip: "62701".into(),
        };
        let light = rate.quote(dec!(1.0));
        let heavy = rate.quote(dec!(10.0));
        assert!(heavy.cost >= light.cost);
        assert_eq!(light.cost, dec!(5.50));
        assert_eq!(heavy.cost, dec!(10.00));
    }
}
