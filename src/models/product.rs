use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub weight: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

/// Operator for a `product_catalog` price filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceOperator {
    Gt,
    Lt,
    Eq,
}

impl PriceOperator {
    /// Parses an operator, defaulting to `Eq` for anything unrecognized —
    /// matching the reference catalog lookup's fallback.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("gt") => PriceOperator::Gt,
            Some("lt") => PriceOperator::Lt,
            Some("eq") => PriceOperator::Eq,
            _ => PriceOperator::Eq,
        }
    }

    pub fn sql_symbol(&self) -> &'static str {
        match self {
            PriceOperator::Gt => ">",
            PriceOperator::Lt => "<",
            PriceOperator::Eq => "=",
        }
    }
}

/// Category whitelist of plurals that must not be singularized, mirroring
/// the reference catalog's treatment of "accessories".
const PLURAL_WHITELIST: &[&str] = &["accessories"];

/// Lowercases and singularizes a category string for equality comparisons,
/// except for whitelisted plurals that are already the canonical form.
///
/// Strips the whole trailing run of `s` characters rather than just one, so
/// a doubled plural typo (`electronicss`) collapses to the same stem as the
/// properly-formed plural (`Electronics`).
pub fn canonicalize_category(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if PLURAL_WHITELIST.contains(&lowered.as_str()) {
        return lowered;
    }
    let trimmed = lowered.trim_end_matches('s');
    if trimmed.is_empty() {
        lowered
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub price: Option<Decimal>,
    pub price_operator: Option<PriceOperator>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_case_and_plural() {
        assert_eq!(canonicalize_category("Electronics"), "electronic");
        assert_eq!(canonicalize_category("ELECTRONICS"), "electronic");
        assert_eq!(canonicalize_category("electronicss"), "electronic");
        assert_eq!(
            canonicalize_category("Electronics"),
            canonicalize_category("electronicss")
        );
    }

    #[test]
    fn keeps_whitelisted_plural() {
        assert_eq!(canonicalize_category("Accessories"), "accessories");
        assert_eq!(canonicalize_category("accessories"), "accessories");
    }

    #[test]
    fn price_operator_defaults_to_eq() {
        assert_eq!(PriceOperator::parse_or_default(Some("bogus")), PriceOperator::Eq);
        assert_eq!(PriceOperator::parse_or_default(None), PriceOperator::Eq);
        assert_eq!(PriceOperator::parse_or_default(Some("gt")), PriceOperator::Gt);
    }
}
