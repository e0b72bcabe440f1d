use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::Category;

/// Browse filters; all optional and AND-combined.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Case-insensitive substring match against the product name.
    pub search: Option<String>,
    /// Exact category match.
    #[param(value_type = Option<String>)]
    pub category: Option<Category>,
    /// Inclusive lower price bound.
    #[param(value_type = Option<f64>)]
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> ProductQuery {
        serde_urlencoded::from_str(query).unwrap()
    }

    #[test]
    fn deserializes_client_query_strings() {
        let q = parse("search=mac&category=Books&minPrice=10&maxPrice=20");
        assert_eq!(q.search.as_deref(), Some("mac"));
        assert_eq!(q.category, Some(Category::Books));
        assert_eq!(q.min_price, Some(Decimal::from(10)));
        assert_eq!(q.max_price, Some(Decimal::from(20)));
    }

    #[test]
    fn all_filters_are_optional() {
        let q = parse("");
        assert!(q.search.is_none());
        assert!(q.category.is_none());
        assert!(q.min_price.is_none());
        assert!(q.max_price.is_none());
    }

    #[test]
    fn category_with_ampersand_round_trips() {
        let q = parse("category=Home+%26+Garden");
        assert_eq!(q.category, Some(Category::HomeAndGarden));
    }

    #[test]
    fn decimal_bounds_keep_cents() {
        let q = parse("minPrice=10.50");
        assert_eq!(q.min_price, Some(Decimal::new(1050, 2)));
    }
}
