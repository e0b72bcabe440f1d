use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed set of catalog categories; stored as their display text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Category {
    #[sea_orm(string_value = "Electronics")]
    Electronics,
    #[sea_orm(string_value = "Furniture")]
    Furniture,
    #[sea_orm(string_value = "Clothing")]
    Clothing,
    #[sea_orm(string_value = "Books")]
    Books,
    #[sea_orm(string_value = "Home & Garden")]
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    #[sea_orm(string_value = "Sports")]
    Sports,
    #[sea_orm(string_value = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Furniture,
        Category::Clothing,
        Category::Books,
        Category::HomeAndGarden,
        Category::Sports,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Furniture => "Furniture",
            Category::Clothing => "Clothing",
            Category::Books => "Books",
            Category::HomeAndGarden => "Home & Garden",
            Category::Sports => "Sports",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Category,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
