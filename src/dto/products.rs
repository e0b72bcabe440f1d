use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::images::ImageUpload;
use crate::models::{Category, Product};
use crate::slug::is_valid_slug;

/// Raw multipart fields of a create/update request. Everything arrives as
/// text; `validate` turns it into typed fields or a field-specific error.
#[derive(Debug, Default, ToSchema)]
pub struct ProductForm {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<ImageUpload>,
}

/// The outcome of the validation gate; identical for create and update.
#[derive(Debug, Clone)]
pub struct ValidatedFields {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Category,
    pub image_url: Option<String>,
}

impl ProductForm {
    pub fn validate(self) -> AppResult<(ValidatedFields, Option<ImageUpload>)> {
        let name = required_text(self.name, "name")?;

        let slug = required_text(self.slug, "slug")?;
        if !is_valid_slug(&slug) {
            return Err(AppError::Validation(
                "slug may only contain lowercase letters, numbers and hyphens".to_string(),
            ));
        }

        let price_text = required_text(self.price, "price")?;
        let price: Decimal = price_text
            .parse()
            .map_err(|_| AppError::Validation("price must be a number".to_string()))?;
        if price < Decimal::ZERO {
            return Err(AppError::Validation(
                "price must not be negative".to_string(),
            ));
        }

        let stock_text = required_text(self.stock, "stock")?;
        let stock: i32 = stock_text
            .parse()
            .map_err(|_| AppError::Validation("stock must be an integer".to_string()))?;
        if stock < 0 {
            return Err(AppError::Validation(
                "stock must not be negative".to_string(),
            ));
        }

        let category_text = required_text(self.category, "category")?;
        let category: Category = category_text.parse().map_err(|_| {
            AppError::Validation(format!(
                "category must be one of: {}",
                Category::ALL.map(|c| c.as_str()).join(", ")
            ))
        })?;

        let description = self.description.unwrap_or_default();

        // Empty URL means "no image"; the uploaded file, if any, wins later.
        let image_url = self
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok((
            ValidatedFields {
                name,
                slug,
                description,
                price,
                stock,
                category,
                image_url,
            },
            self.image,
        ))
    }
}

fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value)
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub data: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn chair_form() -> ProductForm {
        ProductForm {
            name: Some("Chair".to_string()),
            slug: Some("chair".to_string()),
            description: None,
            price: Some("49.99".to_string()),
            stock: Some("10".to_string()),
            category: Some("Furniture".to_string()),
            image_url: None,
            image: None,
        }
    }

    #[test]
    fn valid_form_passes_the_gate() {
        let (fields, image) = chair_form().validate().unwrap();
        assert_eq!(fields.name, "Chair");
        assert_eq!(fields.slug, "chair");
        assert_eq!(fields.description, "");
        assert_eq!(fields.price, Decimal::new(4999, 2));
        assert_eq!(fields.stock, 10);
        assert_eq!(fields.category, Category::Furniture);
        assert_eq!(fields.image_url, None);
        assert!(image.is_none());
    }

    #[test]
    fn missing_required_fields_are_named() {
        for (wipe, field) in [
            (
                Box::new(|f: &mut ProductForm| f.name = None) as Box<dyn Fn(&mut ProductForm)>,
                "name",
            ),
            (Box::new(|f| f.slug = Some("  ".to_string())), "slug"),
            (Box::new(|f| f.price = None), "price"),
            (Box::new(|f| f.stock = Some(String::new())), "stock"),
            (Box::new(|f| f.category = None), "category"),
        ] {
            let mut form = chair_form();
            wipe(&mut form);
            match form.validate() {
                Err(AppError::Validation(msg)) => assert!(msg.contains(field), "{msg}"),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_malformed_numbers() {
        let mut form = chair_form();
        form.price = Some("cheap".to_string());
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        let mut form = chair_form();
        form.stock = Some("3.5".to_string());
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_negative_price_and_stock() {
        let mut form = chair_form();
        form.price = Some("-1".to_string());
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        let mut form = chair_form();
        form.stock = Some("-1".to_string());
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_unknown_category() {
        let mut form = chair_form();
        form.category = Some("Groceries".to_string());
        match form.validate() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("Home & Garden"), "{msg}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_every_catalog_category() {
        for category in Category::ALL {
            let mut form = chair_form();
            form.category = Some(category.as_str().to_string());
            let (fields, _) = form.validate().unwrap();
            assert_eq!(fields.category, category);
        }
    }

    #[test]
    fn rejects_bad_slug_shapes() {
        for slug in ["Chair", "chair deluxe", "chair-", "--chair"] {
            let mut form = chair_form();
            form.slug = Some(slug.to_string());
            assert!(
                matches!(form.validate(), Err(AppError::Validation(_))),
                "{slug}"
            );
        }
    }

    #[test]
    fn empty_image_url_means_no_image() {
        let mut form = chair_form();
        form.image_url = Some("   ".to_string());
        let (fields, _) = form.validate().unwrap();
        assert_eq!(fields.image_url, None);

        let mut form = chair_form();
        form.image_url = Some("https://example.com/chair.jpg".to_string());
        let (fields, _) = form.validate().unwrap();
        assert_eq!(
            fields.image_url.as_deref(),
            Some("https://example.com/chair.jpg")
        );
    }

    #[test]
    fn zero_price_and_stock_are_allowed() {
        let mut form = chair_form();
        form.price = Some("0".to_string());
        form.stock = Some("0".to_string());
        let (fields, _) = form.validate().unwrap();
        assert_eq!(fields.price, Decimal::ZERO);
        assert_eq!(fields.stock, 0);
    }
}
