use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{ProductForm, ProductList},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    routes::params::ProductQuery,
    state::AppState,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

pub async fn list_products(state: &AppState, query: ProductQuery) -> AppResult<ProductList> {
    let mut condition = Condition::all();

    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(Column::Name).ilike(pattern));
    }

    if let Some(category) = query.category {
        condition = condition.add(Column::Category.eq(category));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    // Stable order regardless of insertion history: creation time, id tiebreak.
    let items = Products::find()
        .filter(condition)
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ProductList { data: items })
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    match result {
        Some(p) => Ok(p),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_product(state: &AppState, form: ProductForm) -> AppResult<Product> {
    let (fields, image) = form.validate()?;

    // An uploaded file takes precedence over whatever the imageUrl field says.
    let stored_url = match &image {
        Some(upload) => Some(state.images.store(upload).await?),
        None => None,
    };
    let image_url = stored_url.clone().or(fields.image_url);

    let id = Uuid::new_v4();
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(id),
        name: Set(fields.name),
        slug: Set(fields.slug),
        description: Set(fields.description),
        price: Set(fields.price),
        stock: Set(fields.stock),
        category: Set(fields.category),
        image_url: Set(image_url),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    let product = match active.insert(&state.orm).await {
        Ok(model) => model,
        Err(err) => {
            discard_stored(state, stored_url.as_deref()).await;
            return Err(map_write_err(err));
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id, "slug": product.slug })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(product_from_entity(product))
}

pub async fn update_product(state: &AppState, id: Uuid, form: ProductForm) -> AppResult<Product> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let (fields, image) = form.validate()?;

    let stored_url = match &image {
        Some(upload) => Some(state.images.store(upload).await?),
        None => None,
    };
    let image_url = stored_url.clone().or(fields.image_url);
    let previous_image = existing.image_url.clone();

    // Full-field replace; only created_at survives from the stored row.
    let mut active: ActiveModel = existing.into();
    active.name = Set(fields.name);
    active.slug = Set(fields.slug);
    active.description = Set(fields.description);
    active.price = Set(fields.price);
    active.stock = Set(fields.stock);
    active.category = Set(fields.category);
    active.image_url = Set(image_url);
    active.updated_at = Set(Utc::now().into());

    let product = match active.update(&state.orm).await {
        Ok(model) => model,
        Err(err) => {
            discard_stored(state, stored_url.as_deref()).await;
            return Err(map_write_err(err));
        }
    };

    // The row no longer points at a file we wrote earlier; drop it.
    if let Some(old) = previous_image.as_deref() {
        if product.image_url.as_deref() != Some(old) {
            state.images.discard(old).await;
        }
    }

    if let Err(err) = log_audit(
        &state.pool,
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id, "slug": product.slug })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(product_from_entity(product))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<()> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    Products::delete_by_id(id).exec(&state.orm).await?;

    if let Some(url) = existing.image_url.as_deref() {
        state.images.discard(url).await;
    }

    if let Err(err) = log_audit(
        &state.pool,
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

/// The slug unique index is the arbiter under concurrent writes; its
/// violation surfaces as a conflict the client can remediate.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::SlugConflict,
        _ => AppError::OrmError(err),
    }
}

async fn discard_stored(state: &AppState, stored_url: Option<&str>) {
    if let Some(url) = stored_url {
        state.images.discard(url).await;
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        price: model.price,
        stock: model.stock,
        category: model.category,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
