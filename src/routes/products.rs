use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    dto::products::{ProductForm, ProductList},
    error::{AppError, AppResult},
    images::ImageUpload,
    models::Product,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(create_product))
        .route("/", axum::routing::get(list_products))
        .route("/{id}", axum::routing::get(get_product))
        .route("/{id}", axum::routing::put(update_product))
        .route("/{id}", axum::routing::delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Filtered product listing", body = ProductList)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ProductList>> {
    let list = product_service::list_products(&state, query).await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = Product),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<Product>> {
    let product = product_service::get_product(&state, id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/products",
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Create product", body = Product),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Slug already taken"),
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Product>)> {
    let form = read_product_form(multipart).await?;
    let product = product_service::create_product(&state, form).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Slug already taken"),
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<Product>> {
    let form = read_product_form(multipart).await?;
    let product = product_service::update_product(&state, id, form).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Deleted product"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    product_service::delete_product(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collect the multipart fields the storefront forms submit. Unknown
/// fields are ignored; an empty `image` part counts as no upload.
async fn read_product_form(mut multipart: Multipart) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = Some(field.text().await.map_err(bad_multipart)?),
            "slug" => form.slug = Some(field.text().await.map_err(bad_multipart)?),
            "description" => form.description = Some(field.text().await.map_err(bad_multipart)?),
            "price" => form.price = Some(field.text().await.map_err(bad_multipart)?),
            "stock" => form.stock = Some(field.text().await.map_err(bad_multipart)?),
            "category" => form.category = Some(field.text().await.map_err(bad_multipart)?),
            "imageUrl" => form.image_url = Some(field.text().await.map_err(bad_multipart)?),
            "image" => {
                let file_name = field.file_name().map(ToString::to_string);
                let content_type = field
                    .content_type()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                if !bytes.is_empty() {
                    form.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("malformed multipart request: {err}"))
}
