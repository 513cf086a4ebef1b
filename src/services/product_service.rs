use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, ActiveValue::NotSet};

use crate::{
    audit,
    dto::products::{CreateProductRequest, DEFAULT_PRODUCT_IMAGE, ProductList},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    pricing,
    response::ActionResponse,
    services::{optional_text, required_text},
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<ProductList> {
    let items = Products::find()
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(ProductList { items })
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ActionResponse> {
    let name = required_text(payload.name, "name")?;
    let category = required_text(payload.category, "category")?;
    let price = payload
        .price
        .ok_or_else(|| AppError::Validation("price is required".into()))?;
    let stock_quantity = payload
        .stock_quantity
        .ok_or_else(|| AppError::Validation("stock_quantity is required".into()))?;
    let cost_price = payload.cost_price.unwrap_or(Decimal::ZERO);

    if price < Decimal::ZERO || cost_price < Decimal::ZERO {
        return Err(AppError::Validation("price must not be negative".into()));
    }
    if stock_quantity < 0 {
        return Err(AppError::Validation("stock_quantity must not be negative".into()));
    }

    let image_url = payload
        .image_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_string());

    let product = ActiveModel {
        id: NotSet,
        name: Set(name),
        category: Set(category),
        price: Set(pricing::to_cents(price)),
        cost_price: Set(pricing::to_cents(cost_price)),
        stock_quantity: Set(stock_quantity),
        supplier: Set(optional_text(payload.supplier)),
        barcode: Set(optional_text(payload.barcode)),
        image_url: Set(image_url),
        created_date: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = product.id, admin_id = user.admin_id, "product created");
    audit::record(
        &state.pool,
        Some(user.admin_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ActionResponse::created("Product added successfully", product.id))
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        category: model.category,
        price: model.price,
        cost_price: model.cost_price,
        stock_quantity: model.stock_quantity,
        supplier: model.supplier,
        barcode: model.barcode,
        image_url: model.image_url,
    }
}
