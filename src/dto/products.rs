use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

pub const DEFAULT_PRODUCT_IMAGE: &str = "/static/images/default-product.jpg";

/// Fields are optional at the wire level so that a missing field becomes a
/// validation error naming it rather than a generic body rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub cost_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
