use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_products: i64,
    pub low_stock: i64,
    pub today_sales: Decimal,
    pub month_sales: Decimal,
    pub daily_sales: Vec<DailySales>,
    pub top_products: Vec<TopProduct>,
    pub category_sales: Vec<CategorySales>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sales: Decimal,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct TopProduct {
    pub name: String,
    pub sold: i64,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct CategorySales {
    pub category: String,
    pub sales: Decimal,
}
