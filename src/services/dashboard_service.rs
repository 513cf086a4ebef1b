use rust_decimal::Decimal;

use crate::{
    db::DbPool,
    dto::dashboard::{CategorySales, DailySales, DashboardStats, TopProduct},
    error::AppResult,
    pricing::LOW_STOCK_THRESHOLD,
    state::AppState,
};

pub const TOP_PRODUCTS_LIMIT: i64 = 5;

/// Each figure is an independent query; no snapshot is shared between them.
pub async fn load_dashboard(state: &AppState) -> AppResult<DashboardStats> {
    let pool = &state.pool;

    Ok(DashboardStats {
        total_products: count_products(pool).await?,
        low_stock: count_low_stock(pool).await?,
        today_sales: today_sales(pool).await?,
        month_sales: month_sales(pool).await?,
        daily_sales: daily_sales(pool).await?,
        top_products: top_products(pool).await?,
        category_sales: category_sales(pool).await?,
    })
}

async fn count_products(pool: &DbPool) -> AppResult<i64> {
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(total.0)
}

async fn count_low_stock(pool: &DbPool) -> AppResult<i64> {
    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE stock_quantity < $1")
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(pool)
        .await?;
    Ok(total.0)
}

async fn today_sales(pool: &DbPool) -> AppResult<Decimal> {
    let total: (Decimal,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total_amount), 0)
        FROM sales
        WHERE sale_date::date = CURRENT_DATE
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(total.0)
}

async fn month_sales(pool: &DbPool) -> AppResult<Decimal> {
    let total: (Decimal,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total_amount), 0)
        FROM sales
        WHERE date_trunc('month', sale_date) = date_trunc('month', now())
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(total.0)
}

/// The seven calendar days ending today, oldest first, zero-filled.
async fn daily_sales(pool: &DbPool) -> AppResult<Vec<DailySales>> {
    let rows = sqlx::query_as::<_, DailySales>(
        r#"
        SELECT d.day AS date, COALESCE(SUM(s.total_amount), 0) AS sales
        FROM (
            SELECT generate_series(CURRENT_DATE - 6, CURRENT_DATE, INTERVAL '1 day')::date AS day
        ) d
        LEFT JOIN sales s ON s.sale_date::date = d.day
        GROUP BY d.day
        ORDER BY d.day
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Quantity sold per product over `[now - 30 days, now]`; unsold products
/// count as zero, ties broken by product id.
async fn top_products(pool: &DbPool) -> AppResult<Vec<TopProduct>> {
    let rows = sqlx::query_as::<_, TopProduct>(
        r#"
        SELECT p.name, COALESCE(SUM(recent.quantity), 0)::BIGINT AS sold
        FROM products p
        LEFT JOIN (
            SELECT si.product_id, si.quantity
            FROM sale_items si
            JOIN sales s ON si.sale_id = s.id
            WHERE s.sale_date >= now() - INTERVAL '30 days'
              AND s.sale_date <= now()
        ) recent ON recent.product_id = p.id
        GROUP BY p.id, p.name
        ORDER BY sold DESC, p.id ASC
        LIMIT $1
        "#,
    )
    .bind(TOP_PRODUCTS_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn category_sales(pool: &DbPool) -> AppResult<Vec<CategorySales>> {
    let rows = sqlx::query_as::<_, CategorySales>(
        r#"
        SELECT p.category, COALESCE(SUM(recent.line_total), 0) AS sales
        FROM products p
        LEFT JOIN (
            SELECT si.product_id, si.line_total
            FROM sale_items si
            JOIN sales s ON si.sale_id = s.id
            WHERE s.sale_date >= now() - INTERVAL '30 days'
              AND s.sale_date <= now()
        ) recent ON recent.product_id = p.id
        GROUP BY p.category
        ORDER BY sales DESC, p.category ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
