use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait, ActiveValue::NotSet,
};
use sea_orm::sea_query::{Expr, LockType};

use crate::{
    audit,
    dto::sales::{ProcessSaleRequest, SaleList, SaleReceipt, SaleWithItems},
    entity::{
        customers::Entity as Customers,
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        sale_items::ActiveModel as SaleItemActive,
        sales::ActiveModel as SaleActive,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{SaleItem, SaleSummary},
    pricing::{self, SaleTotals},
    state::AppState,
};

pub const RECENT_SALES_LIMIT: i64 = 50;

const SALE_SUMMARY_SELECT: &str = r#"
    SELECT s.id,
           COALESCE(c.name, 'Walk-in Customer') AS customer_name,
           s.subtotal,
           s.tax_amount,
           s.discount_amount,
           s.total_amount,
           s.payment_method,
           s.sale_date
    FROM sales s
    LEFT JOIN customers c ON s.customer_id = c.id
"#;

/// Record a sale and take its items out of stock as one transaction.
///
/// Product rows are locked `FOR UPDATE` in id order before the stock check,
/// so concurrent sales of the same product serialize. Quantities of repeated
/// lines are summed before comparing with stock. Returning early drops the
/// transaction, which rolls back everything written so far.
pub async fn process_sale(
    state: &AppState,
    user: &AuthUser,
    payload: ProcessSaleRequest,
) -> AppResult<SaleReceipt> {
    let quantities = pricing::aggregate_quantities(&payload.items)?;
    let discount_percent = pricing::validate_discount(payload.discount_percent)?;
    let payment_method = pricing::normalize_payment_method(payload.payment_method);

    let txn = state.orm.begin().await?;

    if let Some(customer_id) = payload.customer_id {
        if Customers::find_by_id(customer_id).one(&txn).await?.is_none() {
            return Err(AppError::NotFound(format!("Customer {customer_id} not found")));
        }
    }

    let products: HashMap<i32, ProductModel> = Products::find()
        .filter(ProdCol::Id.is_in(quantities.keys().copied()))
        .order_by_asc(ProdCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    for (&product_id, &requested) in &quantities {
        let product = products
            .get(&product_id)
            .ok_or_else(|| AppError::NotFound(format!("Product {product_id} not found")))?;
        if product.stock_quantity < requested {
            tracing::info!(
                product_id,
                requested,
                available = product.stock_quantity,
                "sale rejected: insufficient stock"
            );
            return Err(AppError::InsufficientStock {
                product_id,
                requested,
                available: product.stock_quantity,
            });
        }
    }

    // unit price is read once per product and reused for every line
    let mut lines = Vec::with_capacity(payload.items.len());
    for line in &payload.items {
        let unit_price = products
            .get(&line.product_id)
            .map(|p| p.price)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", line.product_id)))?;
        lines.push((line.product_id, line.quantity, unit_price));
    }

    let subtotal: Decimal = lines
        .iter()
        .map(|(_, quantity, unit_price)| pricing::line_total(*unit_price, *quantity))
        .sum();
    let totals = SaleTotals::compute(subtotal, discount_percent);

    let sale = SaleActive {
        id: NotSet,
        customer_id: Set(payload.customer_id),
        subtotal: Set(totals.subtotal),
        tax_amount: Set(totals.tax_amount),
        discount_amount: Set(totals.discount_amount),
        total_amount: Set(totals.total_amount),
        payment_method: Set(payment_method.clone()),
        sale_date: NotSet,
    }
    .insert(&txn)
    .await?;

    for (product_id, quantity, unit_price) in &lines {
        SaleItemActive {
            id: NotSet,
            sale_id: Set(sale.id),
            product_id: Set(*product_id),
            quantity: Set(*quantity),
            unit_price: Set(*unit_price),
            line_total: Set(pricing::line_total(*unit_price, *quantity)),
        }
        .insert(&txn)
        .await?;
    }

    for (&product_id, &quantity) in &quantities {
        Products::update_many()
            .col_expr(
                ProdCol::StockQuantity,
                Expr::col(ProdCol::StockQuantity).sub(quantity),
            )
            .filter(ProdCol::Id.eq(product_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    tracing::info!(
        sale_id = sale.id,
        admin_id = user.admin_id,
        total = %totals.total_amount,
        lines = lines.len(),
        "sale processed"
    );
    audit::record(
        &state.pool,
        Some(user.admin_id),
        "sale_process",
        "sales",
        serde_json::json!({
            "sale_id": sale.id,
            "total_amount": totals.total_amount,
            "payment_method": payment_method,
        }),
    )
    .await;

    Ok(SaleReceipt {
        success: true,
        message: "Sale processed successfully".into(),
        sale_id: sale.id,
        subtotal: totals.subtotal,
        tax_amount: totals.tax_amount,
        discount_amount: totals.discount_amount,
        total_amount: totals.total_amount,
    })
}

pub async fn list_recent_sales(state: &AppState) -> AppResult<SaleList> {
    let query = format!("{SALE_SUMMARY_SELECT} ORDER BY s.sale_date DESC, s.id DESC LIMIT $1");
    let items = sqlx::query_as::<_, SaleSummary>(&query)
        .bind(RECENT_SALES_LIMIT)
        .fetch_all(&state.pool)
        .await?;
    Ok(SaleList { items })
}

pub async fn get_sale(state: &AppState, id: i32) -> AppResult<SaleWithItems> {
    let query = format!("{SALE_SUMMARY_SELECT} WHERE s.id = $1");
    let sale = sqlx::query_as::<_, SaleSummary>(&query)
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let sale = match sale {
        Some(s) => s,
        None => return Err(AppError::NotFound(format!("Sale {id} not found"))),
    };

    let items = sqlx::query_as::<_, SaleItem>(
        r#"
        SELECT si.id, si.sale_id, si.product_id, p.name AS product_name,
               si.quantity, si.unit_price, si.line_total
        FROM sale_items si
        JOIN products p ON si.product_id = p.id
        WHERE si.sale_id = $1
        ORDER BY si.id
        "#,
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    Ok(SaleWithItems { sale, items })
}
