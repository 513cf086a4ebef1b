use pos_store_api::{
    config::{AdminSeed, SessionSettings},
    db::{create_pool, run_migrations},
    dto::{
        customers::CreateCustomerRequest,
        products::CreateProductRequest,
        sales::{ProcessSaleRequest, SaleLineRequest},
    },
    entity::{
        audit_logs::{Column as AuditCol, Entity as AuditLogs},
        customers::Entity as Customers,
        products::Entity as Products,
        sale_items::{Column as SaleItemCol, Entity as SaleItems},
        sales::Entity as Sales,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{
        auth_service::seed_admin, customer_service, dashboard_service, product_service,
        sale_service,
    },
    state::AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Statement};
use uuid::Uuid;

// Integration flow: catalog setup -> sales (ok, rejected, repeated lines) -> history -> dashboard.
#[tokio::test]
async fn sale_processing_and_dashboard_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let admin = create_admin(&state).await?;

    let widget = product_service::create_product(
        &state,
        &admin,
        product_request("Widget A", "Hardware", dec!(10.00), 5),
    )
    .await?
    .id
    .expect("product id");
    let gadget = product_service::create_product(
        &state,
        &admin,
        // half a cent rounds away from zero
        product_request("Gadget B", "Gifts", dec!(4.245), 3),
    )
    .await?
    .id
    .expect("product id");
    let customer = customer_service::create_customer(
        &state,
        &admin,
        CreateCustomerRequest {
            name: Some("Dana Reyes".into()),
            ..Default::default()
        },
    )
    .await?
    .id
    .expect("customer id");

    assert_eq!(
        Products::find_by_id(gadget)
            .one(&state.orm)
            .await?
            .expect("product exists")
            .price,
        dec!(4.25)
    );

    // Invalid catalog input is rejected before anything is written.
    let rejected = [
        CreateProductRequest {
            category: None,
            ..product_request("No Category", "x", dec!(1.00), 1)
        },
        product_request("Negative Price", "Hardware", dec!(-0.01), 1),
        product_request("Negative Stock", "Hardware", dec!(1.00), -1),
        CreateProductRequest {
            stock_quantity: None,
            ..product_request("No Stock", "Hardware", dec!(1.00), 1)
        },
    ];
    for request in rejected {
        let err = product_service::create_product(&state, &admin, request)
            .await
            .expect_err("invalid product");
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }
    let err = customer_service::create_customer(
        &state,
        &admin,
        CreateCustomerRequest {
            name: Some("   ".into()),
            email: Some("blank@example.com".into()),
            ..Default::default()
        },
    )
    .await
    .expect_err("blank customer name");
    assert_eq!(err.to_string(), "name is required");
    assert_eq!(Products::find().count(&state.orm).await?, 2);
    assert_eq!(Customers::find().count(&state.orm).await?, 1);

    // 2 x 10.00 with 10% off: 20.00 - 2.00 + 1.44
    let receipt = sale_service::process_sale(
        &state,
        &admin,
        sale_request(&[(widget, 2)], Some(customer), Some(dec!(10))),
    )
    .await?;
    assert!(receipt.success);
    assert_eq!(receipt.subtotal, dec!(20.00));
    assert_eq!(receipt.discount_amount, dec!(2.00));
    assert_eq!(receipt.tax_amount, dec!(1.44));
    assert_eq!(receipt.total_amount, dec!(19.44));
    assert_eq!(stock_of(&state, widget).await?, 3);

    let items = SaleItems::find()
        .filter(SaleItemCol::SaleId.eq(receipt.sale_id))
        .all(&state.orm)
        .await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].unit_price, dec!(10.00));
    assert_eq!(items[0].line_total, dec!(20.00));

    // One line over stock rejects the whole sale.
    let err = sale_service::process_sale(
        &state,
        &admin,
        sale_request(&[(gadget, 1), (widget, 4)], None, None),
    )
    .await
    .expect_err("insufficient stock");
    assert!(matches!(
        err,
        AppError::InsufficientStock { product_id, requested: 4, available: 3 } if product_id == widget
    ));
    assert_eq!(stock_of(&state, widget).await?, 3);
    assert_eq!(stock_of(&state, gadget).await?, 3);
    assert_eq!(Sales::find().count(&state.orm).await?, 1);
    assert_eq!(SaleItems::find().count(&state.orm).await?, 1);

    // Repeated lines for one product are checked against stock together.
    let err = sale_service::process_sale(
        &state,
        &admin,
        sale_request(&[(gadget, 2), (gadget, 2)], None, None),
    )
    .await
    .expect_err("combined quantity exceeds stock");
    assert!(matches!(err, AppError::InsufficientStock { requested: 4, .. }));
    assert_eq!(stock_of(&state, gadget).await?, 3);

    let err = sale_service::process_sale(&state, &admin, sale_request(&[(999_999, 1)], None, None))
        .await
        .expect_err("unknown product");
    assert!(matches!(err, AppError::NotFound(_)));

    let err = sale_service::process_sale(
        &state,
        &admin,
        sale_request(&[(gadget, 1)], Some(999_999), None),
    )
    .await
    .expect_err("unknown customer");
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(stock_of(&state, gadget).await?, 3);

    // Repeated lines that fit: one sale item per line, stock fully drained.
    let walk_in = sale_service::process_sale(
        &state,
        &admin,
        sale_request(&[(gadget, 1), (gadget, 2)], None, None),
    )
    .await?;
    assert_eq!(walk_in.subtotal, dec!(12.75));
    assert_eq!(walk_in.discount_amount, Decimal::ZERO);
    assert_eq!(walk_in.tax_amount, dec!(1.02));
    assert_eq!(walk_in.total_amount, dec!(13.77));
    assert_eq!(stock_of(&state, gadget).await?, 0);
    let lines = SaleItems::find()
        .filter(SaleItemCol::SaleId.eq(walk_in.sale_id))
        .count(&state.orm)
        .await?;
    assert_eq!(lines, 2);

    let recent = sale_service::list_recent_sales(&state).await?.items;
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, walk_in.sale_id);
    assert_eq!(recent[0].customer_name, "Walk-in Customer");
    assert_eq!(recent[0].payment_method, "Cash");
    assert_eq!(recent[1].customer_name, "Dana Reyes");

    let detail = sale_service::get_sale(&state, receipt.sale_id).await?;
    assert_eq!(detail.sale.total_amount, dec!(19.44));
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].product_name, "Widget A");
    assert!(matches!(
        sale_service::get_sale(&state, 999_999).await,
        Err(AppError::NotFound(_))
    ));

    let stats = dashboard_service::load_dashboard(&state).await?;
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.low_stock, 2);
    assert_eq!(stats.today_sales, dec!(33.21));
    assert_eq!(stats.month_sales, dec!(33.21));
    assert_eq!(stats.daily_sales.len(), 7);
    assert_eq!(stats.daily_sales.last().map(|d| d.sales), Some(dec!(33.21)));
    assert!(stats.daily_sales[..6].iter().all(|d| d.sales == Decimal::ZERO));
    assert_eq!(stats.top_products[0].name, "Gadget B");
    assert_eq!(stats.top_products[0].sold, 3);
    assert_eq!(stats.top_products[1].name, "Widget A");
    assert_eq!(stats.top_products[1].sold, 2);
    assert_eq!(stats.category_sales[0].category, "Hardware");
    assert_eq!(stats.category_sales[0].sales, dec!(20.00));
    assert_eq!(stats.category_sales[1].category, "Gifts");
    assert_eq!(stats.category_sales[1].sales, dec!(12.75));

    let sale_audits = AuditLogs::find()
        .filter(AuditCol::Action.eq("sale_process"))
        .count(&state.orm)
        .await?;
    assert_eq!(sale_audits, 2);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    let state = AppState::new(pool, SessionSettings::default());

    // Clean tables between runs
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE sale_items, sales, products, customers, audit_logs, admin_sessions, admin_users RESTART IDENTITY CASCADE",
        ))
        .await?;

    Ok(state)
}

async fn create_admin(state: &AppState) -> anyhow::Result<AuthUser> {
    let seed = AdminSeed {
        username: "cashier-admin".into(),
        password: Some("flow-test-pass".into()),
        full_name: "Flow Test Admin".into(),
        email: "flow@example.com".into(),
    };
    let admin_id = seed_admin(&state.orm, &seed)
        .await?
        .expect("admin created");
    Ok(AuthUser {
        session_id: Uuid::new_v4(),
        admin_id,
        username: seed.username,
        full_name: seed.full_name,
    })
}

fn product_request(name: &str, category: &str, price: Decimal, stock: i32) -> CreateProductRequest {
    CreateProductRequest {
        name: Some(name.into()),
        category: Some(category.into()),
        price: Some(price),
        stock_quantity: Some(stock),
        ..Default::default()
    }
}

fn sale_request(
    lines: &[(i32, i32)],
    customer_id: Option<i32>,
    discount_percent: Option<Decimal>,
) -> ProcessSaleRequest {
    ProcessSaleRequest {
        items: lines
            .iter()
            .map(|&(product_id, quantity)| SaleLineRequest {
                product_id,
                quantity,
            })
            .collect(),
        customer_id,
        payment_method: None,
        discount_percent,
    }
}

async fn stock_of(state: &AppState, product_id: i32) -> anyhow::Result<i32> {
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .expect("product exists");
    Ok(product.stock_quantity)
}
