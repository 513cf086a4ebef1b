use pos_store_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    services::auth_service::seed_admin,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    match seed_admin(&create_orm_conn(&pool), &config.admin).await? {
        Some(id) => println!("Created admin {} (id {id})", config.admin.username),
        None => println!("Admin {} already present", config.admin.username),
    }
    seed_products(&pool).await?;
    seed_customers(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products: [(&str, &str, Decimal, Decimal, i32, &str, &str, &str); 6] = [
        ("Laptop", "Electronics", dec!(899.99), dec!(650.00), 15, "TechSupply Co", "1000000000017", "laptop.jpg"),
        ("Smartphone", "Electronics", dec!(499.00), dec!(350.00), 25, "TechSupply Co", "1000000000024", "phone.jpg"),
        ("Wireless Mouse", "Accessories", dec!(24.99), dec!(12.00), 8, "Peripheral Hub", "1000000000031", "mouse.jpg"),
        ("Notebook", "Stationery", dec!(3.50), dec!(1.20), 120, "Paper Goods Ltd", "1000000000048", "notebook.jpg"),
        ("Coffee Beans 1kg", "Grocery", dec!(18.75), dec!(11.00), 40, "Roastery Direct", "1000000000055", "coffee.jpg"),
        ("Water Bottle", "Accessories", dec!(12.00), dec!(5.50), 6, "Peripheral Hub", "1000000000062", "bottle.jpg"),
    ];

    for (name, category, price, cost_price, stock, supplier, barcode, image) in products {
        sqlx::query(
            r#"
            INSERT INTO products
                (name, category, price, cost_price, stock_quantity, supplier, barcode, image_url)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE barcode = $7)
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(cost_price)
        .bind(stock)
        .bind(supplier)
        .bind(barcode)
        .bind(format!("/static/images/{image}"))
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_customers(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let customers = [
        ("Alice Johnson", "alice@example.com", "555-0101", "12 Market Street"),
        ("Bob Smith", "bob@example.com", "555-0102", "48 Harbor Road"),
        ("Carla Gomez", "", "555-0103", ""),
    ];

    for (name, email, phone, address) in customers {
        sqlx::query(
            r#"
            INSERT INTO customers (name, email, phone, address)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (SELECT 1 FROM customers WHERE name = $1)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .execute(pool)
        .await?;
    }

    println!("Seeded customers");
    Ok(())
}
