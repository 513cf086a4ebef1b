use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::LoginRequest,
        customers::{CreateCustomerRequest, CustomerList},
        dashboard::{CategorySales, DailySales, DashboardStats, TopProduct},
        products::{CreateProductRequest, ProductList},
        sales::{ProcessSaleRequest, SaleLineRequest, SaleList, SaleReceipt, SaleWithItems},
    },
    middleware::auth::SESSION_COOKIE,
    models::{AdminProfile, Customer, Product, SaleItem, SaleSummary},
    response::{ActionResponse, ErrorBody},
    routes::{auth, customers, dashboard, health, products, sales},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::me,
        products::list_products,
        products::create_product,
        customers::list_customers,
        customers::create_customer,
        sales::process_sale,
        sales::list_sales,
        sales::get_sale,
        dashboard::dashboard
    ),
    components(
        schemas(
            AdminProfile,
            Product,
            Customer,
            SaleSummary,
            SaleItem,
            LoginRequest,
            CreateProductRequest,
            ProductList,
            CreateCustomerRequest,
            CustomerList,
            SaleLineRequest,
            ProcessSaleRequest,
            SaleReceipt,
            SaleList,
            SaleWithItems,
            DashboardStats,
            DailySales,
            TopProduct,
            CategorySales,
            ActionResponse,
            ErrorBody,
            health::HealthData
        )
    ),
    security(
        ("session_cookie" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Admin login and session endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Sales", description = "Sale processing and history"),
        (name = "Dashboard", description = "Aggregate sales metrics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
