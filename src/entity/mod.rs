pub mod admin_sessions;
pub mod admin_users;
pub mod audit_logs;
pub mod customers;
pub mod products;
pub mod sale_items;
pub mod sales;

pub use admin_sessions::Entity as AdminSessions;
pub use admin_users::Entity as AdminUsers;
pub use audit_logs::Entity as AuditLogs;
pub use customers::Entity as Customers;
pub use products::Entity as Products;
pub use sale_items::Entity as SaleItems;
pub use sales::Entity as Sales;
