pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod products;
pub mod sales;
