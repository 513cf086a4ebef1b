use crate::error::{AppError, AppResult};

pub mod auth_service;
pub mod customer_service;
pub mod dashboard_service;
pub mod product_service;
pub mod sale_service;

pub(crate) fn required_text(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

pub(crate) fn optional_text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
