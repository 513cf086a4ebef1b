use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of a write endpoint such as login or product creation.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: None,
        }
    }

    pub fn created(message: impl Into<String>, id: i32) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: Some(id),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    /// Stable machine-readable error code.
    pub error: String,
}
