use serde::Serialize;
use serde_json::json;

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Envelope carrying only a confirmation message
    pub fn message(message: &str) -> Self {
        Self::success(json!({ "message": message }))
    }
}
