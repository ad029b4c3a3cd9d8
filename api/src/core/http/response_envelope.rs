use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Envelope used for every error body (and available for success bodies).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Stable, machine-readable error code (e.g. "BAD_REQUEST").
    pub code: &'static str,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Default, Serialize)]
pub struct ApiErrorDetail {
    /// Field path like `question` or `airlines`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Optional hint to help the client fix the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(
        code: &'static str,
        message: impl Into<String>,
        details: Vec<ApiErrorDetail>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                details,
            }),
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_omits_data_and_empty_details() {
        let v = serde_json::to_value(ApiResponse::<()>::error("NOT_FOUND", "gone", vec![])).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "success": false,
                "error": { "code": "NOT_FOUND", "message": "gone" }
            })
        );
    }

    #[test]
    fn success_envelope_carries_data() {
        let v = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"], serde_json::json!([1, 2]));
        assert!(v.get("error").is_none());
    }
}
