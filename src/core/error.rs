//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::app::shopify::gateway::GatewayError;
use crate::infrastructure::storage::StorageError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl CoreError {
    /// 将 Shopify 转发错误映射为面向用户的通用提示
    pub fn from_gateway(err: GatewayError, action: &str) -> Self {
        match err {
            GatewayError::MissingSession(_) => {
                CoreError::Unauthorized("No valid session found".to_string())
            }
            GatewayError::InvalidShop(_) => CoreError::BadRequest("Invalid shop domain".to_string()),
            GatewayError::InvalidState => {
                CoreError::BadRequest("Failed to create session".to_string())
            }
            other => {
                error!(error = %other, "Shopify 请求失败: {}", action);
                CoreError::Upstream(format!("Failed to {}", action))
            }
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            CoreError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            CoreError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR", msg),
            CoreError::Storage(err) => {
                error!(error = %err, "本地存储失败");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Failed to persist changes".to_string(),
                )
            }
            CoreError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                msg,
            ),
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let resp = CoreError::NotFound("missing".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_session_becomes_unauthorized() {
        let err = CoreError::from_gateway(
            GatewayError::MissingSession("demo.myshopify.com".to_string()),
            "fetch products",
        );
        assert!(matches!(err, CoreError::Unauthorized(_)));
    }

    #[test]
    fn upstream_failure_hides_details() {
        let err = CoreError::from_gateway(
            GatewayError::Status(502, "bad gateway".to_string()),
            "fetch orders",
        );
        assert_eq!(err.to_string(), "Failed to fetch orders");
    }
}
