//! 成功响应的统一包装
//!
//! 看板接口都返回 `{ success, data, request_id, timestamp }`；Shopify 转发
//! 接口保持上游的原始形状，不经过这里。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use uuid::Uuid;

use super::error::CoreError;

/// 处理器的返回类型
pub type ApiResult<T> = Result<ApiResponse<T>, CoreError>;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub request_id: String,
    pub timestamp: String,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: StatusCode::OK,
        }
    }

    /// 新建记录，返回 201
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::success(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn envelope_carries_data_and_request_id() {
        let resp = ApiResponse::success(vec![1, 2, 3]).into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_of(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(body["request_id"].as_str().unwrap().len(), 36);
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn created_answers_201() {
        let resp = ApiResponse::created("new").into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(body_of(resp).await["data"], "new");
    }
}
