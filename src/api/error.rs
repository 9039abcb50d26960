use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::circulation::CirculationError;

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを
/// 提供する。
#[derive(Debug)]
pub struct ApiError(CirculationError);

impl From<CirculationError> for ApiError {
    fn from(err: CirculationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self.0 {
            // 404 Not Found - 対象のレコードが存在しない
            CirculationError::BookNotFound(_) => {
                (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", self.0.to_string())
            }
            CirculationError::UserNotFound(_) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", self.0.to_string())
            }

            // 422 Unprocessable Entity - ビジネスルール違反
            CirculationError::AlreadyBorrowed { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ALREADY_BORROWED",
                self.0.to_string(),
            ),
            CirculationError::NotBorrowed { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NOT_BORROWED",
                self.0.to_string(),
            ),
            CirculationError::DuplicateRequest { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DUPLICATE_REQUEST",
                self.0.to_string(),
            ),

            // 500 Internal Server Error - システム障害
            // 詳細はログに記録し、クライアントには一般的なメッセージのみ返す
            CirculationError::Domain(detail) => {
                tracing::error!("Domain invariant violated: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOMAIN_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
