//! # 勤怠サービスのエラー定義
//!
//! 勤怠ハンドラで発生するエラーと、レスポンスへの変換を定義する。
//! HTTP アダプタ（axum）と Lambda アダプタは同じ [`ErrorResponse`] 形状を返す。
//!
//! | エラー種別 | HTTP ステータス |
//! |-----------|----------------|
//! | `Validation` | 400 |
//! | `BadRequest` | 400 |
//! | `NotFound` | 404 |
//! | `UnsupportedMethod` | 405 |
//! | `Storage` | 500 |

use attendance_domain::DomainError;
use attendance_infra::InfraError;
use attendance_shared::{ErrorResponse, event_log::error as log_error};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// 勤怠サービスで発生するエラー
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// 必須フィールド・パラメータの欠落（メッセージにフィールド名を含む）
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// リクエストボディを解釈できない
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 該当するルートが存在しない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 扱わない HTTP メソッド
    #[error("サポートされていない HTTP メソッドです: {0}")]
    UnsupportedMethod(String),

    /// 永続化層の失敗
    #[error("ストレージエラー: {0}")]
    Storage(#[from] InfraError),
}

impl From<DomainError> for AttendanceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl AttendanceError {
    /// アダプタ共通のエラーレスポンスに変換する
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::Validation(msg) => ErrorResponse::validation_error(msg.clone()),
            Self::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            Self::NotFound(path) => {
                ErrorResponse::not_found(format!("リソースが見つかりません: {path}"))
            }
            Self::UnsupportedMethod(method) => ErrorResponse::method_not_allowed(format!(
                "サポートされていない HTTP メソッドです: {method}"
            )),
            Self::Storage(e) => {
                tracing::error!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::STORAGE,
                    span_trace = %e.span_trace(),
                    "ストレージエラー: {}",
                    e
                );
                ErrorResponse::storage_error(e.to_string())
            }
        }
    }
}

impl IntoResponse for AttendanceError {
    fn into_response(self) -> Response {
        let body = self.to_error_response();
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(AttendanceError::Validation("user_id は必須です".into()), 400)]
    #[case(AttendanceError::BadRequest("invalid json".into()), 400)]
    #[case(AttendanceError::NotFound("/nowhere".into()), 404)]
    #[case(AttendanceError::UnsupportedMethod("DELETE".into()), 405)]
    #[case(AttendanceError::Storage(InfraError::dynamo_db("boom")), 500)]
    fn test_エラー種別ごとのステータス(#[case] err: AttendanceError, #[case] expected: u16) {
        assert_eq!(err.to_error_response().status, expected);
        assert_eq!(err.into_response().status().as_u16(), expected);
    }

    #[test]
    fn test_バリデーションエラーはフィールド名をdetailに含める() {
        let err: AttendanceError = DomainError::Validation("status は必須です".into()).into();
        assert_eq!(err.to_error_response().detail, "status は必須です");
    }

    #[test]
    fn test_ストレージエラーは下位層のメッセージをdetailに含める() {
        let err = AttendanceError::Storage(InfraError::dynamo_db("ProvisionedThroughputExceeded"));
        assert_eq!(
            err.to_error_response().detail,
            "DynamoDB エラー: ProvisionedThroughputExceeded"
        );
    }
}
