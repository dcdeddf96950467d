//! # ヘルスチェックハンドラ
//!
//! 勤怠サービスの稼働状態を確認するためのエンドポイント。
//!
//! - `/`: API 名を返す
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（DynamoDB テーブルへの到達を確認）

use std::{collections::HashMap, sync::Arc, time::Duration};

use attendance_infra::dynamodb;
use attendance_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
use aws_sdk_dynamodb::Client;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

/// ルートエンドポイントのレスポンス
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// API 名を返す
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Attendance System API",
    })
}

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub client:     Client,
    pub table_name: String,
}

/// Readiness Check エンドポイント
///
/// 勤怠テーブルを DescribeTable で確認する。成功 → 200、失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let dynamodb_status = check_dynamodb(&state.client, &state.table_name).await;

    let mut checks = HashMap::new();
    checks.insert("dynamodb".to_string(), dynamodb_status);

    let response = ReadinessResponse::from_checks(checks);
    let http_status = match response.status {
        ReadinessStatus::Ready => StatusCode::OK,
        ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}

/// テーブルへの到達を確認する（タイムアウト: 5 秒）
async fn check_dynamodb(client: &Client, table_name: &str) -> CheckStatus {
    match tokio::time::timeout(
        Duration::from_secs(5),
        dynamodb::check_table(client, table_name),
    )
    .await
    {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: dynamodb describe_table failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: dynamodb check timed out");
            CheckStatus::Error
        }
    }
}
