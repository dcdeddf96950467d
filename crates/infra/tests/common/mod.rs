//! 統合テスト共通ヘルパー

use attendance_infra::dynamodb;
use aws_sdk_dynamodb::Client;

/// テスト用の DynamoDB エンドポイント
///
/// 優先順位:
/// 1. `DYNAMODB_ENDPOINT`
/// 2. `DYNAMODB_PORT` から構築
/// 3. フォールバック: `http://localhost:18000`
pub fn dynamodb_endpoint() -> String {
    std::env::var("DYNAMODB_ENDPOINT").unwrap_or_else(|_| {
        let port = std::env::var("DYNAMODB_PORT").unwrap_or_else(|_| "18000".to_string());
        format!("http://localhost:{port}")
    })
}

/// DynamoDB Local 向けクライアントを作成する
pub async fn local_client() -> Client {
    dynamodb::create_client(Some(&dynamodb_endpoint())).await
}

/// 他テストと衝突しないテーブル名を生成する
pub fn unique_table_name() -> String {
    format!("test_attendance_{}", uuid::Uuid::now_v7())
}
