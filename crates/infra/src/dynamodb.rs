//! # DynamoDB 接続管理
//!
//! 勤怠テーブルを格納する Amazon DynamoDB への接続管理を行う。
//!
//! ## 設計方針
//!
//! - **ローカル開発**: `DYNAMODB_ENDPOINT` を指定して DynamoDB Local に接続
//! - **本番環境**: エンドポイント未指定時は AWS の標準認証チェーン（IAM ロール等）を使用
//! - **テーブル自動作成**: 起動時にテーブルが存在しなければ作成（冪等、オプトイン）
//!
//! ## テーブルスキーマ
//!
//! | 属性 | 型 | キー |
//! |------|----|------|
//! | `user_id` | S | HASH |
//! | `date` | S | RANGE |
//! | `status` | S | - |
//! | `notes` | S | -（任意） |
//! | `timestamp` | S | - |

use aws_sdk_dynamodb::{
    Client,
    error::DisplayErrorContext,
    types::{
        AttributeDefinition,
        BillingMode,
        KeySchemaElement,
        KeyType,
        ScalarAttributeType,
    },
};

use crate::InfraError;

/// パーティションキー属性名
pub const PARTITION_KEY: &str = "user_id";
/// ソートキー属性名
pub const SORT_KEY: &str = "date";

/// DynamoDB クライアントを作成する
///
/// `endpoint` を指定した場合は DynamoDB Local 用のクライアントを作成する。
/// 認証情報はダミー値を使用する（DynamoDB Local は認証情報を検証しない）。
/// 未指定の場合は環境変数・IAM ロールから設定を読み込む。
pub async fn create_client(endpoint: Option<&str>) -> Client {
    let config = match endpoint {
        Some(endpoint) => {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .endpoint_url(endpoint)
                .region(aws_config::Region::new("ap-northeast-1"))
                // DynamoDB Local はクレデンシャルを検証しないが、SDK はプロバイダが必要
                .credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
                    "local", "local", None, None, "local",
                ))
                .load()
                .await
        }
        None => aws_config::defaults(aws_config::BehaviorVersion::latest()).load().await,
    };

    Client::new(&config)
}

/// テーブルに到達できるか確認する（Readiness Check 用）
pub async fn check_table(client: &Client, table_name: &str) -> Result<(), InfraError> {
    client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
        .map(|_| ())
        .map_err(|e| {
            InfraError::dynamo_db(format!(
                "テーブル '{}' の確認に失敗: {}",
                table_name,
                DisplayErrorContext(&e)
            ))
        })
}

/// 勤怠テーブルが存在しなければ作成する（冪等）
///
/// 並行して作成された場合（`ResourceInUseException`）も成功扱いにする。
pub async fn ensure_attendance_table(client: &Client, table_name: &str) -> Result<(), InfraError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::debug!("テーブル '{}' は既に存在します", table_name);
            return Ok(());
        }
        Err(err) => {
            // ResourceNotFoundException の場合のみテーブル作成に進む
            let not_found = err
                .as_service_error()
                .map(|e| e.is_resource_not_found_exception())
                .unwrap_or(false);
            if !not_found {
                return Err(InfraError::dynamo_db(format!(
                    "テーブル '{}' の確認に失敗: {}",
                    table_name,
                    DisplayErrorContext(&err)
                )));
            }
        }
    }

    tracing::info!("テーブル '{}' を作成します", table_name);

    let create_result = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_schema(PARTITION_KEY, KeyType::Hash)?)
        .key_schema(key_schema(SORT_KEY, KeyType::Range)?)
        .attribute_definitions(string_attribute(PARTITION_KEY)?)
        .attribute_definitions(string_attribute(SORT_KEY)?)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    if let Err(err) = create_result {
        let in_use = err
            .as_service_error()
            .map(|e| e.is_resource_in_use_exception())
            .unwrap_or(false);
        if !in_use {
            return Err(InfraError::dynamo_db(format!(
                "テーブル '{}' の作成に失敗: {}",
                table_name,
                DisplayErrorContext(&err)
            )));
        }
        tracing::debug!(
            "テーブル '{}' は既に作成中または存在します（ResourceInUseException）",
            table_name
        );
        return Ok(());
    }

    tracing::info!("テーブル '{}' を作成しました", table_name);

    Ok(())
}

fn key_schema(attribute: &str, key_type: KeyType) -> Result<KeySchemaElement, InfraError> {
    KeySchemaElement::builder()
        .attribute_name(attribute)
        .key_type(key_type)
        .build()
        .map_err(|e| InfraError::dynamo_db(format!("KeySchema 構築エラー: {e}")))
}

fn string_attribute(attribute: &str) -> Result<AttributeDefinition, InfraError> {
    AttributeDefinition::builder()
        .attribute_name(attribute)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| InfraError::dynamo_db(format!("AttributeDefinition 構築エラー: {e}")))
}
