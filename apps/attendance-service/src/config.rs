//! # 勤怠サービス設定
//!
//! 環境変数から設定を読み込む。HTTP サーバーと Lambda の両エントリポイントで共有する。
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|-----------|------|
//! | `ATTENDANCE_TABLE` | `Attendance` | 勤怠テーブル名 |
//! | `ATTENDANCE_HOST` | `0.0.0.0` | バインドアドレス（HTTP のみ） |
//! | `ATTENDANCE_PORT` | `3000` | ポート番号（HTTP のみ） |
//! | `DYNAMODB_ENDPOINT` | なし | DynamoDB Local のエンドポイント |
//! | `ATTENDANCE_ENSURE_TABLE` | `false` | 起動時にテーブルを作成する |

use std::env;

use thiserror::Error;

/// テーブル名のデフォルト値
pub const DEFAULT_TABLE_NAME: &str = "Attendance";

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} の値が不正です: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// 勤怠サービスの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub table_name:        String,
    pub host:              String,
    pub port:              u16,
    pub dynamodb_endpoint: Option<String>,
    pub ensure_table:      bool,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を組み立てる（テスト用に環境変数から切り離す）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty("ATTENDANCE_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "ATTENDANCE_PORT",
                value,
            })?,
            None => 3000,
        };

        let ensure_table = match non_empty("ATTENDANCE_ENSURE_TABLE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                name: "ATTENDANCE_ENSURE_TABLE",
                value,
            })?,
            None => false,
        };

        Ok(Self {
            table_name: non_empty("ATTENDANCE_TABLE")
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            host: non_empty("ATTENDANCE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            dynamodb_endpoint: non_empty("DYNAMODB_ENDPOINT"),
            ensure_table,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
