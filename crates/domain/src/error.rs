//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成や保存済みデータの復元で発生するエラー。
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 必須項目の欠落 |
//! | `InvalidTimestamp` | 500 Internal Server Error | 保存済みタイムスタンプの破損 |

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 必須フィールドが未入力・空白のみの場合に使用する。
    /// メッセージには問題のあるフィールド名を含める。
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// タイムスタンプの解釈に失敗した
    #[error("タイムスタンプを解釈できません: {0}")]
    InvalidTimestamp(String),
}
