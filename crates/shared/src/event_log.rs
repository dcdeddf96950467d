//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq 'select(.["event.kind"] == "business_event")'` で抽出できるよう、
//! ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! フィールド名はドット記法（`event.action`、`error.kind`）を使用する。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、`tracing::info!` で出力する。
/// 呼び出し側のクレートが `tracing` に依存している必要がある。
///
/// ## 慣例フィールド
///
/// - `event.category`: [`event::category`] の定数
/// - `event.action`: [`event::action`] の定数
/// - `event.entity_id`: 対象の識別子
/// - `event.result`: [`event::result`] の定数
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    pub mod category {
        pub const ATTENDANCE: &str = "attendance";
    }

    pub mod action {
        pub const ATTENDANCE_MARKED: &str = "attendance.marked";
    }

    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    pub mod category {
        /// インフラストラクチャ（DynamoDB）
        pub const INFRASTRUCTURE: &str = "infrastructure";
    }

    pub mod kind {
        pub const STORAGE: &str = "storage";
    }
}
