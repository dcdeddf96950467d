//! # 勤怠システム共有ユーティリティ
//!
//! ビジネスロジックを含まない横断的なユーティリティを提供する。
//!
//! - HTTP アダプタ / Lambda アダプタ共通のレスポンス型
//! - トレーシング初期化（`observability` feature）

pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
