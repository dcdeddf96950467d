//! # 勤怠ドメイン層
//!
//! 勤怠記録（AttendanceRecord）とその値オブジェクトを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! attendance-service → infra → domain
//!          ↘                    ↑
//!            ───────────────────
//! ```
//!
//! ドメイン層は DynamoDB や HTTP の詳細に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`attendance`] - 勤怠記録と値オブジェクト
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメイン層で発生するエラーの定義
//!
//! ## 使用例
//!
//! ```rust
//! use attendance_domain::attendance::{AttendanceRecord, AttendanceStatus, UserId};
//! use chrono::{TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let record = AttendanceRecord::new(
//!     UserId::new("u1").unwrap(),
//!     None,
//!     AttendanceStatus::new("present").unwrap(),
//!     None,
//!     now,
//! );
//! assert_eq!(record.date().as_str(), "2024-01-01");
//! ```

#[macro_use]
mod macros;

pub mod attendance;
pub mod clock;
pub mod error;

pub use error::DomainError;
