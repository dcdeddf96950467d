//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケースに委譲

pub mod attendance;
pub mod health;

pub use attendance::{
    AttendanceState,
    get_daily_attendance,
    get_user_attendance,
    mark_attendance,
    method_not_allowed,
    not_found,
};
pub use health::{ReadinessState, health_check, readiness_check, root};
