//! # ユースケース層
//!
//! 勤怠サービスのビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリと時計を `Arc<dyn Trait>` で外部から注入
//! - **薄いアダプタ**: HTTP ハンドラと Lambda アダプタは同じユースケースを呼ぶ

pub mod attendance;

pub use attendance::{
    AttendanceUseCaseImpl,
    DailyAttendance,
    GetUserAttendanceInput,
    MarkAttendanceInput,
};
