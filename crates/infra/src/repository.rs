//! # リポジトリ実装
//!
//! - **テスタビリティ**: トレイト経由でモック可能な設計
//! - **DynamoDB 抽象化**: AttributeValue の組み立て・変換をこの層に閉じ込める

pub mod attendance_repository;

pub use attendance_repository::{AttendanceRepository, DynamoDbAttendanceRepository};
