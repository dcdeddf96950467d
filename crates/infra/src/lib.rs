//! # 勤怠インフラ層
//!
//! DynamoDB との接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **DynamoDB 接続**: クライアント生成とテーブルの自動作成
//! - **リポジトリ実装**: [`AttendanceRepository`] の DynamoDB 実装
//! - **テスト用モック**: `test-utils` feature でインメモリ実装を公開
//!
//! ## モジュール構成
//!
//! - [`dynamodb`] - DynamoDB 接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装

pub mod dynamodb;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
pub use repository::{AttendanceRepository, DynamoDbAttendanceRepository};
