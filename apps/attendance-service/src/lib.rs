//! # 勤怠サービス ライブラリ
//!
//! HTTP サーバー（`attendance-service`）と Lambda（`attendance-lambda`）の
//! 両エントリポイントが共有するユースケース・ハンドラ・ルーターを公開する。

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod lambda;
pub mod usecase;
