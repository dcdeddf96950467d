//! # 勤怠サービス HTTP サーバー
//!
//! 勤怠 API を常駐 HTTP サーバーとして提供する。
//! 同じルートを Lambda で提供する場合は `attendance-lambda` バイナリを使う。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `ATTENDANCE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `ATTENDANCE_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `ATTENDANCE_TABLE` | No | 勤怠テーブル名（デフォルト: `Attendance`） |
//! | `DYNAMODB_ENDPOINT` | No | DynamoDB Local 使用時のエンドポイント |
//! | `ATTENDANCE_ENSURE_TABLE` | No | 起動時にテーブルを作成する（デフォルト: `false`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（DynamoDB Local）
//! DYNAMODB_ENDPOINT=http://localhost:8000 ATTENDANCE_ENSURE_TABLE=true \
//!     cargo run -p attendance-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use attendance_domain::clock::SystemClock;
use attendance_infra::{
    dynamodb,
    repository::{AttendanceRepository, DynamoDbAttendanceRepository},
};
use attendance_service::{
    app::build_app,
    config::AppConfig,
    handler::{AttendanceState, ReadinessState},
    usecase::AttendanceUseCaseImpl,
};
use attendance_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("attendance-service");
    init_tracing(&tracing_config);
    let _app_span = tracing_config.app_span().entered();

    let config = AppConfig::from_env()?;
    tracing::info!(
        "勤怠サービスを起動します: {}:{} (table: {})",
        config.host,
        config.port,
        config.table_name
    );

    let client = dynamodb::create_client(config.dynamodb_endpoint.as_deref()).await;
    if config.ensure_table {
        dynamodb::ensure_attendance_table(&client, &config.table_name).await?;
    }

    let repository: Arc<dyn AttendanceRepository> = Arc::new(DynamoDbAttendanceRepository::new(
        client.clone(),
        config.table_name.clone(),
    ));
    let state = Arc::new(AttendanceState {
        usecase: AttendanceUseCaseImpl::new(repository, Arc::new(SystemClock)),
    });
    let readiness = Arc::new(ReadinessState {
        client,
        table_name: config.table_name.clone(),
    });

    let app = build_app(state, Some(readiness));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("勤怠サービスが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("勤怠サービスを停止しました");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C ハンドラの登録に失敗");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}
