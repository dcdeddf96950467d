//! # ルーター構築
//!
//! 勤怠 API のルーティングと共通レイヤー（CORS・トレース）を組み立てる。

use std::sync::Arc;

use attendance_shared::observability::make_request_span;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handler::{
    AttendanceState,
    ReadinessState,
    get_daily_attendance,
    get_user_attendance,
    health_check,
    mark_attendance,
    method_not_allowed,
    not_found,
    readiness_check,
    root,
};

/// 全レスポンスに付与する CORS 設定（任意のオリジン・メソッド・ヘッダー）
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 勤怠 API のルーターを構築する
///
/// `readiness` を渡した場合のみ `/health/ready` を公開する。
pub fn build_app(state: Arc<AttendanceState>, readiness: Option<Arc<ReadinessState>>) -> Router {
    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/attendance", post(mark_attendance))
        .route("/attendance/status/{date}", get(get_daily_attendance))
        .route("/attendance/{user_id}", get(get_user_attendance))
        .with_state(state);

    if let Some(readiness) = readiness {
        app = app.merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness),
        );
    }

    app.method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}
