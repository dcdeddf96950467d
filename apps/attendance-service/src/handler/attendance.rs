//! # 勤怠ハンドラ
//!
//! 勤怠の記録と照会 API を提供する。
//!
//! ## エンドポイント
//!
//! - `POST /attendance` - 勤怠を記録（同じユーザー・日付は上書き）
//! - `GET /attendance/{user_id}` - ユーザーの勤怠一覧（`start_date` / `end_date` で期間指定）
//! - `GET /attendance/status/{date}` - 指定日の全ユーザーの勤怠

use std::sync::Arc;

use attendance_domain::attendance::AttendanceRecord;
use axum::{
    Json,
    extract::{
        Path,
        Query,
        State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AttendanceError,
    usecase::{
        AttendanceUseCaseImpl,
        DailyAttendance,
        GetUserAttendanceInput,
        MarkAttendanceInput,
    },
};

/// 勤怠 API の共有状態
pub struct AttendanceState {
    pub usecase: AttendanceUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 勤怠記録リクエスト
///
/// 欠落フィールドを 400 として返すため、必須項目も `Option` で受ける。
#[derive(Debug, Default, Deserialize)]
pub struct MarkAttendanceRequest {
    pub user_id: Option<String>,
    pub date:    Option<String>,
    pub status:  Option<String>,
    pub notes:   Option<String>,
}

impl From<MarkAttendanceRequest> for MarkAttendanceInput {
    fn from(req: MarkAttendanceRequest) -> Self {
        Self {
            user_id: req.user_id,
            date:    req.date,
            status:  req.status,
            notes:   req.notes,
        }
    }
}

/// 期間指定クエリパラメータ
///
/// `start_date` / `end_date` と camelCase の `startDate` / `endDate` を受け付ける。
/// 両方の表記が送られた場合は snake_case を優先する（Lambda アダプタと同じ規則）。
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceRangeQuery {
    pub start_date:       Option<String>,
    pub end_date:         Option<String>,
    #[serde(rename = "startDate")]
    pub start_date_camel: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date_camel:   Option<String>,
}

impl AttendanceRangeQuery {
    /// キー名から値を引く関数で組み立てる（Lambda のクエリマップ用）
    pub fn from_params(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            start_date:       lookup("start_date"),
            end_date:         lookup("end_date"),
            start_date_camel: lookup("startDate"),
            end_date_camel:   lookup("endDate"),
        }
    }

    /// 表記の優先順位を解決した `(start_date, end_date)`
    pub fn into_bounds(self) -> (Option<String>, Option<String>) {
        (
            self.start_date.or(self.start_date_camel),
            self.end_date.or(self.end_date_camel),
        )
    }
}

/// 勤怠記録 DTO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecordDto {
    pub user_id:   String,
    pub date:      String,
    pub status:    String,
    pub notes:     Option<String>,
    pub timestamp: String,
}

impl From<&AttendanceRecord> for AttendanceRecordDto {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            user_id:   record.user_id().to_string(),
            date:      record.date().to_string(),
            status:    record.status().to_string(),
            notes:     record.notes().map(str::to_string),
            timestamp: record.timestamp_string(),
        }
    }
}

/// 日別勤怠 DTO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendanceDto {
    pub date:          String,
    pub total_records: usize,
    pub records:       Vec<AttendanceRecordDto>,
}

impl From<&DailyAttendance> for DailyAttendanceDto {
    fn from(daily: &DailyAttendance) -> Self {
        Self {
            date:          daily.date.to_string(),
            total_records: daily.total_records(),
            records:       daily.records.iter().map(AttendanceRecordDto::from).collect(),
        }
    }
}

// --- ハンドラ ---

/// POST /attendance
///
/// ## レスポンス
///
/// - `201 Created`: 保存された記録（サーバー付与の `timestamp` を含む）
/// - `400 Bad Request`: `user_id` / `status` の欠落、JSON として解釈できないボディ
/// - `500 Internal Server Error`: ストレージエラー
pub async fn mark_attendance(
    State(state): State<Arc<AttendanceState>>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AttendanceError> {
    let Json(req) = payload.map_err(|rejection| AttendanceError::BadRequest(rejection.body_text()))?;

    let record = state.usecase.mark_attendance(req.into()).await?;

    Ok((StatusCode::CREATED, Json(AttendanceRecordDto::from(&record))))
}

/// GET /attendance/{user_id}
///
/// `start_date` と `end_date` が両方指定された場合のみ期間で絞り込む。
/// 解釈できないクエリ文字列（同じキーの重複など）は 400。
pub async fn get_user_attendance(
    State(state): State<Arc<AttendanceState>>,
    Path(user_id): Path<String>,
    query: Result<Query<AttendanceRangeQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AttendanceError> {
    let Query(query) =
        query.map_err(|rejection| AttendanceError::BadRequest(rejection.body_text()))?;
    let (start_date, end_date) = query.into_bounds();

    let records = state
        .usecase
        .get_user_attendance(GetUserAttendanceInput {
            user_id,
            start_date,
            end_date,
        })
        .await?;

    let items: Vec<AttendanceRecordDto> = records.iter().map(AttendanceRecordDto::from).collect();
    Ok((StatusCode::OK, Json(items)))
}

/// GET /attendance/status/{date}
pub async fn get_daily_attendance(
    State(state): State<Arc<AttendanceState>>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AttendanceError> {
    let daily = state.usecase.get_daily_attendance(date).await?;

    Ok((StatusCode::OK, Json(DailyAttendanceDto::from(&daily))))
}

/// パスは存在するがメソッドが扱えない場合のフォールバック
pub async fn method_not_allowed(method: Method) -> AttendanceError {
    AttendanceError::UnsupportedMethod(method.to_string())
}

/// どのルートにも一致しない場合のフォールバック
pub async fn not_found(uri: Uri) -> AttendanceError {
    AttendanceError::NotFound(uri.path().to_string())
}
