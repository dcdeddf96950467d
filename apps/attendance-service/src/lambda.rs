//! # Lambda アダプタ
//!
//! API Gateway のプロキシイベントを受け取り、HTTP アダプタと同じルートを
//! 手動でディスパッチする。
//!
//! ```text
//! ApiGatewayProxyRequest ─→ ProxyRequest ─→ dispatch ─→ ProxyResponse ─→ ApiGatewayProxyResponse
//! ```
//!
//! - `OPTIONS` は任意のパスでプリフライト成功を返す
//! - `GET` / `POST` 以外のメソッドは 405
//! - どのルートにも一致しないパスは 404
//! - すべてのレスポンスに CORS ヘッダーを付与する

use std::collections::HashMap;

use attendance_shared::HealthResponse;
use aws_lambda_events::{
    apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse},
    encodings::Body,
};
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use lambda_runtime::LambdaEvent;
use serde::Serialize;
use tracing::Instrument;

use crate::{
    error::AttendanceError,
    handler::{
        attendance::{
            AttendanceRangeQuery,
            AttendanceRecordDto,
            DailyAttendanceDto,
            MarkAttendanceRequest,
        },
        health::RootResponse,
    },
    usecase::{AttendanceUseCaseImpl, GetUserAttendanceInput},
};

/// 期間指定として受け付けるクエリキー
const START_DATE_KEYS: [&str; 2] = ["start_date", "startDate"];
const END_DATE_KEYS: [&str; 2] = ["end_date", "endDate"];

/// ディスパッチに必要な部分だけを取り出したリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub method: Method,
    pub path:   String,
    pub query:  HashMap<String, String>,
    pub body:   Option<String>,
}

impl ProxyRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn range_query(&self) -> AttendanceRangeQuery {
        AttendanceRangeQuery::from_params(|key| self.query.get(key).cloned())
    }
}

impl From<ApiGatewayProxyRequest> for ProxyRequest {
    fn from(event: ApiGatewayProxyRequest) -> Self {
        let query = START_DATE_KEYS
            .iter()
            .chain(END_DATE_KEYS.iter())
            .filter_map(|key| {
                event
                    .query_string_parameters
                    .first(key)
                    .map(|value| (key.to_string(), value.to_string()))
            })
            .collect();

        Self {
            method: event.http_method,
            path: event.path.unwrap_or_else(|| "/".to_string()),
            query,
            body: event.body,
        }
    }
}

/// ディスパッチ結果（ステータスと JSON ボディ）
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body:   serde_json::Value,
}

impl ProxyResponse {
    fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status, body },
            Err(e) => {
                tracing::error!(error = %e, "レスポンスのシリアライズに失敗");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body:   serde_json::json!({ "detail": e.to_string() }),
                }
            }
        }
    }

    fn from_error(err: &AttendanceError) -> Self {
        let body = err.to_error_response();
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::json(status, &body)
    }
}

impl From<ProxyResponse> for ApiGatewayProxyResponse {
    fn from(response: ProxyResponse) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        );

        Self {
            status_code: i64::from(response.status.as_u16()),
            headers,
            body: Some(Body::Text(response.body.to_string())),
            ..Default::default()
        }
    }
}

/// Lambda ランタイムから呼ばれるイベントハンドラ
pub async fn handle_event(
    usecase: &AttendanceUseCaseImpl,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    let request = ProxyRequest::from(payload);
    let span = tracing::info_span!(
        "request",
        request_id = %context.request_id,
        http.method = %request.method,
        http.path = %request.path,
    );

    let response = dispatch(usecase, request).instrument(span).await;
    Ok(response.into())
}

/// リクエストをルートに振り分け、エラーもレスポンスに変換して返す
pub async fn dispatch(usecase: &AttendanceUseCaseImpl, request: ProxyRequest) -> ProxyResponse {
    match route(usecase, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(error = %e, "リクエストの処理に失敗");
            ProxyResponse::from_error(&e)
        }
    }
}

async fn route(
    usecase: &AttendanceUseCaseImpl,
    request: ProxyRequest,
) -> Result<ProxyResponse, AttendanceError> {
    if request.method == Method::OPTIONS {
        return Ok(ProxyResponse::json(
            StatusCode::OK,
            &serde_json::json!({ "message": "CORS preflight handled" }),
        ));
    }
    if request.method != Method::GET && request.method != Method::POST {
        return Err(AttendanceError::UnsupportedMethod(request.method.to_string()));
    }

    let segments: Vec<&str> = request
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    match segments.as_slice() {
        [] => {
            require_method(&request.method, Method::GET)?;
            Ok(ProxyResponse::json(
                StatusCode::OK,
                &RootResponse {
                    message: "Attendance System API",
                },
            ))
        }
        ["health"] => {
            require_method(&request.method, Method::GET)?;
            Ok(ProxyResponse::json(
                StatusCode::OK,
                &HealthResponse::healthy(env!("CARGO_PKG_VERSION")),
            ))
        }
        ["attendance"] => {
            require_method(&request.method, Method::POST)?;
            let body = request.body.as_deref().unwrap_or("{}");
            let req: MarkAttendanceRequest = serde_json::from_str(body)
                .map_err(|e| AttendanceError::BadRequest(format!("JSON の解析に失敗: {e}")))?;
            let record = usecase.mark_attendance(req.into()).await?;
            Ok(ProxyResponse::json(
                StatusCode::CREATED,
                &AttendanceRecordDto::from(&record),
            ))
        }
        ["attendance", "status", date] => {
            require_method(&request.method, Method::GET)?;
            let daily = usecase.get_daily_attendance(date.to_string()).await?;
            Ok(ProxyResponse::json(
                StatusCode::OK,
                &DailyAttendanceDto::from(&daily),
            ))
        }
        ["attendance", user_id] => {
            require_method(&request.method, Method::GET)?;
            let (start_date, end_date) = request.range_query().into_bounds();
            let records = usecase
                .get_user_attendance(GetUserAttendanceInput {
                    user_id: user_id.to_string(),
                    start_date,
                    end_date,
                })
                .await?;
            let items: Vec<AttendanceRecordDto> =
                records.iter().map(AttendanceRecordDto::from).collect();
            Ok(ProxyResponse::json(StatusCode::OK, &items))
        }
        _ => Err(AttendanceError::NotFound(request.path.clone())),
    }
}

fn require_method(actual: &Method, expected: Method) -> Result<(), AttendanceError> {
    if *actual == expected {
        Ok(())
    } else {
        Err(AttendanceError::UnsupportedMethod(actual.to_string()))
    }
}
