//! # 勤怠サービス Lambda
//!
//! API Gateway のプロキシ統合から呼ばれる Lambda 関数。
//! ルーティングとレスポンス形状は HTTP サーバーと共通。

use std::sync::Arc;

use attendance_domain::clock::SystemClock;
use attendance_infra::{
    dynamodb,
    repository::{AttendanceRepository, DynamoDbAttendanceRepository},
};
use attendance_service::{config::AppConfig, lambda, usecase::AttendanceUseCaseImpl};
use attendance_shared::observability::{TracingConfig, init_tracing};
use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::Instrument;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("attendance-lambda");
    init_tracing(&tracing_config);
    let app_span = tracing_config.app_span();

    let config = AppConfig::from_env()?;
    let client = dynamodb::create_client(config.dynamodb_endpoint.as_deref()).await;
    if config.ensure_table {
        dynamodb::ensure_attendance_table(&client, &config.table_name).await?;
    }

    let repository: Arc<dyn AttendanceRepository> =
        Arc::new(DynamoDbAttendanceRepository::new(client, config.table_name));
    let usecase = Arc::new(AttendanceUseCaseImpl::new(repository, Arc::new(SystemClock)));

    app_span.in_scope(|| tracing::info!("勤怠 Lambda を起動します"));

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<ApiGatewayProxyRequest>| {
            let usecase = Arc::clone(&usecase);
            async move { lambda::handle_event(&usecase, event).await }
                .instrument(app_span.clone())
        },
    ))
    .await
}
