//! # ログ・トレース初期化
//!
//! HTTP サーバーと Lambda の両バイナリが同じ手順でサブスクライバーを組み立てる。
//!
//! ```text
//! TracingConfig::from_env("attendance-service")
//!     ├─ init_tracing(&config)   // EnvFilter + fmt(json|pretty) + ErrorLayer
//!     └─ config.app_span()       // service = "attendance-service" を持つ最上位スパン
//! ```
//!
//! `LOG_FORMAT=json` で CloudWatch 向けの 1 行 JSON、それ以外は Pretty 出力。

use std::str::FromStr;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,attendance=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 JSON（Lambda / 本番）
    Json,
    /// 開発用
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown LOG_FORMAT={other:?}")),
        }
    }
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する。未設定・不正値は Pretty
    ///
    /// サブスクライバー初期化前に呼ばれるため、不正値の警告は stderr に出す。
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::parse::<Self>) {
            Some(Ok(format)) => format,
            Some(Err(e)) => {
                eprintln!("WARNING: {e}, falling back to pretty");
                Self::Pretty
            }
            None => Self::default(),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// `app` スパンの `service` フィールドに出す名前
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// 出力形式は環境変数 `LOG_FORMAT` から決める
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let log_format = LogFormat::from_value(std::env::var("LOG_FORMAT").ok().as_deref());
        Self::new(service_name, log_format)
    }

    /// プロセス全体を包む `app` スパン
    ///
    /// HTTP サーバーでは `entered()` で main に張り、Lambda では各呼び出しを
    /// `instrument` で包む。リクエストスパンはこの子になる。
    #[cfg(feature = "observability")]
    pub fn app_span(&self) -> tracing::Span {
        tracing::info_span!("app", service = %self.service_name)
    }
}

/// グローバルサブスクライバーを登録する
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let output = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// `TraceLayer::make_span_with` 用のリクエストスパン
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    tracing::info_span!(
        "request",
        http.method = %request.method(),
        http.path = %request.uri().path(),
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("json"), LogFormat::Json)]
    #[case(Some(" JSON "), LogFormat::Json)]
    #[case(Some("pretty"), LogFormat::Pretty)]
    #[case(Some("yaml"), LogFormat::Pretty)]
    #[case(None, LogFormat::Pretty)]
    fn test_log_formatの解釈(#[case] value: Option<&str>, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::from_value(value), expected);
    }

    #[test]
    fn test_不正なlog_formatは理由付きのエラー() {
        assert_eq!(
            "yaml".parse::<LogFormat>(),
            Err("unknown LOG_FORMAT=\"yaml\"".to_string())
        );
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_appスパンは設定のサービス名を持つ() {
        let config = TracingConfig::new("attendance-lambda", LogFormat::Json);
        let subscriber = tracing_subscriber::registry();

        tracing::subscriber::with_default(subscriber, || {
            let span = config.app_span();
            let metadata = span.metadata().expect("スパンが有効であること");

            assert_eq!(metadata.name(), "app");
            assert!(metadata.fields().field("service").is_some());
        });
    }
}
