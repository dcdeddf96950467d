//! # 勤怠記録
//!
//! 1 ユーザー・1 日あたり 1 件の勤怠記録を表現する。
//!
//! ## キー設計
//!
//! - PK: `user_id`
//! - SK: `date`（`YYYY-MM-DD`）
//!
//! 同じ `(user_id, date)` への書き込みは後勝ちで上書きされる。バージョン管理はしない。
//!
//! ## `date` の決定規則
//!
//! 呼び出し元が `date` を指定した場合はその値を使い、未指定の場合は
//! サーバーが付与した `timestamp` の UTC 日付部分から導出する。
//! HTTP アダプタと Lambda アダプタのどちらから呼ばれても同じ規則を適用する。

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::DomainError;

define_required_string! {
    /// ユーザー ID（パーティションキー）
    pub struct UserId {
        label: "user_id",
    }
}

define_required_string! {
    /// 勤怠ステータス（`"present"`, `"absent"` などの自由形式）
    pub struct AttendanceStatus {
        label: "status",
    }
}

define_required_string! {
    /// 勤怠日（ソートキー、`YYYY-MM-DD`）
    ///
    /// ISO 形式の日付は辞書順と時系列順が一致するため、範囲検索は文字列比較で行う。
    pub struct AttendanceDate {
        label: "date",
    }
}

impl AttendanceDate {
    /// タイムスタンプの UTC 日付部分から勤怠日を導出する
    pub fn from_timestamp(timestamp: &DateTime<Utc>) -> Self {
        Self(timestamp.format("%Y-%m-%d").to_string())
    }
}

/// 勤怠日の閉区間 `[start, end]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: AttendanceDate,
    end:   AttendanceDate,
}

impl DateRange {
    pub fn new(start: AttendanceDate, end: AttendanceDate) -> Self {
        Self { start, end }
    }

    /// 両端が揃っている場合のみ範囲を作る
    ///
    /// 片側だけの指定は範囲指定なし（全件）として扱う。
    pub fn from_bounds(start: Option<AttendanceDate>, end: Option<AttendanceDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self::new(start, end)),
            _ => None,
        }
    }

    pub fn start(&self) -> &AttendanceDate {
        &self.start
    }

    pub fn end(&self) -> &AttendanceDate {
        &self.end
    }

    /// `start > end` の場合 true（該当する記録は存在し得ない）
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: &AttendanceDate) -> bool {
        &self.start <= date && date <= &self.end
    }
}

/// 勤怠記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    user_id:   UserId,
    date:      AttendanceDate,
    status:    AttendanceStatus,
    notes:     Option<String>,
    timestamp: DateTime<Utc>,
}

impl AttendanceRecord {
    /// 新しい勤怠記録を作成する
    ///
    /// `timestamp` は `now`、`date` は未指定なら `now` の UTC 日付になる。
    /// 空白のみの `notes` は未指定として扱う。
    pub fn new(
        user_id: UserId,
        date: Option<AttendanceDate>,
        status: AttendanceStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let date = date.unwrap_or_else(|| AttendanceDate::from_timestamp(&now));
        Self {
            user_id,
            date,
            status,
            notes: normalize_notes(notes),
            timestamp: now,
        }
    }

    /// 永続化層から読み込んだ値で復元する
    pub fn from_stored(
        user_id: UserId,
        date: AttendanceDate,
        status: AttendanceStatus,
        notes: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            date,
            status,
            notes: normalize_notes(notes),
            timestamp,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn date(&self) -> &AttendanceDate {
        &self.date
    }

    pub fn status(&self) -> &AttendanceStatus {
        &self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// 保存・レスポンス用のタイムスタンプ文字列
    pub fn timestamp_string(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|n| !n.trim().is_empty())
}

/// タイムスタンプを ISO-8601（UTC, マイクロ秒, `Z` 付き）で整形する
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 保存済みタイムスタンプを解釈する
///
/// RFC 3339 に加え、タイムゾーン表記のない ISO-8601（既存データの形式）も
/// UTC として受け付ける。
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| DomainError::InvalidTimestamp(format!("{value}: {e}")))
}
