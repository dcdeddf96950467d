//! 勤怠ユースケース

use std::sync::Arc;

use attendance_domain::{
    attendance::{AttendanceDate, AttendanceRecord, AttendanceStatus, DateRange, UserId},
    clock::Clock,
};
use attendance_infra::repository::AttendanceRepository;
use attendance_shared::{event_log::event, log_business_event};

use crate::error::AttendanceError;

/// 勤怠記録の入力
///
/// 欠落フィールドをユースケースで検証するため、すべて `Option` で受け取る。
#[derive(Debug, Default, Clone)]
pub struct MarkAttendanceInput {
    pub user_id: Option<String>,
    pub date:    Option<String>,
    pub status:  Option<String>,
    pub notes:   Option<String>,
}

/// ユーザー別勤怠取得の入力
#[derive(Debug, Default, Clone)]
pub struct GetUserAttendanceInput {
    pub user_id:    String,
    pub start_date: Option<String>,
    pub end_date:   Option<String>,
}

/// 日別勤怠サマリー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAttendance {
    pub date:    AttendanceDate,
    pub records: Vec<AttendanceRecord>,
}

impl DailyAttendance {
    pub fn total_records(&self) -> usize {
        self.records.len()
    }
}

/// 勤怠ユースケース
pub struct AttendanceUseCaseImpl {
    repository: Arc<dyn AttendanceRepository>,
    clock:      Arc<dyn Clock>,
}

impl AttendanceUseCaseImpl {
    pub fn new(repository: Arc<dyn AttendanceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 勤怠を記録する
    ///
    /// 1. `user_id` と `status` の存在を検証（欠落時はストレージに触れない）
    /// 2. サーバー時刻で `timestamp` を付与し、`date` 未指定ならその UTC 日付を使う
    /// 3. `(user_id, date)` に上書き保存
    pub async fn mark_attendance(
        &self,
        input: MarkAttendanceInput,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let user_id = UserId::from_option(input.user_id)?;
        let status = AttendanceStatus::from_option(input.status)?;
        let date = non_blank(input.date).map(AttendanceDate::new).transpose()?;

        let record = AttendanceRecord::new(user_id, date, status, input.notes, self.clock.now());

        if let Err(e) = self.repository.put(&record).await {
            log_business_event!(
                event.category = event::category::ATTENDANCE,
                event.action = event::action::ATTENDANCE_MARKED,
                event.entity_id = %record.user_id(),
                event.result = event::result::FAILURE,
                "勤怠記録の保存に失敗"
            );
            return Err(e.into());
        }

        log_business_event!(
            event.category = event::category::ATTENDANCE,
            event.action = event::action::ATTENDANCE_MARKED,
            event.entity_id = %record.user_id(),
            event.result = event::result::SUCCESS,
            attendance.date = %record.date(),
            attendance.status = %record.status(),
            "勤怠を記録"
        );

        Ok(record)
    }

    /// ユーザーの勤怠記録を `date` 昇順で取得する
    ///
    /// 期間の両端が揃っている場合のみ絞り込む。片方だけの指定は無視する。
    /// 開始日が終了日より後なら、ストレージに問い合わせず空を返す。
    pub async fn get_user_attendance(
        &self,
        input: GetUserAttendanceInput,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let user_id = UserId::new(input.user_id)?;
        let start = non_blank(input.start_date)
            .map(AttendanceDate::new)
            .transpose()?;
        let end = non_blank(input.end_date).map(AttendanceDate::new).transpose()?;
        let range = DateRange::from_bounds(start, end);

        if range.as_ref().is_some_and(DateRange::is_inverted) {
            tracing::debug!(%user_id, "開始日が終了日より後のため空の結果を返す");
            return Ok(Vec::new());
        }

        let records = self
            .repository
            .find_by_user(&user_id, range.as_ref())
            .await?;
        Ok(records)
    }

    /// 指定日の全ユーザーの勤怠を取得する
    pub async fn get_daily_attendance(
        &self,
        date: String,
    ) -> Result<DailyAttendance, AttendanceError> {
        let date = AttendanceDate::new(date)?;
        let records = self.repository.find_by_date(&date).await?;
        Ok(DailyAttendance { date, records })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use attendance_domain::clock::FixedClock;
    use attendance_infra::mock::MockAttendanceRepository;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn sut(repository: &MockAttendanceRepository) -> AttendanceUseCaseImpl {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        AttendanceUseCaseImpl::new(
            Arc::new(repository.clone()),
            Arc::new(FixedClock::new(now)),
        )
    }

    fn input(user_id: &str, date: Option<&str>, status: &str) -> MarkAttendanceInput {
        MarkAttendanceInput {
            user_id: Some(user_id.to_string()),
            date:    date.map(str::to_string),
            status:  Some(status.to_string()),
            notes:   None,
        }
    }

    #[tokio::test]
    async fn test_勤怠を記録するとサーバー時刻が付与される() {
        let repository = MockAttendanceRepository::new();
        let sut = sut(&repository);

        let record = sut
            .mark_attendance(MarkAttendanceInput {
                notes: Some("リモート".to_string()),
                ..input("u1", Some("2024-01-01"), "present")
            })
            .await
            .unwrap();

        assert_eq!(record.date().as_str(), "2024-01-01");
        assert_eq!(record.timestamp_string(), "2024-01-15T09:30:00.000000Z");
        assert_eq!(record.notes(), Some("リモート"));
        assert_eq!(repository.records(), vec![record]);
    }

    #[tokio::test]
    async fn test_date未指定ならtimestampの日付を使う() {
        let repository = MockAttendanceRepository::new();
        let sut = sut(&repository);

        let record = sut
            .mark_attendance(input("u1", None, "present"))
            .await
            .unwrap();

        assert_eq!(record.date().as_str(), "2024-01-15");
    }

    #[tokio::test]
    async fn test_同じユーザーと日付への記録は上書きされる() {
        let repository = MockAttendanceRepository::new();
        let sut = sut(&repository);

        sut.mark_attendance(input("u1", Some("2024-01-01"), "present"))
            .await
            .unwrap();
        sut.mark_attendance(input("u1", Some("2024-01-01"), "absent"))
            .await
            .unwrap();

        let records = repository.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status().as_str(), "absent");
    }

    #[tokio::test]
    async fn test_前後に空白を含む値もそのまま保存して読み戻せる() {
        let repository = MockAttendanceRepository::new();
        let sut = sut(&repository);

        sut.mark_attendance(input(" u1 ", Some("2024-01-01"), " present "))
            .await
            .unwrap();

        let records = sut
            .get_user_attendance(GetUserAttendanceInput {
                user_id: " u1 ".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id().as_str(), " u1 ");
        assert_eq!(records[0].status().as_str(), " present ");
    }

    #[rstest]
    #[case::user_id欠落(None, Some("present"), "user_id は必須です")]
    #[case::user_id空文字(Some(""), Some("present"), "user_id は必須です")]
    #[case::status欠落(Some("u1"), None, "status は必須です")]
    #[tokio::test]
    async fn test_必須フィールド欠落はバリデーションエラーでストレージに触れない(
        #[case] user_id: Option<&str>,
        #[case] status: Option<&str>,
        #[case] expected: &str,
    ) {
        let repository = MockAttendanceRepository::new();
        let sut = sut(&repository);

        let result = sut
            .mark_attendance(MarkAttendanceInput {
                user_id: user_id.map(str::to_string),
                status: status.map(str::to_string),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AttendanceError::Validation(ref msg)) if msg == expected));
        assert_eq!(repository.call_count(), 0);
    }

    #[tokio::test]
    async fn test_保存失敗はストレージエラー() {
        let repository = MockAttendanceRepository::failing("throttled");
        let sut = sut(&repository);

        let result = sut.mark_attendance(input("u1", None, "present")).await;

        assert!(matches!(result, Err(AttendanceError::Storage(_))));
    }

    async fn seeded() -> (MockAttendanceRepository, AttendanceUseCaseImpl) {
        let repository = MockAttendanceRepository::new();
        let sut = sut(&repository);
        for (user_id, date) in [
            ("u1", "2024-01-03"),
            ("u1", "2024-01-01"),
            ("u1", "2024-01-02"),
            ("u2", "2024-01-01"),
        ] {
            sut.mark_attendance(input(user_id, Some(date), "present"))
                .await
                .unwrap();
        }
        (repository, sut)
    }

    fn dates(records: &[AttendanceRecord]) -> Vec<&str> {
        records.iter().map(|r| r.date().as_str()).collect()
    }

    #[tokio::test]
    async fn test_ユーザーの勤怠を日付昇順で返す() {
        let (_, sut) = seeded().await;

        let records = sut
            .get_user_attendance(GetUserAttendanceInput {
                user_id: "u1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(dates(&records), vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[rstest]
    #[case::両端指定(Some("2024-01-02"), Some("2024-01-03"), vec!["2024-01-02", "2024-01-03"])]
    #[case::同日(Some("2024-01-02"), Some("2024-01-02"), vec!["2024-01-02"])]
    #[case::片側のみは無視(Some("2024-01-02"), None, vec!["2024-01-01", "2024-01-02", "2024-01-03"])]
    #[case::空文字は未指定扱い(Some(""), Some("2024-01-01"), vec!["2024-01-01", "2024-01-02", "2024-01-03"])]
    #[tokio::test]
    async fn test_期間指定でユーザーの勤怠を絞り込む(
        #[case] start_date: Option<&str>,
        #[case] end_date: Option<&str>,
        #[case] expected: Vec<&str>,
    ) {
        let (_, sut) = seeded().await;

        let records = sut
            .get_user_attendance(GetUserAttendanceInput {
                user_id:    "u1".to_string(),
                start_date: start_date.map(str::to_string),
                end_date:   end_date.map(str::to_string),
            })
            .await
            .unwrap();

        assert_eq!(dates(&records), expected);
    }

    #[tokio::test]
    async fn test_開始日が終了日より後なら問い合わせずに空を返す() {
        let (repository, sut) = seeded().await;
        let calls_before = repository.call_count();

        let records = sut
            .get_user_attendance(GetUserAttendanceInput {
                user_id:    "u1".to_string(),
                start_date: Some("2024-01-03".to_string()),
                end_date:   Some("2024-01-01".to_string()),
            })
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(repository.call_count(), calls_before);
    }

    #[tokio::test]
    async fn test_記録のないユーザーは空を返す() {
        let (_, sut) = seeded().await;

        let records = sut
            .get_user_attendance(GetUserAttendanceInput {
                user_id: "nobody".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_日別勤怠は全ユーザーの記録と件数を返す() {
        let (_, sut) = seeded().await;

        let daily = sut
            .get_daily_attendance("2024-01-01".to_string())
            .await
            .unwrap();

        assert_eq!(daily.date.as_str(), "2024-01-01");
        assert_eq!(daily.total_records(), 2);
        let users: Vec<&str> = daily.records.iter().map(|r| r.user_id().as_str()).collect();
        assert_eq!(users, vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn test_記録のない日は件数ゼロ() {
        let (_, sut) = seeded().await;

        let daily = sut
            .get_daily_attendance("2030-12-31".to_string())
            .await
            .unwrap();

        assert_eq!(daily.total_records(), 0);
        assert!(daily.records.is_empty());
    }

    #[tokio::test]
    async fn test_読み取り失敗はストレージエラー() {
        let repository = MockAttendanceRepository::failing("unavailable");
        let sut = sut(&repository);

        let result = sut.get_daily_attendance("2024-01-01".to_string()).await;

        assert!(matches!(result, Err(AttendanceError::Storage(_))));
    }
}
