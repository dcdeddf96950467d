//! AttendanceRepository の統合テスト
//!
//! DynamoDB Local を使用する。テストごとにランダムな `user_id` / `date` を使い、
//! 共有テーブル上でデータを分離する。
//!
//! 実行方法:
//! ```bash
//! cargo test -p attendance-infra --test attendance_repository_test -- --ignored
//! ```

mod common;

use attendance_domain::attendance::{
    AttendanceDate,
    AttendanceRecord,
    AttendanceStatus,
    DateRange,
    UserId,
};
use attendance_infra::{
    dynamodb,
    repository::{AttendanceRepository, DynamoDbAttendanceRepository},
};
use chrono::Utc;
use pretty_assertions::assert_eq;
use tokio::sync::OnceCell;

/// テスト用テーブル名（全テスト共有）
const TEST_TABLE_NAME: &str = "test_attendance";

static TABLE_INITIALIZED: OnceCell<()> = OnceCell::const_new();

async fn setup() -> DynamoDbAttendanceRepository {
    let client = common::local_client().await;
    TABLE_INITIALIZED
        .get_or_init(|| {
            let client = &client;
            async move {
                dynamodb::ensure_attendance_table(client, TEST_TABLE_NAME)
                    .await
                    .expect("テーブルのセットアップに失敗");
            }
        })
        .await;
    DynamoDbAttendanceRepository::new(client, TEST_TABLE_NAME)
}

fn random_user() -> UserId {
    UserId::new(format!("user-{}", uuid::Uuid::now_v7())).unwrap()
}

fn record(user_id: &UserId, date: &str, status: &str, notes: Option<&str>) -> AttendanceRecord {
    AttendanceRecord::new(
        user_id.clone(),
        Some(AttendanceDate::new(date).unwrap()),
        AttendanceStatus::new(status).unwrap(),
        notes.map(str::to_string),
        Utc::now(),
    )
}

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_書き込んだ記録をユーザー別に読み戻せる() {
    let repo = setup().await;
    let user_id = random_user();
    let written = record(&user_id, "2024-01-01", "present", Some("朝会参加"));

    repo.put(&written).await.expect("書き込みに失敗");

    let found = repo.find_by_user(&user_id, None).await.expect("検索に失敗");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].status().as_str(), "present");
    assert_eq!(found[0].notes(), Some("朝会参加"));
    assert_eq!(found[0].timestamp_string(), written.timestamp_string());
}

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_同じキーへの書き込みは後勝ちで上書きされる() {
    let repo = setup().await;
    let user_id = random_user();

    repo.put(&record(&user_id, "2024-01-01", "present", Some("1回目")))
        .await
        .unwrap();
    repo.put(&record(&user_id, "2024-01-01", "absent", None))
        .await
        .unwrap();

    let found = repo.find_by_user(&user_id, None).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].status().as_str(), "absent");
    assert_eq!(found[0].notes(), None);
}

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_期間指定の検索は範囲内の記録だけを返す() {
    let repo = setup().await;
    let user_id = random_user();
    for date in ["2024-01-01", "2024-01-10", "2024-01-20", "2024-02-01"] {
        repo.put(&record(&user_id, date, "present", None)).await.unwrap();
    }

    let range = DateRange::new(
        AttendanceDate::new("2024-01-05").unwrap(),
        AttendanceDate::new("2024-01-20").unwrap(),
    );
    let found = repo.find_by_user(&user_id, Some(&range)).await.unwrap();

    let dates: Vec<&str> = found.iter().map(|r| r.date().as_str()).collect();
    assert_eq!(dates, vec!["2024-01-10", "2024-01-20"]);
}

#[tokio::test]
#[ignore = "DynamoDB Local が必要"]
async fn test_日別検索は全ユーザーの該当日の記録を返す() {
    let repo = setup().await;
    // 共有テーブル上で他テストと衝突しない日付を使う
    let day = format!("9999-{}", &uuid::Uuid::now_v7().simple().to_string()[..8]);
    let alice = random_user();
    let bob = random_user();

    repo.put(&record(&alice, &day, "present", None)).await.unwrap();
    repo.put(&record(&bob, &day, "absent", None)).await.unwrap();
    repo.put(&record(&bob, "2024-01-01", "present", None))
        .await
        .unwrap();

    let date = AttendanceDate::new(day.clone()).unwrap();
    let found = repo.find_by_date(&date).await.unwrap();

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|r| r.date().as_str() == day));
}
