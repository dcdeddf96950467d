//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! attendance-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use attendance_domain::attendance::{AttendanceDate, AttendanceRecord, DateRange, UserId};

use crate::{error::InfraError, repository::AttendanceRepository};

/// インメモリの勤怠リポジトリ
///
/// `(user_id, date)` をキーとする `BTreeMap` で保持するため、ユーザー別検索は
/// DynamoDB と同じく `date` 昇順で返る。
#[derive(Clone, Default)]
pub struct MockAttendanceRepository {
    records: Arc<Mutex<BTreeMap<(UserId, AttendanceDate), AttendanceRecord>>>,
    calls:   Arc<AtomicUsize>,
    failure: Option<String>,
}

impl MockAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作が DynamoDB エラーで失敗するリポジトリ
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// リポジトリが呼び出された回数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 保存されている全記録（キー順）
    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }

    fn begin(&self) -> Result<(), InfraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(InfraError::dynamo_db(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AttendanceRepository for MockAttendanceRepository {
    async fn put(&self, record: &AttendanceRecord) -> Result<(), InfraError> {
        self.begin()?;
        self.records.lock().unwrap().insert(
            (record.user_id().clone(), record.date().clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        range: Option<&DateRange>,
    ) -> Result<Vec<AttendanceRecord>, InfraError> {
        self.begin()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id() == user_id)
            .filter(|r| range.is_none_or(|range| range.contains(r.date())))
            .cloned()
            .collect())
    }

    async fn find_by_date(
        &self,
        date: &AttendanceDate,
    ) -> Result<Vec<AttendanceRecord>, InfraError> {
        self.begin()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.date() == date)
            .cloned()
            .collect())
    }
}
