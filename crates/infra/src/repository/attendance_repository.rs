//! # AttendanceRepository
//!
//! 勤怠記録の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **キー設計**: PK = `user_id`、SK = `date`。同一キーへの `PutItem` は無条件に上書き
//! - **ユーザー別検索**: `Query`（KeyConditionExpression）。期間指定時は SK の `BETWEEN`
//! - **日別検索**: `Scan` + FilterExpression。PK を使えないため全件走査になる
//! - **ページ送り**: `LastEvaluatedKey` が無くなるまで読み切る（API としてはページングしない）
//! - **不正アイテム**: 必須属性の欠けたアイテムは読み飛ばさず `InvalidItem` として検索全体を失敗させる

use std::collections::HashMap;

use async_trait::async_trait;
use attendance_domain::attendance::{
    AttendanceDate,
    AttendanceRecord,
    AttendanceStatus,
    DateRange,
    UserId,
    parse_timestamp,
};
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext, types::AttributeValue};

use crate::{
    InfraError,
    dynamodb::{PARTITION_KEY, SORT_KEY},
};

type Item = HashMap<String, AttributeValue>;

/// 勤怠リポジトリトレイト
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// 勤怠記録を書き込む（同一 `(user_id, date)` は上書き）
    async fn put(&self, record: &AttendanceRecord) -> Result<(), InfraError>;

    /// ユーザーの勤怠記録を取得する
    ///
    /// `range` 指定時は `date` がその閉区間に入るものだけを返す。
    /// 順序はストアが返した順（DynamoDB では `date` 昇順）。
    /// 記録に変換できないアイテムが 1 件でもあれば `InvalidItem` エラーを返す。
    async fn find_by_user(
        &self,
        user_id: &UserId,
        range: Option<&DateRange>,
    ) -> Result<Vec<AttendanceRecord>, InfraError>;

    /// 指定日の勤怠記録を全ユーザー分取得する（全件走査）
    ///
    /// 件数を取りこぼさないよう、変換できないアイテムは `InvalidItem` エラーにする。
    async fn find_by_date(&self, date: &AttendanceDate)
    -> Result<Vec<AttendanceRecord>, InfraError>;
}

/// DynamoDB 実装の AttendanceRepository
#[derive(Clone)]
pub struct DynamoDbAttendanceRepository {
    client:     Client,
    table_name: String,
}

impl DynamoDbAttendanceRepository {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

/// Query / Scan に渡す条件式一式
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionExpression {
    pub expression: String,
    pub names:      HashMap<String, String>,
    pub values:     HashMap<String, AttributeValue>,
}

impl ConditionExpression {
    /// ExpressionAttributeNames（空なら指定しない。DynamoDB は空マップを拒否する）
    fn names(&self) -> Option<HashMap<String, String>> {
        (!self.names.is_empty()).then(|| self.names.clone())
    }
}

/// ユーザー別検索の KeyConditionExpression を組み立てる
///
/// - 期間なし: `user_id = :uid`
/// - 期間あり: `user_id = :uid AND #date BETWEEN :start AND :end`
///
/// `date` は DynamoDB の予約語のため `#date` で参照する。
pub fn user_key_condition(user_id: &UserId, range: Option<&DateRange>) -> ConditionExpression {
    let mut expression = format!("{PARTITION_KEY} = :uid");
    let mut names = HashMap::new();
    let mut values = HashMap::new();
    values.insert(
        ":uid".to_string(),
        AttributeValue::S(user_id.as_str().to_string()),
    );

    if let Some(range) = range {
        expression.push_str(" AND #date BETWEEN :start AND :end");
        names.insert("#date".to_string(), SORT_KEY.to_string());
        values.insert(
            ":start".to_string(),
            AttributeValue::S(range.start().as_str().to_string()),
        );
        values.insert(
            ":end".to_string(),
            AttributeValue::S(range.end().as_str().to_string()),
        );
    }

    ConditionExpression {
        expression,
        names,
        values,
    }
}

/// 日別検索の FilterExpression を組み立てる（`#date = :date`）
pub fn date_filter(date: &AttendanceDate) -> ConditionExpression {
    ConditionExpression {
        expression: "#date = :date".to_string(),
        names:      HashMap::from([("#date".to_string(), SORT_KEY.to_string())]),
        values:     HashMap::from([(
            ":date".to_string(),
            AttributeValue::S(date.as_str().to_string()),
        )]),
    }
}

#[async_trait]
impl AttendanceRepository for DynamoDbAttendanceRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %record.user_id(), date = %record.date()))]
    async fn put(&self, record: &AttendanceRecord) -> Result<(), InfraError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| {
                InfraError::dynamo_db(format!(
                    "勤怠記録の書き込みに失敗: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id, ranged = range.is_some()))]
    async fn find_by_user(
        &self,
        user_id: &UserId,
        range: Option<&DateRange>,
    ) -> Result<Vec<AttendanceRecord>, InfraError> {
        let condition = user_key_condition(user_id, range);
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression(&condition.expression)
                .set_expression_attribute_names(condition.names())
                .set_expression_attribute_values(Some(condition.values.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    InfraError::dynamo_db(format!(
                        "勤怠記録の検索に失敗: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            records.extend(items_to_records(output.items())?);

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(records)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%date))]
    async fn find_by_date(
        &self,
        date: &AttendanceDate,
    ) -> Result<Vec<AttendanceRecord>, InfraError> {
        let filter = date_filter(date);
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression(&filter.expression)
                .set_expression_attribute_names(filter.names())
                .set_expression_attribute_values(Some(filter.values.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    InfraError::dynamo_db(format!(
                        "勤怠記録の走査に失敗: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            records.extend(items_to_records(output.items())?);

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(records)
    }
}

/// 勤怠記録を DynamoDB アイテムに変換する
///
/// `notes` が無い場合は属性ごと省略する。
pub fn record_to_item(record: &AttendanceRecord) -> Item {
    let mut item = HashMap::new();
    item.insert(
        PARTITION_KEY.to_string(),
        AttributeValue::S(record.user_id().as_str().to_string()),
    );
    item.insert(
        SORT_KEY.to_string(),
        AttributeValue::S(record.date().as_str().to_string()),
    );
    item.insert(
        "status".to_string(),
        AttributeValue::S(record.status().as_str().to_string()),
    );
    if let Some(notes) = record.notes() {
        item.insert("notes".to_string(), AttributeValue::S(notes.to_string()));
    }
    item.insert(
        "timestamp".to_string(),
        AttributeValue::S(record.timestamp_string()),
    );
    item
}

/// DynamoDB アイテムを勤怠記録に変換する
pub fn item_to_record(item: &Item) -> Result<AttendanceRecord, InfraError> {
    let user_id = UserId::new(get_s(item, PARTITION_KEY)?)
        .map_err(|e| InfraError::invalid_item(e.to_string()))?;
    let date = AttendanceDate::new(get_s(item, SORT_KEY)?)
        .map_err(|e| InfraError::invalid_item(e.to_string()))?;
    let status = AttendanceStatus::new(get_s(item, "status")?)
        .map_err(|e| InfraError::invalid_item(e.to_string()))?;
    // notes は NULL 型で保存されている場合もある
    let notes = item.get("notes").and_then(|v| v.as_s().ok()).cloned();
    let timestamp = parse_timestamp(&get_s(item, "timestamp")?)
        .map_err(|e| InfraError::invalid_item(e.to_string()))?;

    Ok(AttendanceRecord::from_stored(
        user_id, date, status, notes, timestamp,
    ))
}

/// 1 ページ分のアイテムをまとめて変換する（1 件でも不正なら全体をエラーにする）
fn items_to_records(items: &[Item]) -> Result<Vec<AttendanceRecord>, InfraError> {
    items.iter().map(item_to_record).collect()
}

/// DynamoDB アイテムから文字列属性を取得する
fn get_s(item: &Item, key: &str) -> Result<String, InfraError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| InfraError::invalid_item(format!("属性 '{key}' が見つかりません")))
}
