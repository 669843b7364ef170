//! クエリ結果のJSON射影
//!
//! 1つのSQL文を実行し、宣言した列を順番どおりJSONオブジェクトへ写す。
//! NULLは型ごとの既定値（`0` / `0.0` / `""`）になる。

use super::connector::DbHandle;
use crate::common::error::BridgeResult;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// One projected row, keys in column declaration order.
pub type JsonRow = Map<String, Value>;

/// JSON type a column is projected to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// 64-bit integer, NULL → `0`
    Integer,
    /// floating point, NULL → `0.0`
    Real,
    /// string, NULL → `""`
    Text,
}

/// A named result column and the JSON type it is emitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// column alias in the SELECT list, also used as the JSON key
    pub name: &'static str,
    /// output type
    pub kind: ColumnKind,
}

impl Column {
    /// Integer column.
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Integer,
        }
    }

    /// Real column.
    pub const fn real(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Real,
        }
    }

    /// Text column.
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
        }
    }
}

/// SQLを実行し全行を取得する
///
/// `binds` は先頭から順に位置パラメータ（`?`）へ束縛される。
pub async fn fetch_rows(
    handle: &DbHandle,
    sql: &str,
    binds: &[i64],
) -> BridgeResult<Vec<SqliteRow>> {
    let mut query = sqlx::query(sql);
    for value in binds {
        query = query.bind(*value);
    }
    Ok(query.fetch_all(handle.pool()).await?)
}

/// SQLを実行し、各行を `columns` の順でJSONオブジェクトへ射影する
pub async fn fetch_projected(
    handle: &DbHandle,
    sql: &str,
    binds: &[i64],
    columns: &[Column],
) -> BridgeResult<Vec<JsonRow>> {
    let rows = fetch_rows(handle, sql, binds).await?;
    rows.iter().map(|row| project_row(row, columns)).collect()
}

/// Project a single row.
pub fn project_row(row: &SqliteRow, columns: &[Column]) -> BridgeResult<JsonRow> {
    let mut object = JsonRow::with_capacity(columns.len());
    for column in columns {
        let value = match column.kind {
            ColumnKind::Integer => Value::from(int(row, column.name)?),
            ColumnKind::Real => Value::from(real(row, column.name)?),
            ColumnKind::Text => Value::from(text(row, column.name)?),
        };
        object.insert(column.name.to_string(), value);
    }
    Ok(object)
}

// SQLiteの動的型付けに合わせ、格納型に関わらず要求型へ変換して読む

/// Integer column value, NULL as `0`.
pub fn int(row: &SqliteRow, name: &str) -> BridgeResult<i64> {
    Ok(row.try_get_unchecked::<Option<i64>, _>(name)?.unwrap_or(0))
}

/// Real column value, NULL as `0.0`.
pub fn real(row: &SqliteRow, name: &str) -> BridgeResult<f64> {
    Ok(row.try_get_unchecked::<Option<f64>, _>(name)?.unwrap_or(0.0))
}

/// Text column value, NULL as empty string.
pub fn text(row: &SqliteRow, name: &str) -> BridgeResult<String> {
    Ok(row
        .try_get_unchecked::<Option<String>, _>(name)?
        .unwrap_or_default())
}
