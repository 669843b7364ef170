//! 空き状況照会の期間指定
//!
//! `from` / `to` はエポックミリ秒。省略時は 2025-01-01T00:00:00Z から無期限。
//! 照会はこの期間の前後2日を含めたバッファ窓に対して行う。

use crate::common::error::{BridgeError, BridgeResult};
use chrono::{SecondsFormat, TimeZone, Utc};
use std::fmt;

/// Default period start: 2025-01-01T00:00:00Z
pub const DEFAULT_FROM_MS: i64 = 1_735_689_600_000;

/// Default period end: unbounded
pub const DEFAULT_TO_MS: i64 = i64::MAX;

/// Margin added on both sides of the requested period (2 days)
pub const BUFFER_MS: i64 = 2 * 24 * 60 * 60 * 1000;

/// Parse an optional epoch-millisecond query parameter.
///
/// An absent parameter yields `default`. A present value that is not an
/// integer, including the empty string, is an `InvalidParameter` error.
pub fn parse_timestamp_param(
    name: &'static str,
    raw: Option<&str>,
    default: i64,
) -> BridgeResult<i64> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| BridgeError::InvalidParameter {
                name,
                value: value.to_string(),
            }),
    }
}

/// バッファ込みの照会窓（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferWindow {
    /// 窓の開始（エポックミリ秒）
    pub start_ms: i64,
    /// 窓の終了（エポックミリ秒）
    pub end_ms: i64,
}

impl BufferWindow {
    /// `[from - 2日, to + 2日]`。i64の範囲で飽和する。
    pub fn around(from_ms: i64, to_ms: i64) -> Self {
        Self {
            start_ms: from_ms.saturating_sub(BUFFER_MS),
            end_ms: to_ms.saturating_add(BUFFER_MS),
        }
    }
}

impl fmt::Display for BufferWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", describe_ms(self.start_ms), describe_ms(self.end_ms))
    }
}

/// Human readable form of an epoch-millisecond value for logs.
pub fn describe_ms(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| format!("{}ms (out of range)", ms))
}
