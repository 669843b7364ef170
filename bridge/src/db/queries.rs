//! FireSnowスキーマに対する固定クエリ
//!
//! 一覧系エンドポイントはSQLと列定義の組を `fetch_projected` に渡すだけ。
//! 空き状況照会のみ、終了時刻の算出と名称のフォールバックを後処理で行う。

use super::connector::DbHandle;
use super::projection::{fetch_projected, fetch_rows, int, text, Column, JsonRow};
use crate::common::error::BridgeResult;
use crate::period::BufferWindow;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use tracing::debug;

/// Reservations whose end lies in the future, earliest first.
pub const ACTIVE_RESERVATIONS_SQL: &str = "\
SELECT
  rp.ID AS rezerwacja_id,
  p.NAME AS nazwa_sprzetu,
  ae.CODE AS kod_sprzetu,
  rp.BEGINDATE AS data_od,
  rp.ENDDATE AS data_do,
  rp.PRICE AS cena,
  rp.RENTOBJECT_ID AS obiekt_id,
  rp.CUSTOMER_ID AS klient_id,
  rc.FORENAME AS imie,
  rc.SURNAME AS nazwisko,
  rc.PHONE1 AS telefon
FROM RESERVATIONPOSITION rp
JOIN ABSTRACTPOSITION p ON p.ID = rp.ID
LEFT JOIN ABSTRACTENTITYCM ae ON ae.ID = rp.RENTOBJECT_ID
LEFT JOIN RENT_CUSTOMERS rc ON rc.ID = rp.CUSTOMER_ID
WHERE rp.ENDDATE > CURRENT_TIMESTAMP
ORDER BY rp.BEGINDATE";

/// Output columns of [`ACTIVE_RESERVATIONS_SQL`].
pub const ACTIVE_RESERVATION_COLUMNS: &[Column] = &[
    Column::int("rezerwacja_id"),
    Column::text("nazwa_sprzetu"),
    Column::text("kod_sprzetu"),
    Column::text("data_od"),
    Column::text("data_do"),
    Column::real("cena"),
    Column::int("obiekt_id"),
    Column::int("klient_id"),
    Column::text("imie"),
    Column::text("nazwisko"),
    Column::text("telefon"),
];

const RENTALS_SELECT: &str = "\
SELECT
  si.ID AS session_id,
  si.STARTTIME AS data_od,
  si.STOPTIME AS data_do,
  si.REMAININGTIME AS pozostaly_czas,
  si.PRICE AS cena,
  si.PAYMENT AS zaplacono,
  si.RENTOBJECT_ID AS obiekt_id,
  si.CUSTOMER_ID AS klient_id,
  si.RENTDOCUMENT_ID AS dokument_id,
  ae_customer.NAME AS klient_nazwa,
  ae_equipment.NAME AS nazwa_sprzetu,
  ae_equipment.CODE AS kod_sprzetu,
  doc.NUMBER AS numer_dokumentu
FROM SESSIONINFOFGHJ si
LEFT JOIN ABSTRACTENTITYCM ae_customer ON ae_customer.ID = si.CUSTOMER_ID
LEFT JOIN ABSTRACTENTITYCM ae_equipment ON ae_equipment.ID = si.RENTOBJECT_ID
LEFT JOIN ABSTRACTDOCUMENT doc ON doc.ID = si.RENTDOCUMENT_ID";

/// Output columns of the rental listings.
pub const RENTAL_COLUMNS: &[Column] = &[
    Column::int("session_id"),
    Column::text("nazwa_sprzetu"),
    Column::text("kod_sprzetu"),
    Column::int("data_od"),
    Column::int("data_do"),
    Column::int("pozostaly_czas"),
    Column::real("cena"),
    Column::real("zaplacono"),
    Column::int("obiekt_id"),
    Column::int("klient_id"),
    Column::int("dokument_id"),
    Column::text("klient_nazwa"),
    Column::text("numer_dokumentu"),
];

/// Equipment with at least one reservation ending in the future.
pub const RESERVED_SKIS_SQL: &str = "\
SELECT DISTINCT
  ro.ID AS obiekt_id,
  p.NAME AS nazwa,
  p.CODE AS kod
FROM RENTOBJECTS ro
JOIN ABSTRACTPOSITION p ON p.ID = ro.ID
WHERE ro.ID IN (
  SELECT RENTOBJECT_ID FROM RESERVATIONPOSITION WHERE ENDDATE > CURRENT_TIMESTAMP
)
ORDER BY p.NAME";

/// Output columns of [`RESERVED_SKIS_SQL`].
pub const RESERVED_SKI_COLUMNS: &[Column] = &[
    Column::int("obiekt_id"),
    Column::text("nazwa"),
    Column::text("kod"),
];

// 窓との重なり判定: 開始 <= 窓終了 かつ 終了 >= 窓開始（バインド順: 窓終了, 窓開始）
const AVAILABILITY_RESERVATIONS_SQL: &str = "\
SELECT
  rp.ID AS id,
  rp.RENTOBJECT_ID AS obiekt_id,
  p.NAME AS position_name,
  p.CODE AS position_code,
  ae.NAME AS entity_name,
  ae.CODE AS entity_code,
  rc.FORENAME AS forename,
  rc.SURNAME AS surname,
  ae_customer.NAME AS customer_name,
  rp.BEGINDATE AS begin_date,
  rp.ENDDATE AS end_date
FROM RESERVATIONPOSITION rp
LEFT JOIN ABSTRACTPOSITION p ON p.ID = rp.ID
LEFT JOIN ABSTRACTENTITYCM ae ON ae.ID = rp.RENTOBJECT_ID
LEFT JOIN RENT_CUSTOMERS rc ON rc.ID = rp.CUSTOMER_ID
LEFT JOIN ABSTRACTENTITYCM ae_customer ON ae_customer.ID = rp.CUSTOMER_ID
WHERE rp.ENDDATE > CURRENT_TIMESTAMP
  AND CAST(strftime('%s', rp.BEGINDATE) AS INTEGER) * 1000 <= ?
  AND CAST(strftime('%s', rp.ENDDATE) AS INTEGER) * 1000 >= ?
ORDER BY rp.BEGINDATE";

const AVAILABILITY_RENTALS_SQL: &str = "\
SELECT
  si.ID AS id,
  si.RENTOBJECT_ID AS obiekt_id,
  p.NAME AS position_name,
  p.CODE AS position_code,
  ae_equipment.NAME AS entity_name,
  ae_equipment.CODE AS entity_code,
  rc.FORENAME AS forename,
  rc.SURNAME AS surname,
  ae_customer.NAME AS customer_name,
  si.STARTTIME AS start_time,
  si.STOPTIME AS stop_time,
  si.REMAININGTIME AS remaining_time
FROM SESSIONINFOFGHJ si
LEFT JOIN ABSTRACTPOSITION p ON p.ID = si.RENTOBJECT_ID
LEFT JOIN ABSTRACTENTITYCM ae_equipment ON ae_equipment.ID = si.RENTOBJECT_ID
LEFT JOIN RENT_CUSTOMERS rc ON rc.ID = si.CUSTOMER_ID
LEFT JOIN ABSTRACTENTITYCM ae_customer ON ae_customer.ID = si.CUSTOMER_ID
WHERE si.STOPTIME = 0
  AND si.STARTTIME <= ?
  AND (COALESCE(si.REMAININGTIME, 0) = 0 OR si.STARTTIME + si.REMAININGTIME >= ?)
ORDER BY si.STARTTIME DESC";

/// 接続が応答するか確認する
pub async fn ping(handle: &DbHandle) -> BridgeResult<()> {
    sqlx::query("SELECT 1").execute(handle.pool()).await?;
    Ok(())
}

/// アクティブな予約一覧
pub async fn active_reservations(handle: &DbHandle) -> BridgeResult<Vec<JsonRow>> {
    fetch_projected(handle, ACTIVE_RESERVATIONS_SQL, &[], ACTIVE_RESERVATION_COLUMNS).await
}

/// 貸出中（未返却）の一覧。開始が新しい順
pub async fn current_rentals(handle: &DbHandle) -> BridgeResult<Vec<JsonRow>> {
    let sql = format!("{RENTALS_SELECT}\nWHERE si.STOPTIME = 0\nORDER BY si.STARTTIME DESC");
    fetch_projected(handle, &sql, &[], RENTAL_COLUMNS).await
}

/// 返却済みの一覧。返却が新しい順
pub async fn past_rentals(handle: &DbHandle) -> BridgeResult<Vec<JsonRow>> {
    let sql = format!("{RENTALS_SELECT}\nWHERE si.STOPTIME != 0\nORDER BY si.STOPTIME DESC");
    fetch_projected(handle, &sql, &[], RENTAL_COLUMNS).await
}

/// 予約済みの用具一覧
pub async fn reserved_skis(handle: &DbHandle) -> BridgeResult<Vec<JsonRow>> {
    fetch_projected(handle, RESERVED_SKIS_SQL, &[], RESERVED_SKI_COLUMNS).await
}

/// Point in time as the source stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Moment {
    /// reservation timestamp text (`YYYY-MM-DD HH:MM:SS`)
    Timestamp(String),
    /// rental time in epoch milliseconds
    EpochMs(i64),
}

/// 空き状況の1件（予約または貸出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityEntry {
    /// 予約ID / セッションID
    pub id: i64,
    /// 用具ID
    pub obiekt_id: i64,
    /// 用具コード
    pub kod: String,
    /// 用具名
    pub sprzet: String,
    /// 顧客名
    pub klient: String,
    /// 開始
    pub od: Moment,
    /// 終了
    #[serde(rename = "do")]
    pub until: Moment,
}

/// 空き状況照会の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Availability {
    /// 窓と重なるアクティブな予約
    pub reservations: Vec<AvailabilityEntry>,
    /// 窓と重なる貸出中のセッション
    pub rentals: Vec<AvailabilityEntry>,
}

/// 指定窓と重なる予約と貸出中セッションを返す
pub async fn availability(handle: &DbHandle, window: &BufferWindow) -> BridgeResult<Availability> {
    let binds = [window.end_ms, window.start_ms];

    let reservations = fetch_rows(handle, AVAILABILITY_RESERVATIONS_SQL, &binds)
        .await?
        .iter()
        .map(|row| {
            Ok(AvailabilityEntry {
                od: Moment::Timestamp(text(row, "begin_date")?),
                until: Moment::Timestamp(text(row, "end_date")?),
                ..describe_entry(row)?
            })
        })
        .collect::<BridgeResult<Vec<_>>>()?;

    let rentals = fetch_rows(handle, AVAILABILITY_RENTALS_SQL, &binds)
        .await?
        .iter()
        .map(|row| {
            let start = int(row, "start_time")?;
            let end = computed_end_time(start, int(row, "stop_time")?, int(row, "remaining_time")?);
            Ok(AvailabilityEntry {
                od: Moment::EpochMs(start),
                until: Moment::EpochMs(end),
                ..describe_entry(row)?
            })
        })
        .collect::<BridgeResult<Vec<_>>>()?;

    debug!(
        reservations = reservations.len(),
        rentals = rentals.len(),
        "Availability query finished"
    );
    Ok(Availability {
        reservations,
        rentals,
    })
}

// 時刻以外の共通項目。od/do は呼び出し側で上書きする
fn describe_entry(row: &SqliteRow) -> BridgeResult<AvailabilityEntry> {
    let customer = full_name(&text(row, "forename")?, &text(row, "surname")?);
    Ok(AvailabilityEntry {
        id: int(row, "id")?,
        obiekt_id: int(row, "obiekt_id")?,
        kod: first_non_empty(&[&text(row, "entity_code")?, &text(row, "position_code")?]),
        sprzet: first_non_empty(&[&text(row, "position_name")?, &text(row, "entity_name")?]),
        klient: first_non_empty(&[&customer, &text(row, "customer_name")?]),
        od: Moment::EpochMs(0),
        until: Moment::EpochMs(0),
    })
}

/// End time of a rental session.
///
/// An open session (`stop == 0`) with a remaining duration ends at
/// `start + remaining`; otherwise the stored stop time is used.
pub fn computed_end_time(start: i64, stop: i64, remaining: i64) -> i64 {
    if stop == 0 && remaining != 0 {
        start.saturating_add(remaining)
    } else {
        stop
    }
}

/// `"forename surname"` with surrounding whitespace removed.
pub fn full_name(forename: &str, surname: &str) -> String {
    format!("{} {}", forename.trim(), surname.trim())
        .trim()
        .to_string()
}

/// First candidate that is not blank, or an empty string.
pub fn first_non_empty(candidates: &[&str]) -> String {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or_default()
        .to_string()
}
