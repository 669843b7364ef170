//! Contract Test: /api/dostepnosc/okres

use crate::support::TestBridge;
use axum::http::StatusCode;
use serde_json::json;

const FIXTURE: &[&str] = &[
    "INSERT INTO ABSTRACTENTITYCM (ID, NAME, CODE) VALUES (10, 'Rossignol Hero 170', 'N-010')",
    "INSERT INTO ABSTRACTENTITYCM (ID, NAME, CODE) VALUES (11, 'Atomic Redster 165', NULL)",
    "INSERT INTO ABSTRACTENTITYCM (ID, NAME, CODE) VALUES (501, 'Firma Narciarz Sp. z o.o.', NULL)",
    "INSERT INTO ABSTRACTPOSITION (ID, NAME, CODE) VALUES (11, 'Redster (pozycja)', 'P-011')",
    "INSERT INTO RENT_CUSTOMERS (ID, FORENAME, SURNAME, PHONE1) VALUES (500, 'Anna', 'Nowak', NULL)",
    "INSERT INTO RESERVATIONPOSITION VALUES (1, '2999-02-01 08:00:00', '2999-02-03 18:00:00', 99.9, 10, 500)",
    "INSERT INTO RESERVATIONPOSITION VALUES (2, '2001-02-01 08:00:00', '2001-02-03 18:00:00', 99.9, 10, 500)",
    "INSERT INTO SESSIONINFOFGHJ VALUES (1, 1000, 0, 5000, 10.0, 0.0, 11, 501, NULL)",
    "INSERT INTO SESSIONINFOFGHJ VALUES (2, 1736000000000, 0, 0, 10.0, 0.0, 10, 500, NULL)",
];

#[tokio::test]
async fn test_availability_defaults_cover_2025_onwards() {
    let bridge = TestBridge::seeded(FIXTURE).await;

    let (status, body) = bridge.get_json("/api/dostepnosc/okres").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "reservations": [{
                "id": 1,
                "obiekt_id": 10,
                "kod": "N-010",
                "sprzet": "Rossignol Hero 170",
                "klient": "Anna Nowak",
                "od": "2999-02-01 08:00:00",
                "do": "2999-02-03 18:00:00"
            }],
            "rentals": [{
                "id": 2,
                "obiekt_id": 10,
                "kod": "N-010",
                "sprzet": "Rossignol Hero 170",
                "klient": "Anna Nowak",
                "od": 1736000000000i64,
                "do": 0
            }]
        })
    );
}

#[tokio::test]
async fn test_availability_computes_rental_end_and_fallbacks() {
    let bridge = TestBridge::seeded(FIXTURE).await;

    let (status, body) = bridge.get_json("/api/dostepnosc/okres?from=0&to=10000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["rentals"],
        json!([{
            "id": 1,
            "obiekt_id": 11,
            "kod": "P-011",
            "sprzet": "Redster (pozycja)",
            "klient": "Firma Narciarz Sp. z o.o.",
            "od": 1000,
            "do": 6000
        }])
    );
    // 2999年の予約は窓の外
    assert_eq!(body["reservations"], json!([]));
}

#[tokio::test]
async fn test_availability_rejects_malformed_from() {
    let bridge = TestBridge::seeded(FIXTURE).await;

    let (status, body) = bridge.get_json("/api/dostepnosc/okres?from=yesterday").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Invalid value for parameter 'from': \"yesterday\""})
    );
}

#[tokio::test]
async fn test_availability_rejects_empty_to() {
    let bridge = TestBridge::seeded(FIXTURE).await;

    let (status, body) = bridge.get_json("/api/dostepnosc/okres?to=").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("'to'"));
}
