//! Integration tests for moneta-core
//!
//! These tests drive the value types the way collaborators do: through the
//! crate root, the JSON wire contract, and settings-backed contexts.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::fs;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::TempDir;

use moneta_core::config::Config;
use moneta_core::{
    Currency, ErrorKind, Layout, MonetaContext, Money, OperationResult, Time, Timezone,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn usd() -> Currency {
    Currency::new("USD", "$", "US Dollar", 2).unwrap()
}

fn write_settings(dir: &TempDir, settings: serde_json::Value) {
    fs::write(
        dir.path().join("settings.json"),
        serde_json::to_string_pretty(&settings).unwrap(),
    )
    .unwrap();
}

/// A typical order line as an upstream service would persist it
#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct OrderLine {
    sku: String,
    unit_price: Money,
    quantity: i64,
    placed_at: Time,
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_format_scenarios() {
    let jpy = Currency::new("JPY", "¥", "Japanese Yen", 0).unwrap();
    let btc = Currency::new("BTC", "₿", "Bitcoin", 8).unwrap();

    assert_eq!(Money::from_integer(10050, usd()).unwrap().format(), "$100.50");
    assert_eq!(Money::from_integer(1000, jpy).unwrap().format(), "¥1000");
    assert_eq!(Money::from_integer(100_000_000, btc).unwrap().format(), "₿1.00000000");
    assert_eq!(
        Time::new(1_640_995_200).unwrap().format_utc(Layout::Rfc3339).unwrap(),
        "2022-01-01T00:00:00Z"
    );
}

#[test]
fn test_add_scenario_and_mismatch() {
    let eur = Currency::new("EUR", "€", "Euro", 2).unwrap();
    let total = Money::from_integer(10050, usd())
        .unwrap()
        .add(&Money::from_integer(2500, usd()).unwrap())
        .unwrap();
    assert_eq!(total.amount(), 12550);

    let err = Money::from_integer(10050, usd())
        .unwrap()
        .add(&Money::from_integer(2500, eur).unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Mismatch);
}

#[test]
fn test_order_line_round_trips_through_json() {
    let line = OrderLine {
        sku: "SKU-1".to_string(),
        unit_price: Money::from_integer(1999, Currency::from_code("USD").unwrap()).unwrap(),
        quantity: 3,
        placed_at: Time::new(1_640_995_200).unwrap(),
    };

    let value = serde_json::to_value(&line).unwrap();
    assert_eq!(value["placed_at"], json!(1_640_995_200));
    assert_eq!(value["unit_price"]["amount"], json!(1999));
    assert_eq!(value["unit_price"]["decimal"], json!(19.99));
    assert_eq!(value["unit_price"]["currency"]["decimal_places"], json!(2));

    let decoded: OrderLine = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, line);
    assert_eq!(
        decoded.unit_price.multiply(decoded.quantity).unwrap().format(),
        "$59.97"
    );
}

#[test]
fn test_legacy_order_line_is_normalized() {
    // historical rows stored decimal amounts and quoted epochs
    let legacy = json!({
        "sku": "SKU-2",
        "unit_price": {
            "amount": 19.99,
            "currency": {"code": "USD", "symbol": "$", "name": "US Dollar", "decimal_places": 2}
        },
        "quantity": 1,
        "placed_at": "1640995200"
    });

    let decoded: OrderLine = serde_json::from_value(legacy).unwrap();
    assert_eq!(decoded.unit_price.amount(), 1999);
    assert_eq!(decoded.placed_at.epoch(), 1_640_995_200);

    // re-encoding emits the modern shape
    let modern = serde_json::to_value(&decoded).unwrap();
    assert_eq!(modern["unit_price"]["amount"], json!(1999));
    assert_eq!(modern["placed_at"], json!(1_640_995_200));
}

#[test]
fn test_bad_epoch_in_payload_rejects_whole_record() {
    let payload = json!({
        "sku": "SKU-3",
        "unit_price": {"amount": 100, "currency": "USD"},
        "quantity": 1,
        "placed_at": "soon"
    });
    assert!(serde_json::from_value::<OrderLine>(payload).is_err());
}

#[test]
fn test_operation_result_for_delivery_layer() {
    let ok: OperationResult<Money> = Money::from_integer(500, usd()).into();
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["data"]["amount"], json!(500));

    let failed: OperationResult<Money> = Currency::from_code("XYZ")
        .and_then(|currency| Money::from_integer(500, currency))
        .into();
    assert!(!failed.success);
    assert_eq!(failed.kind, Some(ErrorKind::Lookup));
    assert!(failed.kind.unwrap().is_client_error());
}

#[test]
fn test_scheduling_across_dst_in_zone() {
    let berlin = Timezone::from_id("Europe/Berlin").unwrap();
    // 2024-03-30T12:00:00Z, the day before clocks move forward
    let start = Time::parse_rfc3339("2024-03-30T12:00:00Z").unwrap();
    let next_day = start.add(Duration::days(1)).unwrap();

    assert_eq!(start.format("%H:%M %Z", Some(&berlin)).unwrap(), "13:00 CET");
    assert_eq!(next_day.format("%H:%M %Z", Some(&berlin)).unwrap(), "14:00 CEST");
    assert_eq!(next_day.sub(&start), Duration::hours(24));
}

// ============================================================================
// Settings-backed Context Tests
// ============================================================================

#[test]
fn test_context_with_custom_currency_and_zone() {
    let dir = TempDir::new().unwrap();
    write_settings(
        &dir,
        json!({
            "money": {
                "currencies": [
                    {"code": "PTS", "symbol": "pts ", "name": "Loyalty Points", "decimalPlaces": 0}
                ]
            },
            "time": {"defaultTimezone": "Asia/Tokyo", "layout": "%Y-%m-%d %H:%M"}
        }),
    );

    let ctx = MonetaContext::new(dir.path()).unwrap();
    assert_eq!(ctx.money(250, "PTS").unwrap().format(), "pts 250");
    assert_eq!(ctx.money(10050, "usd").unwrap().format(), "$100.50");
    assert_eq!(ctx.currency("XYZ").unwrap_err().kind(), ErrorKind::Lookup);

    let time = Time::new(1_640_995_200).unwrap();
    assert_eq!(ctx.format_time(&time).unwrap(), "2022-01-01 09:00");
}

#[test]
fn test_context_defaults_to_utc_rfc3339() {
    let dir = TempDir::new().unwrap();
    let ctx = MonetaContext::new(dir.path()).unwrap();
    let time = Time::new(1_640_995_200).unwrap();
    assert_eq!(ctx.format_time(&time).unwrap(), "2022-01-01T00:00:00Z");
    assert_eq!(ctx.registry.len(), moneta_core::CurrencyRegistry::canonical().len());
}

#[test]
fn test_context_rejects_invalid_settings_currency() {
    let dir = TempDir::new().unwrap();
    write_settings(
        &dir,
        json!({
            "money": {
                "currencies": [
                    {"code": "PT", "symbol": "p", "name": "Points", "decimalPlaces": 0}
                ]
            }
        }),
    );
    let err = MonetaContext::new(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("currency code must be exactly 3 characters"));
}

#[test]
fn test_unparsable_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let config = Config::load(dir.path()).unwrap();
    assert!(config.currencies.is_empty());
}

#[test]
fn test_save_preserves_unmanaged_settings() {
    let dir = TempDir::new().unwrap();
    write_settings(
        &dir,
        json!({
            "app": {"theme": "dark"},
            "time": {"layout": "%d/%m/%Y", "weekStart": "monday"}
        }),
    );

    let mut config = Config::load(dir.path()).unwrap();
    config.add_currency(&Currency::new("PTS", "pts ", "Loyalty Points", 0).unwrap());
    config.save(dir.path()).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("settings.json")).unwrap())
            .unwrap();
    assert_eq!(saved["app"]["theme"], json!("dark"));
    assert_eq!(saved["time"]["weekStart"], json!("monday"));
    assert_eq!(saved["time"]["layout"], json!("%d/%m/%Y"));
    assert_eq!(saved["money"]["currencies"][0]["code"], json!("PTS"));
    assert_eq!(saved["money"]["currencies"][0]["decimalPlaces"], json!(0));

    let reloaded = Config::load(dir.path()).unwrap();
    assert_eq!(reloaded.registry().unwrap().decimal_places("PTS"), Some(0));
}
