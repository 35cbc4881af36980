//! Wire payload decoding tests
//!
//! Verify the firmware fixed-point scale factors and the fail-on-missing
//! decode policy.

use chrono::NaiveDateTime;
use kaco_exporter::kaco::types::{
    InverterDetails, InverterDetailsPayload, InverterList, InverterSummary,
};
use serde_json::json;
use std::time::Duration;

#[test]
fn test_decode_inverter_list() {
    // Given: A directory listing as served by getdev.cgi?device=2
    let json = json!({
        "inv": [
            {"isn": "S1", "etd": 100, "eto": 5000, "pac": 230},
            {"isn": "S2", "etd": 42, "eto": 12345, "pac": 0}
        ]
    });

    // When: Decoding and applying scale factors
    let list: InverterList = serde_json::from_value(json).expect("Failed to parse listing");
    let summaries: Vec<InverterSummary> =
        list.inv.into_iter().map(InverterSummary::from).collect();

    // Then: Energies are divided by 10, power is unscaled
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].serial, "S1");
    assert_eq!(summaries[0].energy_day_kwh, 10.0);
    assert_eq!(summaries[0].energy_total_kwh, 500.0);
    assert_eq!(summaries[0].power_ac_watts, 230.0);
    assert_eq!(summaries[1].energy_total_kwh, 1234.5);
}

#[test]
fn test_decode_inverter_list_rejects_missing_array() {
    // Given: A payload without the inverter array
    let json = json!({"unexpected": []});

    // Then: The decode fails outright, no partial result
    let result: Result<InverterList, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

fn detail_payload() -> serde_json::Value {
    json!({
        "hto": 10,
        "pac": 230,
        "vac": [230, 231, 229],
        "vpv": [400, 401],
        "ipv": [5, 5],
        "etd": 100,
        "eto": 5000,
        "pf": 98,
        "tmp": 305,
        "err": 0,
        "tim": "20240101120000"
    })
}

#[test]
fn test_decode_inverter_details() {
    // Given: A full telemetry payload as served by getdevdata.cgi
    let payload: InverterDetailsPayload =
        serde_json::from_value(detail_payload()).expect("Failed to parse payload");

    // When: Decoding for device S1
    let details = InverterDetails::from_raw("S1", payload).expect("Failed to decode details");

    // Then: Every field carries its stated scale factor
    assert_eq!(details.serial, "S1");
    assert_eq!(details.operating_time, Duration::from_secs(36_000));
    assert_eq!(details.ac_power_watts, 230.0);
    assert_eq!(details.voltage_ac_volts, vec![23.0, 23.1, 22.9]);
    assert_eq!(details.voltage_dc_volts, vec![40.0, 40.1]);
    assert_eq!(details.current_dc_amps, vec![0.05, 0.05]);
    assert_eq!(details.energy_day_kwh, 10.0);
    assert_eq!(details.energy_total_kwh, 500.0);
    assert_eq!(details.power_factor, 0.98);
    assert_eq!(details.temperature_celsius, 30.5);
    assert_eq!(details.error_code, 0);
    assert_eq!(
        details.time,
        NaiveDateTime::parse_from_str("20240101120000", "%Y%m%d%H%M%S").unwrap()
    );
}

#[test]
fn test_decode_rejects_missing_field() {
    // Given: A payload missing the temperature field
    let mut json = detail_payload();
    json.as_object_mut().unwrap().remove("tmp");

    // Then: The decode fails, there is no degraded result
    let result: Result<InverterDetailsPayload, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

#[test]
fn test_decode_rejects_wrong_type() {
    // Given: A payload with a string where a number is expected
    let mut json = detail_payload();
    json["pac"] = json!("230");

    let result: Result<InverterDetailsPayload, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

#[test]
fn test_decode_rejects_malformed_timestamp() {
    // Given: A timestamp that does not match YYYYMMDDHHMMSS
    let mut json = detail_payload();
    json["tim"] = json!("2024-01-01 12:00");
    let payload: InverterDetailsPayload = serde_json::from_value(json).unwrap();

    let result = InverterDetails::from_raw("S1", payload);
    assert!(result.is_err());
}

#[test]
fn test_decode_accepts_empty_arrays() {
    // Given: A device reporting no phases or inputs at all
    let mut json = detail_payload();
    json["vac"] = json!([]);
    json["vpv"] = json!([]);
    json["ipv"] = json!([]);
    let payload: InverterDetailsPayload = serde_json::from_value(json).unwrap();

    // Then: The decode succeeds with empty sequences
    let details = InverterDetails::from_raw("S1", payload).expect("Failed to decode");
    assert!(details.voltage_ac_volts.is_empty());
    assert!(details.voltage_dc_volts.is_empty());
    assert!(details.current_dc_amps.is_empty());
}
