//! Kaco CGI API payloads and decoded telemetry types.
//!
//! The firmware encodes decimal readings as fixed-point integers: energies
//! and voltages are scaled by 10, DC currents and the power factor by 100,
//! temperature by 10. The scale factors are fixed by the firmware, not
//! configurable. Wire structs keep every field mandatory — a payload missing
//! a field (or carrying the wrong type) fails the whole decode, there is no
//! partial result.

use crate::error::Result;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::time::Duration;

/// Response body of `getdev.cgi?device=2`.
#[derive(Debug, Deserialize)]
pub struct InverterList {
    pub inv: Vec<InverterEntry>,
}

/// One entry of the `inv` array.
#[derive(Debug, Deserialize)]
pub struct InverterEntry {
    pub isn: String,
    pub etd: f64,
    pub eto: f64,
    pub pac: f64,
}

/// Response body of `getdevdata.cgi?device=2&sn=<serial>`.
#[derive(Debug, Deserialize)]
pub struct InverterDetailsPayload {
    /// Operating hours since installation.
    pub hto: u64,
    pub pac: f64,
    pub vac: Vec<f64>,
    pub vpv: Vec<f64>,
    pub ipv: Vec<f64>,
    pub etd: f64,
    pub eto: f64,
    pub pf: f64,
    pub tmp: f64,
    pub err: i64,
    /// Device-local timestamp, `YYYYMMDDHHMMSS`.
    pub tim: String,
}

/// Headline values from the directory listing. Rebuilt every poll.
#[derive(Debug, Clone, PartialEq)]
pub struct InverterSummary {
    pub serial: String,
    pub energy_day_kwh: f64,
    pub energy_total_kwh: f64,
    pub power_ac_watts: f64,
}

impl From<InverterEntry> for InverterSummary {
    fn from(entry: InverterEntry) -> Self {
        Self {
            serial: entry.isn,
            energy_day_kwh: entry.etd / 10.0,
            energy_total_kwh: entry.eto / 10.0,
            power_ac_watts: entry.pac,
        }
    }
}

/// Full telemetry snapshot for one device at one instant.
///
/// The voltage and current vectors are ordered by array position: index 0 is
/// phase/input 1. The device reports 3 phases and up to 3 DC inputs; fewer
/// elements mean the trailing phases/inputs are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct InverterDetails {
    pub serial: String,
    pub operating_time: Duration,
    pub ac_power_watts: f64,
    pub voltage_ac_volts: Vec<f64>,
    pub voltage_dc_volts: Vec<f64>,
    pub current_dc_amps: Vec<f64>,
    pub energy_day_kwh: f64,
    pub energy_total_kwh: f64,
    pub power_factor: f64,
    pub temperature_celsius: f64,
    pub error_code: i64,
    pub time: NaiveDateTime,
}

impl InverterDetails {
    /// Decode a raw detail payload, applying the firmware scale factors.
    /// The serial comes from the request, not the payload.
    pub fn from_raw(serial: &str, raw: InverterDetailsPayload) -> Result<Self> {
        Ok(Self {
            serial: serial.to_string(),
            operating_time: Duration::from_secs(raw.hto * 3600),
            ac_power_watts: raw.pac,
            voltage_ac_volts: raw.vac.iter().map(|v| v / 10.0).collect(),
            voltage_dc_volts: raw.vpv.iter().map(|v| v / 10.0).collect(),
            current_dc_amps: raw.ipv.iter().map(|a| a / 100.0).collect(),
            energy_day_kwh: raw.etd / 10.0,
            energy_total_kwh: raw.eto / 10.0,
            power_factor: raw.pf / 100.0,
            temperature_celsius: raw.tmp / 10.0,
            error_code: raw.err,
            time: NaiveDateTime::parse_from_str(&raw.tim, "%Y%m%d%H%M%S")?,
        })
    }
}
