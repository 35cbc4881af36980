//! Metric model and Prometheus registry.
//!
//! The exported surface is a fixed eight-entry table of gauge specs. Three
//! of the physical quantities fan out into multiple labeled series sharing
//! one metric name: per-phase AC voltage and per-input DC voltage/current
//! each get one spec per index, carrying the label name (`phase` / `input`)
//! and a 1-based index.
//!
//! Series are created lazily on first use and reused across polls; the
//! label tuple for a given device/index never changes, so the series set
//! stays bounded. `InverterMetrics` additionally remembers, per device,
//! every series it has ever bound. When a fetch for a device fails, all of
//! those series are set to NaN rather than left at their last reading, so a
//! scrape never presents a stale value as current.

use crate::error::Result;
use crate::kaco::types::InverterDetails;
use crate::kaco::InverterProvider;
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::iter::once;

/// Label name carrying the device display name.
pub const DEVICE_NAME_LABEL: &str = "name";
/// Label name carrying the device serial number.
pub const SERIAL_LABEL: &str = "serial";

/// Qualifier for one index of a multi-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiValueSpec {
    pub label: &'static str,
    pub index: u32,
}

/// Static descriptor of one exported gauge series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub multi: Option<MultiValueSpec>,
}

impl MetricSpec {
    const fn scalar(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            multi: None,
        }
    }

    const fn multi(
        name: &'static str,
        description: &'static str,
        label: &'static str,
        index: u32,
    ) -> Self {
        Self {
            name,
            description,
            multi: Some(MultiValueSpec { label, index }),
        }
    }
}

pub static OPERATING_TIME: MetricSpec = MetricSpec::scalar(
    "operating_time_seconds",
    "time since restart (or installation?)",
);

pub static AC_POWER: MetricSpec =
    MetricSpec::scalar("AC_power_total", "Current AC power (in Watts)");

pub static DC_CURRENT: [MetricSpec; 3] = [
    MetricSpec::multi("DC_current", "DC current (in Amperes) per input", "input", 1),
    MetricSpec::multi("DC_current", "DC current (in Amperes) per input", "input", 2),
    MetricSpec::multi("DC_current", "DC current (in Amperes) per input", "input", 3),
];

pub static DC_VOLTAGE: [MetricSpec; 3] = [
    MetricSpec::multi("DC_voltage", "DC voltage (in Volts) per input", "input", 1),
    MetricSpec::multi("DC_voltage", "DC voltage (in Volts) per input", "input", 2),
    MetricSpec::multi("DC_voltage", "DC voltage (in Volts) per input", "input", 3),
];

pub static AC_VOLTAGE: [MetricSpec; 3] = [
    MetricSpec::multi("AC_voltage", "AC voltage (in Volts) per phase", "phase", 1),
    MetricSpec::multi("AC_voltage", "AC voltage (in Volts) per phase", "phase", 2),
    MetricSpec::multi("AC_voltage", "AC voltage (in Volts) per phase", "phase", 3),
];

pub static AC_ENERGY_TOTAL: MetricSpec = MetricSpec::scalar(
    "AC_energy_total",
    "total AC energy since installation (in kWh)",
);

pub static TEMPERATURE: MetricSpec =
    MetricSpec::scalar("temperature", "device temperature (in \u{b0}C)");

pub static POWER_FACTOR: MetricSpec = MetricSpec::scalar("power_factor", "power factor");

/// Pair one telemetry snapshot with the spec table, in fixed declared order.
///
/// Multi-valued fields zip positionally with their arrays (array index 0 is
/// spec index 1); an array shorter than 3 yields only that many pairs for
/// its field.
pub fn metric_values(
    details: &InverterDetails,
) -> impl Iterator<Item = (&'static MetricSpec, f64)> + '_ {
    once((&OPERATING_TIME, details.operating_time.as_secs_f64()))
        .chain(once((&AC_POWER, details.ac_power_watts)))
        .chain(DC_CURRENT.iter().zip(details.current_dc_amps.iter().copied()))
        .chain(DC_VOLTAGE.iter().zip(details.voltage_dc_volts.iter().copied()))
        .chain(AC_VOLTAGE.iter().zip(details.voltage_ac_volts.iter().copied()))
        .chain(once((&AC_ENERGY_TOTAL, details.energy_total_kwh)))
        .chain(once((&TEMPERATURE, details.temperature_celsius)))
        .chain(once((&POWER_FACTOR, details.power_factor)))
}

/// A bound series within one device's set: metric name plus the multi index
/// when present. Stable across polls.
type SeriesKey = (&'static str, Option<u32>);

/// Lazily-built metric registry and per-device series cache.
pub struct InverterMetrics {
    registry: Registry,
    metrics: HashMap<&'static str, GaugeVec>,
    device_series: HashMap<String, HashMap<SeriesKey, Gauge>>,
}

impl InverterMetrics {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            metrics: HashMap::new(),
            device_series: HashMap::new(),
        }
    }

    /// Shared handle to the underlying registry, for the exposition server.
    pub fn registry(&self) -> Registry {
        self.registry.clone()
    }

    /// Look up or lazily create the series for `spec` bound to this device.
    ///
    /// The GaugeVec for `spec.name` is created and registered once; every
    /// spec sharing a name carries the same label set, so the first caller
    /// fixes the shape for all of them. The bound gauge is recorded in the
    /// device's series set so a later fetch failure can blank it.
    pub fn get_metric(
        &mut self,
        spec: &'static MetricSpec,
        device_name: &str,
        serial: &str,
    ) -> Result<Gauge> {
        let vec = match self.metrics.entry(spec.name) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut label_names = vec![DEVICE_NAME_LABEL, SERIAL_LABEL];
                if let Some(multi) = &spec.multi {
                    label_names.push(multi.label);
                }
                let vec = GaugeVec::new(Opts::new(spec.name, spec.description), &label_names)?;
                self.registry.register(Box::new(vec.clone()))?;
                entry.insert(vec)
            }
        };

        let index;
        let mut labels = vec![device_name, serial];
        if let Some(multi) = &spec.multi {
            index = multi.index.to_string();
            labels.push(&index);
        }
        let gauge = vec.with_label_values(&labels);

        self.device_series
            .entry(serial.to_string())
            .or_default()
            .insert((spec.name, spec.multi.map(|m| m.index)), gauge.clone());
        Ok(gauge)
    }

    /// Fetch current telemetry from one provider and push it into the
    /// registry.
    ///
    /// On fetch failure every series ever bound for this device is set to
    /// NaN and the error is re-raised; a monitoring consumer must not read
    /// the previous poll's values as current. Series of other devices are
    /// untouched.
    pub async fn update_inverter<P: InverterProvider>(&mut self, provider: &P) -> Result<()> {
        let details = match provider.details().await {
            Ok(details) => details,
            Err(e) => {
                if let Some(series) = self.device_series.get(provider.serial()) {
                    for gauge in series.values() {
                        gauge.set(f64::NAN);
                    }
                }
                return Err(e);
            }
        };

        for (spec, value) in metric_values(&details) {
            self.get_metric(spec, provider.name(), provider.serial())?
                .set(value);
        }
        Ok(())
    }

    /// One poll cycle: update every provider in order. The first failing
    /// device aborts the remainder of the cycle; the next cycle starts
    /// fresh over all devices.
    pub async fn poll<P: InverterProvider>(&mut self, providers: &[P]) -> Result<()> {
        for provider in providers {
            self.update_inverter(provider).await?;
        }
        Ok(())
    }

    /// Render the registry in Prometheus text format.
    pub fn render(&self) -> Result<String> {
        render_registry(&self.registry)
    }
}

impl Default for InverterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_registry(registry: &Registry) -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
