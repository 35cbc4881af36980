//! Data-source seam between the poll loop and the device API.
//!
//! The updater only needs "give me the current telemetry for one named
//! device"; tests substitute fake providers behind the same trait.

use crate::error::Result;
use crate::kaco::types::InverterDetails;
use crate::kaco::KacoClient;
use std::future::Future;
use std::sync::Arc;

/// A source of telemetry for one inverter.
pub trait InverterProvider {
    /// Fetch the current telemetry snapshot. This is the poll loop's
    /// failure boundary: any error here marks the device's series stale.
    fn details(&self) -> impl Future<Output = Result<InverterDetails>> + Send;

    /// Stable display name for the device (the `name` label).
    fn name(&self) -> &str;

    /// Device serial number (the `serial` label).
    fn serial(&self) -> &str;
}

/// Live provider backed by the Kaco CGI API.
pub struct KacoInverterProvider {
    client: Arc<KacoClient>,
    serial: String,
    name: String,
}

impl KacoInverterProvider {
    pub fn new(client: Arc<KacoClient>, host: &str, serial: String) -> Self {
        Self {
            client,
            serial,
            name: display_name(host).to_string(),
        }
    }
}

impl InverterProvider for KacoInverterProvider {
    async fn details(&self) -> Result<InverterDetails> {
        self.client.inverter_details(&self.serial).await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn serial(&self) -> &str {
        &self.serial
    }
}

/// Display name for a device host: the first dot-separated component, so
/// `kaco.fritz.box` becomes `kaco`.
pub fn display_name(host: &str) -> &str {
    host.split('.').next().unwrap_or(host)
}
