//! HTTP client for the Kaco NX3 local status API.
//!
//! The inverter (or its data logger) serves plain HTTP on port 8484 with two
//! CGI endpoints: `getdev.cgi?device=2` enumerates the inverters behind the
//! host, `getdevdata.cgi?device=2&sn=<serial>` returns full telemetry for
//! one of them. No authentication, no TLS — this is a trusted-LAN device.
//!
//! There is no retry at this layer; transport errors, non-2xx statuses and
//! decode failures all propagate. The poll interval is the retry mechanism.

use crate::config::KacoConfig;
use crate::error::{ExporterError, Result};
use crate::kaco::types::{InverterDetails, InverterList, InverterSummary};
use std::time::Duration;
use tracing::debug;

/// Client for the device CGI endpoints.
///
/// Carries a bounded total-request timeout so a slow or unreachable device
/// cannot stall a poll cycle indefinitely.
pub struct KacoClient {
    http: reqwest::Client,
    base_url: String,
}

impl KacoClient {
    pub fn new(config: &KacoConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: format!("http://{}:{}", config.host, config.port),
        })
    }

    /// GET a relative path+query and decode the JSON body.
    async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExporterError::Status {
                status,
                path: path.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Raw API passthrough for the `call` subcommand.
    pub async fn call_raw(&self, path: &str) -> Result<serde_json::Value> {
        self.get(path).await
    }

    /// Enumerate the inverters reachable behind this host.
    pub async fn list_inverters(&self) -> Result<Vec<InverterSummary>> {
        let list: InverterList = self.get("getdev.cgi?device=2").await?;
        debug!("found {} inverters", list.inv.len());
        Ok(list.inv.into_iter().map(InverterSummary::from).collect())
    }

    /// Fetch full telemetry for one device by serial number.
    pub async fn inverter_details(&self, serial: &str) -> Result<InverterDetails> {
        let payload = self
            .get(&format!("getdevdata.cgi?device=2&sn={serial}"))
            .await?;
        InverterDetails::from_raw(serial, payload)
    }
}
