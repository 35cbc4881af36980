//! Kaco NX3 Prometheus Exporter
//!
//! Polls the local HTTP status API of Kaco NX3 solar inverters and exposes
//! the readings as Prometheus gauges.
//!
//! # Overview
//!
//! The inverter (reachable on the LAN, port 8484) serves two CGI endpoints:
//! a directory listing enumerating the devices behind a host, and a
//! per-serial telemetry snapshot. The exporter polls every discovered
//! device on a fixed interval, maps the nested fixed-point payload onto a
//! flat table of labeled gauge series, and serves them for scraping.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   HTTP GET (CGI)   ┌───────────────┐
//! │ Inverter │ ◄────────────────► │   Exporter    │
//! └──────────┘     JSON           │  ┌─────────┐  │    HTTP     ┌────────────┐
//!                                 │  │ Client  │  │ ◄─────────► │ Prometheus │
//!                                 │  └─────────┘  │  /metrics   └────────────┘
//!                                 │  ┌─────────┐  │
//!                                 │  │ Metrics │  │
//!                                 │  └─────────┘  │
//!                                 └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`kaco`] - device HTTP client, wire payloads and telemetry types
//! - [`metrics`] - metric spec table and the lazy registry/updater
//! - [`server`] - exposition server and poll loop
//! - [`config`] - configuration management
//! - [`error`] - error types
//!
//! # Failure semantics
//!
//! When a device stops answering, every series previously exported for it
//! is set to NaN instead of holding its last reading. A scrape therefore
//! never mistakes a stale value for a current one; the series come back as
//! soon as the device answers again.

pub mod config;
pub mod error;
pub mod kaco;
pub mod metrics;
pub mod server;
