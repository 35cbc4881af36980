//! Kaco NX3 device API: HTTP client, wire payloads and telemetry types.

pub mod client;
pub mod provider;
pub mod types;

pub use client::KacoClient;
pub use provider::{InverterProvider, KacoInverterProvider};
