use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub kaco: KacoConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KacoConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_device_port")]
    pub port: u16,
    /// Total per-request timeout against the device. The inverter firmware
    /// never closes slow connections on its own.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_seconds: u64,
}

fn default_host() -> String {
    "kaco.fritz.box".to_string()
}

fn default_device_port() -> u16 {
    8484
}

fn default_timeout() -> u64 {
    10
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8007
}

fn default_poll_interval() -> u64 {
    5
}

impl Default for KacoConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_device_port(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_poll_interval(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("KACO_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
