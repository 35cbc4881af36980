use anyhow::Result;
use clap::{Parser, Subcommand};
use kaco_exporter::kaco::KacoClient;
use kaco_exporter::{config::Config, server};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// Inverter host (overrides config)
    #[arg(long, env = "KACO_HOST")]
    host: Option<String>,

    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Issue a raw API request and print the JSON response
    Call {
        /// Relative path+query, e.g. "getdev.cgi?device=2"
        path: String,
    },
    /// One-shot listing of the inverters behind the host
    Live {
        /// Only print the directory headline values, skip per-device telemetry
        #[arg(long)]
        no_details: bool,
    },
    /// Run the Prometheus exporter
    Serve {
        /// Port to listen on for metrics (overrides config)
        #[arg(short, long, env = "EXPORTER_PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over the -v flags when set
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(&args.config)?;
    if let Some(host) = args.host {
        config.kaco.host = host;
    }

    match args.command {
        Command::Call { path } => {
            let client = KacoClient::new(&config.kaco)?;
            let response = client.call_raw(&path).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Live { no_details } => {
            let client = KacoClient::new(&config.kaco)?;
            let inverters = client.list_inverters().await?;
            for inverter in inverters {
                if no_details {
                    println!(
                        "{}: total {}kWh; current {}W",
                        inverter.serial, inverter.energy_total_kwh, inverter.power_ac_watts
                    );
                } else {
                    let details = client.inverter_details(&inverter.serial).await?;
                    println!("{details:#?}");
                }
            }
        }
        Command::Serve { port } => {
            info!(
                "starting Kaco Prometheus exporter v{}",
                env!("CARGO_PKG_VERSION")
            );
            if let Some(port) = port {
                config.server.port = port;
            }
            server::start(config).await?;
        }
    }

    Ok(())
}
