//! Command-line reader for a single Modbus item

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use modbus_get::{ItemReader, ReaderConfig, RodbusTransport};

#[derive(Parser)]
#[command(name = "modbus-get")]
#[command(about = "Read a typed value from a Modbus device using the modbus-get crate")]
#[command(version)]
struct Cli {
    #[arg(
        short = 't',
        long,
        default_value = "3",
        help = "Connection and response timeout in seconds"
    )]
    timeout: u64,

    #[arg(
        long,
        default_value = "warn",
        help = "Maximum level of log messages written to stderr"
    )]
    log_level: tracing::Level,

    #[arg(help = "tcp://host[:port] or rtu://device[:baud[:DPS]]")]
    endpoint: String,

    #[arg(
        allow_hyphen_values = true,
        help = "slave id, function, address, count, data type, endianness and offset"
    )]
    params: Vec<String>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ReaderConfig {
        timeout: Duration::from_secs(cli.timeout),
    };
    let reader = ItemReader::new(RodbusTransport::new(), config);

    let mut params = Vec::with_capacity(cli.params.len() + 1);
    params.push(cli.endpoint);
    params.extend(cli.params);

    match reader.get(&params).await {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}
