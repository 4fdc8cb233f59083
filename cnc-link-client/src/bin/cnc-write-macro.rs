//! Write one custom macro variable through the gateway.
//!
//! Connects to the controller, writes the variable, then disconnects
//! whether or not the write succeeded. Exits with status 1 when the connect
//! or the write fails.

use std::process::ExitCode;

use clap::Parser;
use cnc_link_client::{ClientError, FocasClient, DEFAULT_SERVICE_URL};
use cnc_link_common::{ConnectionRequest, DEFAULT_FOCAS_PORT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cnc-write-macro", version)]
#[command(about = "Write a custom macro variable on a FANUC CNC via the link gateway", long_about = None)]
struct Args {
    /// Base URL of the gateway
    #[arg(long, env = "FOCAS_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    service_url: String,

    /// Controller address
    #[arg(long, env = "CNC_IP", default_value = "192.168.3.105")]
    cnc_ip: String,

    /// Controller FOCAS port
    #[arg(long, env = "CNC_PORT", default_value_t = DEFAULT_FOCAS_PORT)]
    cnc_port: u16,

    /// Macro variable number
    #[arg(long, short, env = "MACRO_NUMBER", default_value_t = 700)]
    number: i16,

    /// Value to write, before scaling by the decimal count
    #[arg(long, short, env = "MACRO_VALUE", default_value_t = 1, allow_hyphen_values = true)]
    value: i32,

    /// Number of decimal places in the value
    #[arg(long, short, env = "MACRO_DEC_VAL", default_value_t = 0)]
    decimals: i16,
}

fn print_failure(what: &str, err: &ClientError) {
    match err {
        ClientError::Http(e) if e.is_connect() => {
            println!("Error: could not reach the gateway ({})", e);
            println!("Check that the gateway is running.");
        }
        ClientError::Gateway { message, code } => {
            println!("✗ {}: {}", what, message);
            if let Some(code) = code {
                println!("  Error code: {}", code);
            }
        }
        other => println!("✗ {}: {}", what, other),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    println!("{}", "=".repeat(60));
    println!("Write macro variable to FANUC CNC");
    println!("{}", "=".repeat(60));
    println!("Gateway: {}", args.service_url);
    println!("CNC: {}:{}", args.cnc_ip, args.cnc_port);
    println!("Macro variable: #{}", args.number);
    println!("Value: {}", args.value);
    println!("{}", "=".repeat(60));
    println!();

    let client = match FocasClient::new(&args.service_url) {
        Ok(client) => client,
        Err(e) => {
            print_failure("Could not create HTTP client", &e);
            return ExitCode::FAILURE;
        }
    };

    let request = ConnectionRequest {
        ip_address: Some(args.cnc_ip.clone()),
        port: args.cnc_port,
        timeout: None,
    };

    let (number, value, decimals) = (args.number, args.value, args.decimals);
    let session = client
        .with_session(&request, |client| async move {
            println!("✓ Connected to CNC {}:{}", args.cnc_ip, args.cnc_port);
            Ok(client.write_macro(number, value, decimals).await)
        })
        .await;

    match session {
        Err(e) => {
            print_failure("Could not connect to CNC", &e);
            ExitCode::FAILURE
        }
        Ok(Err(e)) => {
            print_failure("Could not write macro variable", &e);
            ExitCode::FAILURE
        }
        Ok(Ok(_)) => {
            println!("✓ Macro variable #{} set to {}", number, value);
            if decimals != 0 {
                println!("  (decimals: {})", decimals);
            }
            println!();
            println!("✓ Done");
            ExitCode::SUCCESS
        }
    }
}
