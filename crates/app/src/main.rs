mod serve;

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use services::{AppServices, Clock};
use storage::catalog::ExperimentCatalog;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidAddr { raw: String },
    InvalidCatalogPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAddr { raw } => write!(f, "invalid --addr value: {raw}"),
            ArgsError::InvalidCatalogPath { raw } => write!(f, "invalid --catalog value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  lab-server [--addr <host:port>] [--catalog <experiments.json>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --addr {DEFAULT_ADDR}");
    eprintln!("  --catalog <bundled experiments>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LAB_ADDR, LAB_CATALOG, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    addr: SocketAddr,
    catalog: Option<PathBuf>,
}

impl Args {
    fn parse(
        env_addr: Option<String>,
        env_catalog: Option<String>,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut addr = parse_addr(env_addr.as_deref().unwrap_or(DEFAULT_ADDR))?;
        let mut catalog = env_catalog
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--addr" => {
                    let value = require_value(args, "--addr")?;
                    addr = parse_addr(&value)?;
                }
                "--catalog" => {
                    let value = require_value(args, "--catalog")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidCatalogPath { raw: value });
                    }
                    catalog = Some(PathBuf::from(value));
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self { addr, catalog }))
    }
}

fn parse_addr(raw: &str) -> Result<SocketAddr, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidAddr {
        raw: raw.to_string(),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(
        std::env::var("LAB_ADDR").ok(),
        std::env::var("LAB_CATALOG").ok(),
        &mut argv,
    )
    .inspect_err(|_| print_usage())?;
    let Some(parsed) = parsed else {
        print_usage();
        return Ok(());
    };

    init_tracing();

    let catalog = match &parsed.catalog {
        Some(path) => ExperimentCatalog::from_path(path)?,
        None => ExperimentCatalog::bundled()?,
    };
    tracing::info!(
        experiments = catalog.len(),
        source = %parsed.catalog.as_ref().map_or_else(|| "bundled".to_string(), |p| p.display().to_string()),
        "catalog loaded"
    );

    // Progress lives in memory for the lifetime of the process.
    let services = AppServices::in_memory(Clock::default_clock(), catalog);
    let listener = tokio::net::TcpListener::bind(parsed.addr).await?;
    serve::serve(listener, &services).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
