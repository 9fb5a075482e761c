mod validate;

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use lectio_protocol::Catalog;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about = "Validates a books.json catalog and compiles it to an rkyv archive")]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE", required_unless_present = "check_only")]
    output: Option<PathBuf>,

    /// Only report content problems
    #[arg(long)]
    check_only: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(input = ?cli.input, "reading catalog");
    let input_data = fs::read_to_string(&cli.input)?;
    let catalog: Catalog = lectio_view::catalog_from_json(&input_data)?;

    let units: usize = catalog.books.iter().map(|b| b.units.len()).sum();
    info!(books = catalog.books.len(), units, "catalog parsed");

    let issues = validate::check_catalog(&catalog);
    for issue in &issues {
        warn!("{}", issue);
    }

    let Some(output) = cli.output.filter(|_| !cli.check_only) else {
        info!(issues = issues.len(), "check finished");
        return Ok(());
    };

    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(&catalog)
        .map_err(|e| anyhow::anyhow!("archive serialization failed: {:?}", e))?;
    let bytes = serializer.into_serializer().into_inner();

    fs::write(&output, &bytes)?;
    info!(output = ?output, bytes = bytes.len(), "archive written");
    Ok(())
}
