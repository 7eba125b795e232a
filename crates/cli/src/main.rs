mod io;
mod ors;

use clap::{Parser, ValueEnum};
use ors::OrsClient;
use std::path::PathBuf;
use tracing::{info, warn};
use walkways::export::edges_to_geojson;
use walkways::{Config, Pipeline};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Stops as a CSV file with `id,lng,lat` columns, or a JSON array of
    /// `{"id", "lng", "lat"}` objects
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long, default_value = "walk.json")]
    output: PathBuf,

    #[arg(long, default_value = "http://localhost:8082/ors")]
    ors_url: String,

    #[arg(long, default_value = "foot-walking")]
    profile: String,

    /// Sent as the `Authorization` header
    #[arg(long)]
    api_key: Option<String>,

    /// Configuration file (`.toml` or JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    radius_km: Option<f64>,

    #[arg(long)]
    batch_size: Option<usize>,

    #[arg(long)]
    capacity: Option<usize>,

    #[arg(long)]
    workers: Option<usize>,

    /// Write the planned batches instead of calling the service
    #[arg(long)]
    plan_only: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Geojson,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                io::read_config(path)?
            }
            None => Config::default(),
        };

        if let Some(radius_km) = self.radius_km {
            config.radius_km = radius_km;
        }
        if let Some(batch_size) = self.batch_size {
            config.max_batch_size = batch_size;
        }
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walkways_cli=info,walkways=info,info".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.config()?;

    let stops = io::read_stops(&args.input)?;
    info!("Read {} stops from {}", stops.len(), args.input.display());

    let pipeline = Pipeline::builder().config(config).stops(stops).build()?;
    let plan = pipeline.plan()?;
    info!(
        "Planned {} pairs in {} batches",
        plan.pair_count,
        plan.batches.len()
    );
    if plan.dropped_points > 0 {
        warn!(
            "{} stops were not indexed and can only appear as sources",
            plan.dropped_points
        );
    }

    if args.plan_only {
        io::write_json(&args.output, &plan)?;
        info!("Wrote plan to {}", args.output.display());
        return Ok(());
    }

    let client = OrsClient::new(&args.ors_url, &args.profile, args.api_key.clone())?;
    info!("Requesting matrices from {}", client.endpoint());

    let mut report = pipeline.dispatch(&plan, &client)?;
    if report.failed_batches > 0 {
        warn!(
            "{} of {} batches failed; their edges are missing from the output",
            report.failed_batches,
            plan.batches.len()
        );
    }
    report
        .edges
        .sort_by(|a, b| (&a.start, &a.end).cmp(&(&b.start, &b.end)));

    match args.format {
        OutputFormat::Json => io::write_json(&args.output, &report.edges)?,
        OutputFormat::Geojson => {
            let collection = edges_to_geojson(&report.edges, pipeline.catalog())?;
            io::write_json(&args.output, &collection)?;
        }
    }
    info!("Wrote {} edges to {}", report.edges.len(), args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["walkways", "--input", "stops.json"]).unwrap();
        assert_eq!(args.output, PathBuf::from("walk.json"));
        assert_eq!(args.profile, "foot-walking");
        assert_eq!(args.ors_url, "http://localhost:8082/ors");
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.plan_only);
        assert_eq!(args.config().unwrap(), Config::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walkways.toml");
        fs::write(&path, "radius_km = 0.8\ncapacity = 8\n").unwrap();

        let args = Args::try_parse_from([
            "walkways",
            "--input",
            "stops.json",
            "--config",
            path.to_str().unwrap(),
            "--radius-km",
            "1.5",
            "--workers",
            "3",
            "--format",
            "geojson",
        ])
        .unwrap();
        let config = args.config().unwrap();

        assert_eq!(config.radius_km, 1.5);
        assert_eq!(config.capacity, 8);
        assert_eq!(config.workers, Some(3));
        assert_eq!(args.format, OutputFormat::Geojson);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["walkways"]).is_err());
    }
}
