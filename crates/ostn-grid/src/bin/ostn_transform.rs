//! Transform a single ETRS89 coordinate to OSGB36 with an ODN height.
//!
//! Usage:
//!   ostn-transform --dataset OSTN02_OSGM02_GB.txt --easting 651307.003 --northing 313255.686 --height 108.05
//!   ostn-transform --lat 52.658007833 --lon 1.716073972 --height 108.05 --json

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ostn_grid::{
    GeodeticCoordinate, OstnConfig, OstnTransformer, ResolverStrategy, SourceCoordinate,
    TargetCoordinate,
};

#[derive(Parser, Debug)]
#[command(name = "ostn-transform")]
#[command(about = "Transform ETRS89 coordinates to OSGB36 National Grid with ODN heights")]
struct Args {
    /// ETRS89 easting on the National Grid projection (meters)
    #[arg(long, requires = "northing", conflicts_with_all = ["lat", "lon"])]
    easting: Option<f64>,

    /// ETRS89 northing on the National Grid projection (meters)
    #[arg(long, requires = "easting")]
    northing: Option<f64>,

    /// ETRS89 latitude (decimal degrees)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// ETRS89 longitude (decimal degrees)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Height above the GRS80 ellipsoid (meters)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    height: f64,

    /// OSTN02_OSGM02 dataset file
    #[arg(short, long, env = "OSTN_DATASET_PATH")]
    dataset: Option<PathBuf>,

    /// Record lookup strategy
    #[arg(long, value_parser = ["indexed", "scan"])]
    resolver: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Serialize)]
struct Output {
    easting: f64,
    northing: f64,
    orthometric_height: f64,
    vertical_datum: &'static str,
    vertical_datum_code: u8,
}

impl From<TargetCoordinate> for Output {
    fn from(target: TargetCoordinate) -> Self {
        let (easting, northing, orthometric_height) = target.rounded_mm();
        Self {
            easting,
            northing,
            orthometric_height,
            vertical_datum: target.vertical_datum.name(),
            vertical_datum_code: target.vertical_datum.code(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    // Environment first, command line overrides
    let mut config = OstnConfig::from_env();
    if let Some(dataset) = &args.dataset {
        config.dataset_path = Some(dataset.clone());
    }
    if let Some(resolver) = &args.resolver {
        config.resolver = ResolverStrategy::from_str(resolver);
    }
    config.validate()?;
    info!(
        dataset = ?config.dataset_path,
        resolver = %config.resolver,
        "Loaded configuration"
    );

    let source = config.open_source().context("Failed to open OSTN dataset")?;
    let transformer = OstnTransformer::new(source);

    let target = match (args.easting, args.northing, args.lat, args.lon) {
        (Some(easting), Some(northing), _, _) => {
            transformer.transform(SourceCoordinate::new(easting, northing, args.height))?
        }
        (_, _, Some(lat), Some(lon)) => {
            transformer.transform_geodetic(GeodeticCoordinate::new(lat, lon, args.height))?
        }
        _ => bail!("Provide either --easting/--northing or --lat/--lon"),
    };

    let output = Output::from(target);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{:.3} {:.3} {:.3} {} ({})",
            output.easting,
            output.northing,
            output.orthometric_height,
            output.vertical_datum,
            output.vertical_datum_code
        );
    }

    Ok(())
}
