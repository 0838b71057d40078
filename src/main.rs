use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use venue_density::api::{PlacesClient, VenueQuery};
use venue_density::cities::{DEFAULT_COUNTRY, load_cities};
use venue_density::config::{CLIENT_ID_ENV, CLIENT_SECRET_ENV, FileConfig};
use venue_density::domain::{Location, dedup_locations};
use venue_density::export::{MapFileNames, write_geojson, write_venues_csv};
use venue_density::logging;
use venue_density::run::{RunError, RunEvent, run};

/// Count Greek restaurants per city and measure how spread out they are
///
/// Examples:
///   # The six default German cities
///   venue-density
///
///   # Two cities, with GeoJSON maps written to ./maps
///   venue-density -l "Berlin, Germany" -l "Munich, Germany" -o maps
///
///   # Cities from a CSV file with a City column
///   venue-density --cities GermanCities.csv --export-csv venues.csv
#[derive(Parser, Debug)]
#[command(name = "venue-density")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches venue-density.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Location to query, e.g. "Munich, Germany" (repeatable)
    #[arg(short = 'l', long = "location")]
    locations: Vec<String>,

    /// CSV file with a City column to read locations from
    #[arg(long)]
    cities: Option<PathBuf>,

    /// Country appended to cities read from CSV when the row has none
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,

    /// Maximum venues requested per location
    #[arg(long)]
    limit: Option<u32>,

    /// Foursquare category id (defaults to Greek restaurant)
    #[arg(long)]
    category: Option<String>,

    /// Foursquare client id
    #[arg(long, env = CLIENT_ID_ENV, hide_env_values = true)]
    client_id: Option<String>,

    /// Foursquare client secret
    #[arg(long, env = CLIENT_SECRET_ENV, hide_env_values = true)]
    client_secret: Option<String>,

    /// Foursquare API version date (v parameter)
    #[arg(long)]
    api_version: Option<String>,

    /// Directory for per-location GeoJSON maps
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Write every fetched venue to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Abort on the first location that fails instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let (file_config, config_warnings) = match args.config {
        Some(ref path) => (FileConfig::from_path(path)?, Vec::new()),
        None => {
            let discovered = FileConfig::load();
            (discovered.config.unwrap_or_default(), discovered.warnings)
        }
    };

    let verbose = args.verbose || file_config.verbose;
    logging::init(verbose);
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    let fail_fast = args.fail_fast || file_config.fail_fast;
    let query = VenueQuery {
        limit: args.limit.unwrap_or(file_config.limit),
        category_id: args
            .category
            .clone()
            .unwrap_or_else(|| file_config.category_id.clone()),
    };
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.output_dir.clone());
    let export_csv = args
        .export_csv
        .clone()
        .or_else(|| file_config.export_csv.clone());

    let locations = resolve_locations(&args, &file_config)?;
    if locations.is_empty() {
        bail!("No locations to query");
    }

    let mut foursquare = file_config.foursquare.clone().unwrap_or_default();
    if let Some(ref version) = args.api_version {
        foursquare.version = version.clone();
    }
    let credentials = foursquare.credentials(args.client_id.clone(), args.client_secret.clone())?;
    let client = PlacesClient::new(&foursquare, credentials)?;

    println!("venue-density - Venue Dispersion per City");
    println!("=========================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Locations: {}", locations.len());
        println!("  Category: {}", query.category_id);
        println!("  Limit: {}", query.limit);
        println!("  API version: {}", foursquare.version);
        println!("  Fail fast: {}", fail_fast);
        if let Some(ref dir) = output_dir {
            println!("  Maps: {}", dir.display());
        }
        if let Some(ref path) = export_csv {
            println!("  CSV export: {}", path.display());
        }
        println!();
    }

    let mut spinner: Option<(ProgressBar, Instant)> = None;
    let outcome = run(&client, &locations, &query, fail_fast, |event| match event {
        RunEvent::Fetching(location) => {
            spinner = Some((
                create_spinner(&format!("Fetching {}...", location)),
                Instant::now(),
            ));
        }
        RunEvent::Fetched(table) => {
            if let Some((pb, start)) = spinner.take() {
                pb.finish_with_message(format!(
                    "Fetched {} venues for {} ({} total) [{:.1}s]",
                    table.venues.len(),
                    table.location,
                    table.total_results,
                    start.elapsed().as_secs_f32()
                ));
            }
        }
        RunEvent::Failed(location, _) => {
            if let Some((pb, _)) = spinner.take() {
                pb.finish_with_message(format!("Failed to fetch {}", location));
            }
        }
        RunEvent::Analyzed(table, density) => {
            println!(
                "Total number of places in {} = {}",
                table.location, table.total_results
            );
            println!(
                "  Mean distance from mean coordinate: {:.4} (~{:.2} km)",
                density.mean_distance,
                density.mean_distance_m / 1000.0
            );
        }
    });

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(RunError::NoResults(summary)) => {
            println!();
            print!("{}", summary.render());
            bail!("No location produced a result");
        }
        Err(RunError::Aborted(e)) => {
            let location = e.location().clone();
            return Err(e).context(format!("Failed to process {}", location));
        }
    };

    if let Some(ref dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let mut names = MapFileNames::new();
        for (index, row) in outcome.summary.rows.iter().enumerate() {
            let Some(table) = outcome.tables.get(&row.location) else {
                continue;
            };
            let path = dir.join(names.file_name(index, &row.location));
            write_geojson(&path, table, &row.density)
                .with_context(|| format!("Failed to write map for {}", row.location))?;
            if verbose {
                println!("  Map: {}", path.display());
            }
        }
    }

    if let Some(ref path) = export_csv {
        let rows = write_venues_csv(path, &outcome.tables).context("Failed to export venues")?;
        println!();
        println!("Exported {} venues to {}", rows, path.display());
    }

    println!();
    print!("{}", outcome.summary.render());

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

/// Flags win over the config file; explicit lists win over CSV input.
/// Repeated locations are queried once.
fn resolve_locations(args: &Args, file_config: &FileConfig) -> Result<Vec<Location>> {
    let locations = collect_locations(args, file_config)?;
    let count = locations.len();
    let locations = dedup_locations(locations);
    if locations.len() < count {
        tracing::warn!(
            "Ignoring {} duplicate location(s)",
            count - locations.len()
        );
    }
    Ok(locations)
}

fn collect_locations(args: &Args, file_config: &FileConfig) -> Result<Vec<Location>> {
    if !args.locations.is_empty() {
        return Ok(args.locations.iter().map(Location::new).collect());
    }
    if let Some(ref path) = args.cities {
        return load_cities(path, &args.country);
    }
    if let Some(ref names) = file_config.locations {
        return Ok(names.iter().map(Location::new).collect());
    }
    if let Some(ref path) = file_config.cities_csv {
        return load_cities(path, &args.country);
    }
    Ok(Location::defaults())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
