use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::domain::Location;

pub const DEFAULT_COUNTRY: &str = "Germany";

/// One row of the cities file; other columns (coordinates etc.) are ignored
#[derive(Debug, Deserialize)]
struct CityRow {
    #[serde(rename = "City", alias = "city")]
    city: String,
    #[serde(rename = "Country", alias = "country", default)]
    country: Option<String>,
}

/// Read query targets from a CSV with a `City` column and an optional `Country` column.
pub fn read_cities<R: Read>(reader: R, default_country: &str) -> Result<Vec<Location>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut locations = Vec::new();
    for (i, row) in rdr.deserialize::<CityRow>().enumerate() {
        let row = row.with_context(|| format!("Failed to parse cities row {}", i + 1))?;
        if row.city.is_empty() {
            bail!("Empty city name in cities row {}", i + 1);
        }
        let country = row
            .country
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| default_country.to_string());
        locations.push(Location::new(format!("{}, {}", row.city, country)));
    }

    Ok(locations)
}

pub fn load_cities(path: &Path, default_country: &str) -> Result<Vec<Location>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open cities file: {}", path.display()))?;
    read_cities(file, default_country)
}
