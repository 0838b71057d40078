use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::domain::LocationTables;

#[derive(Debug, Serialize)]
struct VenueRow<'a> {
    location: &'a str,
    name: &'a str,
    address: Option<&'a str>,
    lat: f64,
    lng: f64,
}

/// Write every venue of every location to one CSV file, in fetch order.
///
/// Returns the number of rows written.
pub fn write_venues_csv(path: &Path, tables: &LocationTables) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    let mut rows = 0;
    for table in tables {
        for venue in &table.venues {
            writer.serialize(VenueRow {
                location: table.location.name(),
                name: &venue.name,
                address: venue.address.as_deref(),
                lat: venue.lat,
                lng: venue.lng,
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, LocationTable, Venue};
    use tempfile::tempdir;

    #[test]
    fn test_write_venues_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("venues.csv");

        let mut tables = LocationTables::new();
        tables.insert(LocationTable::new(
            Location::new("Berlin, Germany"),
            vec![
                Venue::new("Athen", Some("Kantstr. 5".to_string()), 52.5, 13.3),
                Venue::new("Sparta, Grill", None, 52.51, 13.41),
            ],
        ));
        tables.insert(LocationTable::new(Location::new("Munich, Germany"), Vec::new()));

        let rows = write_venues_csv(&path, &tables).unwrap();
        assert_eq!(rows, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "location,name,address,lat,lng");
        assert_eq!(lines[1], "\"Berlin, Germany\",Athen,Kantstr. 5,52.5,13.3");
        assert_eq!(lines[2], "\"Berlin, Germany\",\"Sparta, Grill\",,52.51,13.41");
        assert_eq!(lines.len(), 3);
    }
}
