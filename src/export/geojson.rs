use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::{DensityReport, distance_to};
use crate::domain::{Location, LocationTable};

/// Hands out distinct map file names within one output directory.
///
/// The location slug is used when it is non-empty and unused; otherwise
/// the name falls back to `location_<index>`.
#[derive(Debug, Default)]
pub struct MapFileNames {
    used: HashSet<String>,
}

impl MapFileNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(&mut self, index: usize, location: &Location) -> String {
        let slug = location.slug();
        let mut stem = if slug.is_empty() || self.used.contains(&slug) {
            format!("location_{}", index)
        } else {
            slug
        };
        let mut n = 1;
        while self.used.contains(&stem) {
            stem = format!("location_{}_{}", index, n);
            n += 1;
        }
        self.used.insert(stem.clone());
        format!("{}.geojson", stem)
    }
}

/// Build a GeoJSON map of one location.
///
/// Features, in order:
/// - one `Point` per venue (name, address, distance to centroid)
/// - one `LineString` per venue from the centroid to the venue
/// - the centroid as a `Point` with `role = "centroid"`
/// - the geocoded city center with `role = "city_center"`, when known
///
/// Positions are `[lng, lat]` as GeoJSON requires.
pub fn geojson_map(table: &LocationTable, report: &DensityReport) -> Value {
    let (c_lat, c_lng) = report.centroid;
    let mut features = Vec::with_capacity(table.venues.len() * 2 + 2);

    for venue in &table.venues {
        features.push(json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [venue.lng, venue.lat]},
            "properties": {
                "role": "venue",
                "name": venue.name,
                "address": venue.address,
                "distance": distance_to(venue, report.centroid),
            }
        }));
    }

    for venue in &table.venues {
        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[c_lng, c_lat], [venue.lng, venue.lat]]
            },
            "properties": {"role": "spoke", "name": venue.name}
        }));
    }

    features.push(json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [c_lng, c_lat]},
        "properties": {
            "role": "centroid",
            "name": "Mean Co-ordinate",
            "mean_distance": report.mean_distance,
            "mean_distance_m": report.mean_distance_m,
        }
    }));

    if let Some((lat, lng)) = table.city_center() {
        features.push(json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [lng, lat]},
            "properties": {"role": "city_center", "name": table.location.name()}
        }));
    }

    json!({
        "type": "FeatureCollection",
        "properties": {
            "location": table.location.name(),
            "total_results": table.total_results,
            "count": report.count,
        },
        "features": features,
    })
}

/// Write the map of one location to `path`
pub fn write_geojson(path: &Path, table: &LocationTable, report: &DensityReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create GeoJSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &geojson_map(table, report))
        .context("Failed to serialize GeoJSON")?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
