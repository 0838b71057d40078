use geo::{Centroid, MultiPoint, Point};
use serde::Serialize;

use crate::domain::{LocationTable, Venue};
use crate::error::EmptyResultError;
use crate::geometry::Projector;

/// Dispersion of one location's venues around their centroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityReport {
    pub count: usize,
    /// Mean coordinate as (lat, lng)
    pub centroid: (f64, f64),
    /// Mean Euclidean distance from the centroid in raw degrees
    pub mean_distance: f64,
    /// Same mean in approximate metres
    pub mean_distance_m: f64,
}

/// Mean coordinate of `venues` as (lat, lng), or `None` when empty
pub fn centroid(venues: &[Venue]) -> Option<(f64, f64)> {
    let points: MultiPoint<f64> = venues.iter().map(Venue::point).collect();
    points.centroid().map(|c| (c.y(), c.x()))
}

/// Euclidean distance in degrees between a venue and a (lat, lng) point
pub fn distance_to(venue: &Venue, (lat, lng): (f64, f64)) -> f64 {
    let d = venue.point() - Point::new(lng, lat);
    d.x().hypot(d.y())
}

/// Compute count, centroid and mean distance for a location table.
///
/// An empty table has no centroid and fails with `EmptyResultError`.
pub fn analyze(table: &LocationTable) -> Result<DensityReport, EmptyResultError> {
    let venues = &table.venues;
    let centroid = centroid(venues).ok_or_else(|| EmptyResultError {
        location: table.location.clone(),
    })?;

    let count = venues.len();
    let n = count as f64;

    let mean_distance = venues.iter().map(|v| distance_to(v, centroid)).sum::<f64>() / n;

    let projector = Projector::new(centroid);
    let mean_distance_m = venues
        .iter()
        .map(|v| projector.distance_m(v.lat, v.lng))
        .sum::<f64>()
        / n;

    Ok(DensityReport {
        count,
        centroid,
        mean_distance,
        mean_distance_m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;

    fn table(coords: &[(f64, f64)]) -> LocationTable {
        let venues = coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lng))| Venue::new(format!("Venue {}", i), None, lat, lng))
            .collect();
        LocationTable::new(Location::new("Testville"), venues)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_table_fails() {
        let err = analyze(&table(&[])).unwrap_err();
        assert_eq!(err.location.name(), "Testville");
    }

    #[test]
    fn test_identical_points() {
        let report = analyze(&table(&[(48.1, 11.5); 5])).unwrap();
        assert_eq!(report.count, 5);
        assert!(close(report.centroid.0, 48.1));
        assert!(close(report.centroid.1, 11.5));
        assert!(close(report.mean_distance, 0.0));
        assert!(close(report.mean_distance_m, 0.0));
    }

    #[test]
    fn test_symmetric_points() {
        let report = analyze(&table(&[(3.0, 4.0), (-3.0, -4.0)])).unwrap();
        assert!(close(report.centroid.0, 0.0));
        assert!(close(report.centroid.1, 0.0));
        assert!(close(report.mean_distance, 5.0));
    }

    #[test]
    fn test_three_venues_in_a_row() {
        let report = analyze(&table(&[(52.0, 13.0), (52.1, 13.1), (52.2, 13.2)])).unwrap();
        assert_eq!(report.count, 3);
        assert!((report.centroid.0 - 52.1).abs() < 1e-9);
        assert!((report.centroid.1 - 13.1).abs() < 1e-9);
        let expected = 2.0 * 0.02_f64.sqrt() / 3.0;
        assert!((report.mean_distance - expected).abs() < 1e-9);
        assert!((report.mean_distance - 0.0943).abs() < 1e-4);
    }

    #[test]
    fn test_order_independent() {
        let coords = [(50.9, 6.9), (51.0, 7.1), (50.8, 6.95), (50.93, 7.02)];
        let mut reversed = coords;
        reversed.reverse();

        let a = analyze(&table(&coords)).unwrap();
        let b = analyze(&table(&reversed)).unwrap();
        assert!(close(a.mean_distance, b.mean_distance));
        assert!(close(a.centroid.0, b.centroid.0));
        assert!(close(a.centroid.1, b.centroid.1));
    }

    #[test]
    fn test_translation_invariant() {
        let coords = [(1.0, 2.0), (2.0, 5.0), (-1.0, 0.5)];
        let shifted: Vec<_> = coords.iter().map(|&(a, b)| (a + 40.0, b - 7.5)).collect();

        let a = analyze(&table(&coords)).unwrap();
        let b = analyze(&table(&shifted)).unwrap();
        assert!(close(a.mean_distance, b.mean_distance));
    }

    #[test]
    fn test_scales_linearly() {
        let coords = [(1.0, 2.0), (2.0, 5.0), (-1.0, 0.5)];
        let scaled: Vec<_> = coords.iter().map(|&(a, b)| (a * 3.0, b * 3.0)).collect();

        let a = analyze(&table(&coords)).unwrap();
        let b = analyze(&table(&scaled)).unwrap();
        assert!(close(b.mean_distance, 3.0 * a.mean_distance));
    }

    #[test]
    fn test_metric_distance_is_plausible() {
        // two venues ~1 km north and south of the centroid
        let report = analyze(&table(&[(48.146, 11.575), (48.128, 11.575)])).unwrap();
        assert!((report.mean_distance_m - 1000.0).abs() < 50.0);
    }

    #[test]
    fn test_centroid_helper() {
        assert_eq!(centroid(&[]), None);
        let venues = [
            Venue::new("A", None, 10.0, 20.0),
            Venue::new("B", None, 12.0, 22.0),
        ];
        let (lat, lng) = centroid(&venues).unwrap();
        assert!(close(lat, 11.0));
        assert!(close(lng, 21.0));
        assert!(close(distance_to(&venues[0], (lat, lng)), 2f64.sqrt()));
    }
}
