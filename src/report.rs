use std::fmt::Write;

use crate::analysis::DensityReport;
use crate::domain::Location;

/// Result line for one location that was fetched and analysed
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub location: Location,
    /// Count reported by the places service
    pub total_results: u32,
    pub density: DensityReport,
}

/// Outcome of a whole run, in fetch order
#[derive(Debug, Default)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
    pub failures: Vec<(Location, String)>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, location: Location, total_results: u32, density: DensityReport) {
        self.rows.push(SummaryRow {
            location,
            total_results,
            density,
        });
    }

    pub fn push_failure(&mut self, location: Location, reason: impl Into<String>) {
        self.failures.push((location, reason.into()));
    }

    /// Rows ordered by total results, most first; ties keep fetch order
    pub fn ranking(&self) -> Vec<&SummaryRow> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.total_results.cmp(&a.total_results));
        rows
    }

    /// Location whose venues sit closest to their centroid
    pub fn most_compact(&self) -> Option<&SummaryRow> {
        self.rows
            .iter()
            .min_by(|a, b| a.density.mean_distance.total_cmp(&b.density.mean_distance))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let width = self
            .rows
            .iter()
            .map(|r| r.location.name().chars().count())
            .chain(std::iter::once("Location".len()))
            .max()
            .unwrap_or(0);

        let _ = writeln!(
            out,
            "{:<width$}  {:>7}  {:>8}  {:>10}  {:>9}",
            "Location", "Total", "Returned", "Mean dist", "~km",
        );
        let _ = writeln!(out, "{}", "-".repeat(width + 44));

        for row in self.ranking() {
            let _ = writeln!(
                out,
                "{:<width$}  {:>7}  {:>8}  {:>10.4}  {:>9.2}",
                row.location.name(),
                row.total_results,
                row.density.count,
                row.density.mean_distance,
                row.density.mean_distance_m / 1000.0,
            );
        }

        if let Some(best) = self.ranking().first() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "Most venues: {} ({})",
                best.location, best.total_results
            );
        }
        if let Some(compact) = self.most_compact() {
            let _ = writeln!(
                out,
                "Most compact: {} (mean distance {:.4})",
                compact.location, compact.density.mean_distance
            );
        }

        if !self.failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Skipped {} location(s):", self.failures.len());
            for (location, reason) in &self.failures {
                let _ = writeln!(out, "  {}: {}", location, reason);
            }
        }

        out
    }
}
