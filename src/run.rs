//! Fetch every location, then analyse every table, applying the failure policy.

use thiserror::Error;

use crate::analysis::{DensityReport, analyze};
use crate::api::{PlacesClient, VenueQuery};
use crate::domain::{Location, LocationTable, LocationTables};
use crate::error::Error;
use crate::places::fetch_location;
use crate::report::Summary;

/// Progress notifications for the caller's UI
#[derive(Debug)]
pub enum RunEvent<'a> {
    Fetching(&'a Location),
    Fetched(&'a LocationTable),
    /// Emitted for fetch and analysis errors alike, before skipping or aborting
    Failed(&'a Location, &'a Error),
    Analyzed(&'a LocationTable, &'a DensityReport),
}

#[derive(Debug, Error)]
pub enum RunError {
    /// `fail_fast` was set and one location failed
    #[error(transparent)]
    Aborted(#[from] Error),

    #[error("no location produced a result")]
    NoResults(Summary),
}

/// Tables and summary of a completed run
#[derive(Debug)]
pub struct Run {
    pub tables: LocationTables,
    pub summary: Summary,
}

/// Query each location once, in order, then analyse the tables in the same order.
///
/// A failing location is logged and listed in the summary, unless
/// `fail_fast` is set, in which case the first error is returned.
/// A run where no location produced a result is an error either way.
pub fn run(
    client: &PlacesClient,
    locations: &[Location],
    query: &VenueQuery,
    fail_fast: bool,
    mut on_event: impl FnMut(RunEvent<'_>),
) -> Result<Run, RunError> {
    let mut summary = Summary::new();
    let mut tables = LocationTables::new();

    for location in locations {
        on_event(RunEvent::Fetching(location));
        match fetch_location(client, location, query) {
            Ok(table) => {
                on_event(RunEvent::Fetched(&table));
                tables.insert(table);
            }
            Err(e) => {
                on_event(RunEvent::Failed(location, &e));
                if fail_fast {
                    return Err(e.into());
                }
                tracing::warn!(%location, error = %e, "skipping location");
                summary.push_failure(location.clone(), e.to_string());
            }
        }
    }

    for table in tables.iter() {
        match analyze(table) {
            Ok(density) => {
                on_event(RunEvent::Analyzed(table, &density));
                summary.push(table.location.clone(), table.total_results, density);
            }
            Err(e) => {
                let e = Error::from(e);
                on_event(RunEvent::Failed(&table.location, &e));
                if fail_fast {
                    return Err(e.into());
                }
                tracing::warn!(location = %table.location, "no venues, dispersion undefined");
                summary.push_failure(table.location.clone(), e.to_string());
            }
        }
    }

    if summary.rows.is_empty() {
        return Err(RunError::NoResults(summary));
    }

    Ok(Run { tables, summary })
}
