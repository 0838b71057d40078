use crate::api::{PlacesClient, VenueQuery};
use crate::domain::{Location, LocationTable};
use crate::error::Result;

use super::parser::{parse_bounds, parse_venues};

/// Query one location and build its table.
///
/// `total_results` falls back to the number of returned venues when the
/// service does not report it.
pub fn fetch_location(
    client: &PlacesClient,
    location: &Location,
    query: &VenueQuery,
) -> Result<LocationTable> {
    let response = client.explore(location, query)?;
    let venues = parse_venues(location, &response)?;

    let mut table = LocationTable::new(location.clone(), venues);
    if let Some(total) = response.response.total_results {
        table.total_results = total;
    }
    table.bounds = response.bounds().map(parse_bounds);

    tracing::debug!(
        %location,
        returned = table.venues.len(),
        total = table.total_results,
        "fetched location"
    );

    Ok(table)
}
