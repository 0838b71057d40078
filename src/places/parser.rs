use geo::{Rect, coord};

use crate::api::ExploreResponse;
use crate::api::foursquare::GeocodeBounds;
use crate::domain::{Location, Venue};
use crate::error::MalformedVenueError;

/// Project explore items into venue records.
///
/// Name, latitude and longitude are required; the street address is kept
/// as `None` when the service leaves it out.
pub fn parse_venues(
    location: &Location,
    response: &ExploreResponse,
) -> Result<Vec<Venue>, MalformedVenueError> {
    let missing = |index: usize, field: &'static str| MalformedVenueError {
        location: location.clone(),
        index,
        field,
    };

    response
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| -> Result<Venue, MalformedVenueError> {
            let venue = item.venue.as_ref().ok_or_else(|| missing(index, "venue"))?;
            let name = venue
                .name
                .clone()
                .ok_or_else(|| missing(index, "venue.name"))?;
            let loc = venue
                .location
                .as_ref()
                .ok_or_else(|| missing(index, "venue.location"))?;
            let lat = loc.lat.ok_or_else(|| missing(index, "venue.location.lat"))?;
            let lng = loc.lng.ok_or_else(|| missing(index, "venue.location.lng"))?;
            let address = loc.address.clone().filter(|a| !a.trim().is_empty());

            Ok(Venue::new(name, address, lat, lng))
        })
        .collect()
}

/// Geocoded bounds as a rectangle with x = lng, y = lat
pub fn parse_bounds(bounds: GeocodeBounds) -> Rect<f64> {
    Rect::new(
        coord! { x: bounds.sw.lng, y: bounds.sw.lat },
        coord! { x: bounds.ne.lng, y: bounds.ne.lat },
    )
}
