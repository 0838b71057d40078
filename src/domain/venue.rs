use geo::{Point, Rect};
use serde::Serialize;

use super::Location;

/// One restaurant returned by a places query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    pub name: String,
    /// Street address; the places service omits it for some venues
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl Venue {
    pub fn new(name: impl Into<String>, address: Option<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            address,
            lat,
            lng,
        }
    }

    /// Position as a geo point (x = lng, y = lat)
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

/// Venues returned by a single query for one location
#[derive(Debug, Clone)]
pub struct LocationTable {
    pub location: Location,
    pub venues: Vec<Venue>,
    /// `totalResults` as reported by the service, which may exceed `venues.len()`
    pub total_results: u32,
    /// Geocoded bounding box of the location (x = lng, y = lat)
    pub bounds: Option<Rect<f64>>,
}

impl LocationTable {
    pub fn new(location: Location, venues: Vec<Venue>) -> Self {
        let total_results = venues.len() as u32;
        Self {
            location,
            venues,
            total_results,
            bounds: None,
        }
    }

    /// Midpoint of the geocoded bounds as (lat, lng)
    pub fn city_center(&self) -> Option<(f64, f64)> {
        self.bounds.map(|b| {
            let c = b.center();
            (c.y, c.x)
        })
    }
}

/// All location tables of one run, kept in fetch order
#[derive(Debug, Clone, Default)]
pub struct LocationTables {
    tables: Vec<LocationTable>,
}

impl LocationTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table; a location already present is replaced in place
    pub fn insert(&mut self, table: LocationTable) {
        match self
            .tables
            .iter_mut()
            .find(|t| t.location == table.location)
        {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn get(&self, location: &Location) -> Option<&LocationTable> {
        self.tables.iter().find(|t| &t.location == location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationTable> {
        self.tables.iter()
    }
}

impl<'a> IntoIterator for &'a LocationTables {
    type Item = &'a LocationTable;
    type IntoIter = std::slice::Iter<'a, LocationTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_city_center() {
        let mut table = LocationTable::new(Location::new("Berlin, Germany"), Vec::new());
        assert_eq!(table.city_center(), None);

        table.bounds = Some(Rect::new(
            coord! { x: 13.0, y: 52.3 },
            coord! { x: 13.8, y: 52.7 },
        ));
        let (lat, lng) = table.city_center().unwrap();
        assert!((lat - 52.5).abs() < 1e-9);
        assert!((lng - 13.4).abs() < 1e-9);
    }

    #[test]
    fn test_tables_keep_insertion_order() {
        let mut tables = LocationTables::new();
        tables.insert(LocationTable::new(Location::new("B"), Vec::new()));
        tables.insert(LocationTable::new(Location::new("A"), Vec::new()));
        tables.insert(LocationTable::new(
            Location::new("B"),
            vec![Venue::new("Taverna", None, 1.0, 2.0)],
        ));

        let names: Vec<_> = tables.iter().map(|t| t.location.name()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(tables.get(&Location::new("B")).unwrap().venues.len(), 1);
    }
}
