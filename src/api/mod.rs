pub mod foursquare;

pub use foursquare::{Credentials, ExploreResponse, PlacesClient, VenueQuery};
