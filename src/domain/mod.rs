pub mod location;
pub mod venue;

pub use location::{DEFAULT_LOCATIONS, Location, dedup_locations};
pub use venue::{LocationTable, LocationTables, Venue};
