pub mod geojson;
pub mod venues_csv;

pub use geojson::{MapFileNames, geojson_map, write_geojson};
pub use venues_csv::write_venues_csv;
