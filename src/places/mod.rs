pub mod fetch;
pub mod parser;

pub use fetch::fetch_location;
pub use parser::parse_venues;
