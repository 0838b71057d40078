//! venue-density - Count venues of one category per city and measure their spread

pub mod analysis;
pub mod api;
pub mod cities;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod places;
pub mod report;
pub mod run;

pub use error::{EmptyResultError, Error, FetchError, MalformedVenueError};
