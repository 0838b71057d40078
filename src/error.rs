//! Error kinds for fetching and analysing a single location.
//!
//! The binary decides whether a per-location error aborts the run or is
//! logged and skipped.

use thiserror::Error;

use crate::domain::Location;

/// The places service could not be reached or answered with something unusable
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {location} failed")]
    Transport {
        location: Location,
        #[source]
        source: reqwest::Error,
    },

    #[error("places service returned {status} for {location}: {detail}")]
    Status {
        location: Location,
        status: u16,
        detail: String,
    },

    #[error("malformed response for {location}: {reason}")]
    Malformed { location: Location, reason: String },
}

impl FetchError {
    pub fn location(&self) -> &Location {
        match self {
            FetchError::Transport { location, .. }
            | FetchError::Status { location, .. }
            | FetchError::Malformed { location, .. } => location,
        }
    }
}

/// A response item lacks one of the fields a venue record needs
#[derive(Debug, Error, PartialEq)]
#[error("venue #{index} for {location} is missing `{field}`")]
pub struct MalformedVenueError {
    pub location: Location,
    pub index: usize,
    pub field: &'static str,
}

/// The location table has no rows, so the centroid is undefined
#[derive(Debug, Error, PartialEq)]
#[error("no venues found for {location}")]
pub struct EmptyResultError {
    pub location: Location,
}

/// Any failure that stops one location from producing a result
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    MalformedVenue(#[from] MalformedVenueError),

    #[error(transparent)]
    EmptyResult(#[from] EmptyResultError),
}

impl Error {
    pub fn location(&self) -> &Location {
        match self {
            Error::Fetch(e) => e.location(),
            Error::MalformedVenue(e) => &e.location,
            Error::EmptyResult(e) => &e.location,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
