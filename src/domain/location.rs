use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Cities queried when neither the config file nor a cities CSV supplies a list.
pub const DEFAULT_LOCATIONS: [&str; 6] = [
    "Berlin, Germany",
    "Cologne, Germany",
    "Dusseldorf, Germany",
    "Frankfurt am Main, Germany",
    "Munich, Germany",
    "Stuttgart, Germany",
];

/// A named query target, passed verbatim as the `near` parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Filesystem-friendly name, e.g. "Frankfurt am Main, Germany" -> "frankfurt_am_main_germany"
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.0.len());
        for c in self.0.chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('_') {
                slug.push('_');
            }
        }
        slug.trim_end_matches('_').to_string()
    }

    pub fn defaults() -> Vec<Location> {
        DEFAULT_LOCATIONS.iter().map(|&n| Location::new(n)).collect()
    }
}

/// Drop repeated locations, keeping the first occurrence and the original order
pub fn dedup_locations(locations: Vec<Location>) -> Vec<Location> {
    let mut seen = HashSet::with_capacity(locations.len());
    locations
        .into_iter()
        .filter(|l| seen.insert(l.clone()))
        .collect()
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
