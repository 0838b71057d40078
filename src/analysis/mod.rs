pub mod density;

pub use density::{DensityReport, analyze, centroid, distance_to};
