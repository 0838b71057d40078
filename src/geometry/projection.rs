/// Metres per degree of latitude (and of longitude at the equator)
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Equirectangular projection from WGS84 to local metres around a center.
///
/// - x = (lng - center_lng) * cos(center_lat) * 111320
/// - y = (lat - center_lat) * 111320
///
/// Good enough for distances inside one city.
#[derive(Debug, Clone)]
pub struct Projector {
    center_lat: f64,
    center_lng: f64,
    cos_lat: f64,
}

impl Projector {
    /// # Arguments
    /// * `center` - (lat, lng) in WGS84
    pub fn new(center: (f64, f64)) -> Self {
        let (lat, lng) = center;
        Self {
            center_lat: lat,
            center_lng: lng,
            cos_lat: lat.to_radians().cos(),
        }
    }

    /// Project a lat/lng point to (x, y) metres from the center
    pub fn project(&self, lat: f64, lng: f64) -> (f64, f64) {
        let x = (lng - self.center_lng) * self.cos_lat * METERS_PER_DEGREE;
        let y = (lat - self.center_lat) * METERS_PER_DEGREE;
        (x, y)
    }

    /// Approximate ground distance in metres from the center
    pub fn distance_m(&self, lat: f64, lng: f64) -> f64 {
        let (x, y) = self.project(lat, lng);
        x.hypot(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projector_center() {
        let proj = Projector::new((52.52, 13.405));
        let (x, y) = proj.project(52.52, 13.405);
        assert!(x.abs() < 0.01);
        assert!(y.abs() < 0.01);
    }

    #[test]
    fn test_projector_1km_north() {
        let proj = Projector::new((48.137, 11.575));
        // 0.009 degrees latitude is about 1 km
        let d = proj.distance_m(48.137 + 0.009, 11.575);
        assert!((d - 1000.0).abs() < 50.0);
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        let equator = Projector::new((0.0, 0.0));
        let north = Projector::new((52.0, 0.0));
        assert!(north.distance_m(52.0, 0.01) < equator.distance_m(0.0, 0.01));
    }
}
