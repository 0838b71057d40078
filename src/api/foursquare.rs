use anyhow::Context;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::config::FoursquareConfig;
use crate::domain::Location;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("venue-density/", env!("CARGO_PKG_VERSION"));

/// Foursquare app credentials
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// What to ask for in each explore request
#[derive(Debug, Clone)]
pub struct VenueQuery {
    /// Maximum number of venues returned per location
    pub limit: u32,
    /// Foursquare category id, e.g. Greek restaurant
    pub category_id: String,
}

/// Top-level body of `GET /v2/venues/explore`
#[derive(Debug, Deserialize)]
pub struct ExploreResponse {
    #[serde(default)]
    pub meta: Option<Meta>,
    pub response: ExploreBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub code: u16,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error_detail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreBody {
    #[serde(default)]
    pub total_results: Option<u32>,
    #[serde(default)]
    pub geocode: Option<Geocode>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// One recommended item; only the venue part is read
#[derive(Debug, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub venue: Option<RawVenue>,
}

#[derive(Debug, Deserialize)]
pub struct RawVenue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<RawLocation>,
}

#[derive(Debug, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Geocode {
    #[serde(default)]
    pub geometry: Option<GeocodeGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeGeometry {
    #[serde(default)]
    pub bounds: Option<GeocodeBounds>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct GeocodeBounds {
    pub ne: LatLng,
    pub sw: LatLng,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl ExploreResponse {
    /// Items of the first result group, the only one the explore endpoint fills
    pub fn items(&self) -> &[Item] {
        self.response
            .groups
            .first()
            .map(|g| g.items.as_slice())
            .unwrap_or_default()
    }

    pub fn bounds(&self) -> Option<GeocodeBounds> {
        self.response
            .geocode
            .as_ref()
            .and_then(|g| g.geometry.as_ref())
            .and_then(|g| g.bounds)
    }
}

/// Blocking client for the Foursquare v2 explore endpoint
#[derive(Debug)]
pub struct PlacesClient {
    http: reqwest::blocking::Client,
    base_url: String,
    version: String,
    credentials: Credentials,
}

impl PlacesClient {
    pub fn new(config: &FoursquareConfig, credentials: Credentials) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            version: config.version.clone(),
            credentials,
        })
    }

    fn explore_url(&self) -> String {
        format!("{}/venues/explore", self.base_url)
    }

    /// Issue one explore query for `location`.
    ///
    /// No retry and no pagination: whatever the single capped request
    /// returns is the result for this location.
    pub fn explore(
        &self,
        location: &Location,
        query: &VenueQuery,
    ) -> Result<ExploreResponse, FetchError> {
        let limit = query.limit.to_string();

        tracing::debug!(%location, limit = query.limit, category = %query.category_id, "explore request");

        let response = self
            .http
            .get(self.explore_url())
            .query(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("v", self.version.as_str()),
                ("near", location.name()),
                ("limit", limit.as_str()),
                ("categoryId", query.category_id.as_str()),
            ])
            .send()
            .map_err(|source| FetchError::Transport {
                location: location.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| FetchError::Transport {
            location: location.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                location: location.clone(),
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let parsed: ExploreResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
                location: location.clone(),
                reason: e.to_string(),
            })?;

        if parsed.response.groups.is_empty() {
            return Err(FetchError::Malformed {
                location: location.clone(),
                reason: "missing response.groups[0].items".to_string(),
            });
        }

        Ok(parsed)
    }
}

/// Best-effort description of a failed request from the body's `meta` block
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        meta: Meta,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { meta }) => match (meta.error_type, meta.error_detail) {
            (Some(t), Some(d)) => format!("{}: {}", t, d),
            (Some(t), None) => t,
            (None, Some(d)) => d,
            (None, None) => format!("meta code {}", meta.code),
        },
        Err(_) => "no error detail".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> PlacesClient {
        let config = FoursquareConfig {
            base_url: server.url("/v2"),
            ..FoursquareConfig::default()
        };
        PlacesClient::new(&config, Credentials::new("ID", "SECRET")).unwrap()
    }

    fn query() -> VenueQuery {
        VenueQuery {
            limit: 500,
            category_id: "4bf58dd8d48988d10e941735".to_string(),
        }
    }

    #[test]
    fn test_parse_explore_response() {
        let json = r#"{
            "meta": {"code": 200},
            "response": {
                "totalResults": 146,
                "geocode": {"geometry": {"bounds": {
                    "ne": {"lat": 52.67, "lng": 13.76},
                    "sw": {"lat": 52.33, "lng": 13.08}
                }}},
                "groups": [{"items": [
                    {"venue": {"name": "Taverna Athene", "location": {"address": "Hauptstr. 1", "lat": 52.5, "lng": 13.4}}}
                ]}]
            }
        }"#;

        let parsed: ExploreResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.response.total_results, Some(146));
        assert_eq!(parsed.items().len(), 1);
        let bounds = parsed.bounds().unwrap();
        assert_eq!(bounds.ne.lat, 52.67);
        assert_eq!(bounds.sw.lng, 13.08);
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("my-id", "top-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("my-id"));
        assert!(!debug.contains("top-secret"));
    }

    #[test]
    fn test_explore_sends_query_parameters() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/venues/explore")
                .query_param("client_id", "ID")
                .query_param("client_secret", "SECRET")
                .query_param("v", "20180605")
                .query_param("near", "Berlin, Germany")
                .query_param("limit", "500")
                .query_param("categoryId", "4bf58dd8d48988d10e941735");
            then.status(200).json_body(json!({
                "meta": {"code": 200},
                "response": {"totalResults": 0, "groups": [{"items": []}]}
            }));
        });

        let client = client_for(&server);
        let result = client.explore(&Location::new("Berlin, Germany"), &query());

        m.assert();
        let response = result.unwrap();
        assert!(response.items().is_empty());
        assert_eq!(response.response.total_results, Some(0));
    }

    #[test]
    fn test_explore_error_status() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/v2/venues/explore");
            then.status(400).json_body(json!({
                "meta": {"code": 400, "errorType": "failed_geocode", "errorDetail": "Couldn't geocode param near: Atlantis"}
            }));
        });

        let client = client_for(&server);
        let err = client
            .explore(&Location::new("Atlantis"), &query())
            .unwrap_err();

        m.assert();
        match err {
            FetchError::Status { status, detail, .. } => {
                assert_eq!(status, 400);
                assert!(detail.starts_with("failed_geocode"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_explore_missing_groups_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/venues/explore");
            then.status(200)
                .json_body(json!({"meta": {"code": 200}, "response": {}}));
        });

        let client = client_for(&server);
        let err = client
            .explore(&Location::new("Berlin, Germany"), &query())
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[test]
    fn test_explore_non_json_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/venues/explore");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = client_for(&server);
        let err = client
            .explore(&Location::new("Berlin, Germany"), &query())
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
        assert_eq!(err.location().name(), "Berlin, Germany");
    }

    #[test]
    fn test_explore_unreachable_is_transport() {
        let config = FoursquareConfig {
            base_url: "http://127.0.0.1:1/v2".to_string(),
            timeout_secs: 2,
            ..FoursquareConfig::default()
        };
        let client = PlacesClient::new(&config, Credentials::new("ID", "SECRET")).unwrap();
        let err = client
            .explore(&Location::new("Berlin, Germany"), &query())
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
