use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::Credentials;

/// Foursquare category id for "Greek Restaurant"
pub const GREEK_RESTAURANT_CATEGORY: &str = "4bf58dd8d48988d10e941735";
pub const DEFAULT_LIMIT: u32 = 500;
pub const DEFAULT_API_VERSION: &str = "20180605";
pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v2";

pub const CLIENT_ID_ENV: &str = "FOURSQUARE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "FOURSQUARE_CLIENT_SECRET";

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}
fn default_category_id() -> String {
    GREEK_RESTAURANT_CATEGORY.to_string()
}
fn default_fail_fast() -> bool {
    false
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Query targets, e.g. "Munich, Germany"; takes precedence over `cities_csv`
    #[serde(default)]
    pub locations: Option<Vec<String>>,
    #[serde(default)]
    pub cities_csv: Option<PathBuf>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_category_id")]
    pub category_id: String,
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    /// Directory for the per-location GeoJSON maps
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// CSV file receiving every venue of every location
    #[serde(default)]
    pub export_csv: Option<PathBuf>,
    #[serde(default)]
    pub foursquare: Option<FoursquareConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            locations: None,
            cities_csv: None,
            limit: default_limit(),
            category_id: default_category_id(),
            fail_fast: default_fail_fast(),
            verbose: default_verbose(),
            output_dir: None,
            export_csv: None,
            foursquare: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone)]
pub struct FoursquareConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `v` parameter pinning the API behaviour
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FoursquareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
            client_id: None,
            client_secret: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for FoursquareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoursquareConfig")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl FoursquareConfig {
    /// Pick credentials, preferring explicit values (flags or environment) over the file.
    pub fn credentials(
        &self,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Credentials> {
        let client_id = client_id
            .or_else(|| self.client_id.clone())
            .filter(|s| !s.trim().is_empty());
        let client_secret = client_secret
            .or_else(|| self.client_secret.clone())
            .filter(|s| !s.trim().is_empty());

        match (client_id, client_secret) {
            (Some(id), Some(secret)) => Ok(Credentials::new(id, secret)),
            (None, _) => bail!(
                "Missing Foursquare client id: set {} or [foursquare].client_id",
                CLIENT_ID_ENV
            ),
            (_, None) => bail!(
                "Missing Foursquare client secret: set {} or [foursquare].client_secret",
                CLIENT_SECRET_ENV
            ),
        }
    }
}

impl FileConfig {
    /// Search the usual places for a config file; the first one that parses wins.
    pub fn load() -> Discovered {
        Self::load_from(&get_config_paths())
    }

    /// Try `paths` in order. Files that exist but fail to parse are skipped
    /// and reported in `warnings`; logging may not be set up yet.
    pub fn load_from(paths: &[PathBuf]) -> Discovered {
        let mut discovered = Discovered::default();

        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        discovered.config = Some(config);
                        discovered.path = Some(path.clone());
                        break;
                    }
                    Err(e) => discovered
                        .warnings
                        .push(format!("Failed to parse config file {:?}: {}", path, e)),
                }
            }
        }
        discovered
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

/// Outcome of the config file search
#[derive(Debug, Default)]
pub struct Discovered {
    pub config: Option<FileConfig>,
    pub path: Option<PathBuf>,
    pub warnings: Vec<String>,
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("venue-density.toml"));
    paths.push(PathBuf::from(".venue-density.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("venue-density").join("config.toml"));
        paths.push(config_dir.join("venue-density.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".venue-density.toml"));
    }

    paths
}
