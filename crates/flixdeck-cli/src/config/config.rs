//! `AppConfig` struct and TOML loading.

use std::path::Path;

use anyhow::{Context, Result};
use flixdeck_api::catalog::{DEFAULT_IMAGE_DOMAIN, ShowRequest};
use flixdeck_api::tmdb::{MediaType, RequestType, TmdbRequest};
use serde::Deserialize;

/// Environment variable holding the TMDB bearer token.
pub const ENV_TOKEN: &str = "TMDB_TOKEN";
/// Environment variable holding the TMDB API key.
pub const ENV_API_KEY: &str = "TMDB_API_KEY";
/// Environment variable overriding the image CDN domain.
pub const ENV_IMAGE_DOMAIN: &str = "IMAGE_DOMAIN";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB credentials and CDN settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Custom sections for `shows`; the home preset is used when empty.
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

/// TMDB configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Bearer token.
    #[serde(default)]
    pub api_token: Option<String>,
    /// API key used when the bearer token is rejected.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Image CDN domain.
    #[serde(default)]
    pub image_domain: Option<String>,
}

impl TmdbConfig {
    /// Overlays values found through `lookup` (normally the process
    /// environment). Empty values are ignored.
    #[must_use]
    pub fn with_env(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_token: var(ENV_TOKEN).or(self.api_token),
            api_key: var(ENV_API_KEY).or(self.api_key),
            image_domain: var(ENV_IMAGE_DOMAIN).or(self.image_domain),
        }
    }

    /// Image CDN domain, falling back to `image.tmdb.org`.
    #[must_use]
    pub fn image_domain(&self) -> &str {
        self.image_domain.as_deref().unwrap_or(DEFAULT_IMAGE_DOMAIN)
    }
}

/// One `[[sections]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SectionConfig {
    /// Section title.
    pub title: String,
    /// Request type wire name (for example `TOP_RATED`).
    pub request_type: RequestType,
    /// `movie`, `tv` or `anime`.
    pub media_type: MediaType,
    /// Result page.
    #[serde(default)]
    pub page: Option<u32>,
    /// TMDB genre id.
    #[serde(default)]
    pub genre: Option<u32>,
    /// Whether the section is displayed.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

const fn default_visible() -> bool {
    true
}

impl SectionConfig {
    /// Converts the entry to a catalog section request.
    #[must_use]
    pub fn to_show_request(&self) -> ShowRequest {
        let req = TmdbRequest {
            page: self.page,
            genre: self.genre,
            ..TmdbRequest::new(self.request_type, self.media_type)
        };
        let request = ShowRequest::new(self.title.clone(), req);
        if self.visible { request } else { request.hidden() }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Section requests from `[[sections]]`, in file order.
    #[must_use]
    pub fn show_requests(&self) -> Vec<ShowRequest> {
        self.sections
            .iter()
            .map(SectionConfig::to_show_request)
            .collect()
    }
}
