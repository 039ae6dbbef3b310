//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub root: String,

    // Directory
    pub public_dir: String,

    // Date format (Moment.js tokens)
    pub date_format: String,

    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            root: "/".to_string(),

            public_dir: "public".to_string(),

            date_format: "YYYY-MM-DD".to_string(),

            api: ApiConfig::default(),
            analytics: AnalyticsConfig::default(),
            highlight: HighlightConfig::default(),
            build: BuildConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {:?}", path.as_ref()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Apply `ENDPOINT`, `API_KEY` and `GA_TRACKING_ID` overrides
    ///
    /// The lookup is injected so callers decide where values come from;
    /// the binary passes `std::env::var`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("ENDPOINT").filter(|v| !v.is_empty()) {
            self.api.endpoint = endpoint;
        }
        if let Some(key) = lookup("API_KEY").filter(|v| !v.is_empty()) {
            self.api.api_key = key;
        }
        if let Some(id) = lookup("GA_TRACKING_ID").filter(|v| !v.is_empty()) {
            self.analytics.tracking_id = Some(id);
        }
    }

    /// Resolve the display timezone (empty means UTC)
    pub fn tz(&self) -> Result<Tz> {
        if self.timezone.is_empty() {
            return Ok(Tz::UTC);
        }
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid timezone {:?}: {}", self.timezone, e))
    }
}

/// Content API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://example.microcms.io/api/v1`
    pub endpoint: String,
    pub api_key: String,
    /// Appended as `?limit=N` to the collection request when set
    pub collection_limit: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Analytics configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub tracking_id: Option<String>,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub auto_detect: bool,
    /// Marker class added to every highlighted `code` element
    pub class_name: String,
    /// syntect theme used for the generated stylesheet
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            auto_detect: true,
            class_name: "hljs".to_string(),
            theme: "InspiredGitHub".to_string(),
        }
    }
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Maximum number of posts loaded at once
    pub concurrency: usize,
    /// Write `blogs/{id}.json` next to each page
    pub emit_data: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            emit_data: false,
        }
    }
}
