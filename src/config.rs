use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::info;
use scraper::Selector;
use serde::Deserialize;
use crate::error::ConfigError;

pub const DEFAULT_URL: &str = "https://www.cde.ca.gov/SchoolDirectory/";
pub const DEFAULT_SKIP_FILE: &str = "skipped_items.txt";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub columns: ColumnMapping,
    pub browser: BrowserConfig,
    pub delays: DelayConfig,
    pub skip_file: PathBuf,
    /// Where the updated table goes. `None` rewrites the input in place.
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            site: SiteConfig::default(),
            columns: ColumnMapping::default(),
            browser: BrowserConfig::default(),
            delays: DelayConfig::default(),
            skip_file: PathBuf::from(DEFAULT_SKIP_FILE),
            output: None,
        }
    }
}

/// Everything that ties the scraper to one directory website.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub url: String,
    pub search_field_selector: String,
    pub result_link_selector: String,
    pub detail_title_selector: String,
    pub field_label_selector: String,
    /// Detail-page field labels tried in order; the first one with a name wins.
    pub contact_labels: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            url: DEFAULT_URL.to_string(),
            search_field_selector: "#AllSearchField".to_string(),
            result_link_selector: "table.table-bordered tbody tr td a".to_string(),
            detail_title_selector: "h1.page-title".to_string(),
            field_label_selector: "th.details-field-label".to_string(),
            contact_labels: vec![
                "Superintendent".to_string(),
                "Chief Business Official".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnMapping {
    pub district: String,
    pub name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            district: "District Name".to_string(),
            name: "Contact Name".to_string(),
            job_title: "Contact Job Title".to_string(),
            email: "Contact Email".to_string(),
            phone: "Contact Phone Number".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Contact columns in write order: name, title, email, phone.
    pub fn contact_columns(&self) -> [&str; 4] {
        [&self.name, &self.job_title, &self.email, &self.phone]
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub element_timeout_secs: u64,
    /// Pause after submitting a search so the results finish rendering.
    pub settle_millis: u64,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig {
            headless: false,
            element_timeout_secs: 10,
            settle_millis: 2000,
            window_width: 1280,
            window_height: 900,
        }
    }
}

impl BrowserConfig {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DelayConfig {
    pub between_items_millis: u64,
    /// Random extra wait added on top, up to this many milliseconds.
    pub jitter_millis: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        DelayConfig {
            between_items_millis: 2000,
            jitter_millis: 1000,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, &str); 6] = [
            ("site.url", &self.site.url),
            ("columns.district", &self.columns.district),
            ("columns.name", &self.columns.name),
            ("columns.job_title", &self.columns.job_title),
            ("columns.email", &self.columns.email),
            ("columns.phone", &self.columns.phone),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(key));
            }
        }
        if self.site.contact_labels.iter().all(|l| l.trim().is_empty()) {
            return Err(ConfigError::Empty("site.contact_labels"));
        }

        for sel in [
            &self.site.search_field_selector,
            &self.site.result_link_selector,
            &self.site.detail_title_selector,
            &self.site.field_label_selector,
        ] {
            if Selector::parse(sel).is_err() {
                return Err(ConfigError::Selector(sel.clone()));
            }
        }
        Ok(())
    }
}
