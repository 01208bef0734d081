use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "FOLIO";

/// Where the feeds live. Every field can be overridden with a `FOLIO_*`
/// environment variable, e.g. `FOLIO_SHEET_ID`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub sheet_id: String,
    pub projects_sheet: String,
    pub content_sheet: String,
    pub footer_sheet: String,
    pub static_projects: PathBuf,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://docs.google.com".to_string(),
            sheet_id: "10Ze__9S_rwj_HWnJEMH-pArREc_XheP5NCJNohJVtkc".to_string(),
            projects_sheet: "Sheet1".to_string(),
            content_sheet: "Content".to_string(),
            footer_sheet: "Footer".to_string(),
            static_projects: PathBuf::from("projects.json"),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Result<Self> {
        // `::config` is the crate, not this module.
        let settings = ::config::Config::builder()
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Visualization export URL for one sheet tab.
    pub fn export_url(&self, sheet: &str, format: ExportFormat) -> String {
        format!(
            "{}/spreadsheets/d/{}/gviz/tq?tqx=out:{}&sheet={}",
            self.base_url.trim_end_matches('/'),
            self.sheet_id,
            format.as_str(),
            sheet
        )
    }
}
