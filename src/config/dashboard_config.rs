use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;

/// Dashboard runtime configuration, loaded from a TOML file with sensible
/// local defaults. Environment variables override the file so deployments
/// can repoint paths without editing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Path of the order-line CSV to ingest.
    pub input_csv: String,
    /// Where the rendered dashboard page is written.
    pub output_html: String,
    /// Page title shown in the header and the browser tab.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "Sales Dashboard".to_string()
}

impl DashboardConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        let mut config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// `DASHBOARD_INPUT_CSV` and `DASHBOARD_OUTPUT_HTML` take precedence
    /// over whatever the file says.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("DASHBOARD_INPUT_CSV") {
            if !path.trim().is_empty() {
                self.input_csv = path;
            }
        }
        if let Ok(path) = env::var("DASHBOARD_OUTPUT_HTML") {
            if !path.trim().is_empty() {
                self.output_html = path;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_csv.trim().is_empty() {
            bail!("input_csv must not be empty");
        }
        if self.output_html.trim().is_empty() {
            bail!("output_html must not be empty");
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input_csv: "data/orders.csv".to_string(),
            output_html: "out/dashboard.html".to_string(),
            title: default_title(),
        }
    }
}
