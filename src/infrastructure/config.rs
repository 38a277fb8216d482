// Configuration loading
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UiSettings {
    /// Period of the automatic refresh timer.
    pub refresh_interval_secs: u64,
    /// Where downloaded reports are saved.
    pub report_dir: String,
    /// Redraw cadence for the clock and busy indicators.
    pub redraw_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 600,
            report_dir: ".".to_string(),
            redraw_ms: 250,
        }
    }
}

/// Load `config/dashboard.toml` if present; otherwise fall back to defaults.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
