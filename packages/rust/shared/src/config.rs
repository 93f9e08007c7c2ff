//! Application configuration for SiteGraph.
//!
//! User config lives at `~/.sitegraph/sitegraph.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteGraphError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitegraph.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitegraph";

// ---------------------------------------------------------------------------
// Config structs (matching sitegraph.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Sitemap priorities and change frequencies.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Path to the business profile TOML file.
    #[serde(default = "default_profile_path")]
    pub profile_path: String,

    /// Pretty-print JSON output.
    #[serde(default)]
    pub pretty: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            profile_path: default_profile_path(),
            pretty: false,
        }
    }
}

fn default_profile_path() -> String {
    "profile.toml".into()
}

/// How often a sitemap URL is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// The lowercase token used in sitemap documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// `[sitemap]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Priority of the site root.
    #[serde(default = "default_home_priority")]
    pub home_priority: f32,

    /// Priority of productized offering pages (`/systems/{slug}`).
    #[serde(default = "default_offering_priority")]
    pub offering_priority: f32,

    /// Priority of featured project case studies.
    #[serde(default = "default_featured_project_priority")]
    pub featured_project_priority: f32,

    /// Priority of other project case studies.
    #[serde(default = "default_project_priority")]
    pub project_priority: f32,

    /// Priority of static pages and tools.
    #[serde(default = "default_page_priority")]
    pub page_priority: f32,

    /// Change frequency of the site root.
    #[serde(default = "default_home_frequency")]
    pub home_change_frequency: ChangeFrequency,

    /// Change frequency of every other page.
    #[serde(default = "default_page_frequency")]
    pub page_change_frequency: ChangeFrequency,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            home_priority: default_home_priority(),
            offering_priority: default_offering_priority(),
            featured_project_priority: default_featured_project_priority(),
            project_priority: default_project_priority(),
            page_priority: default_page_priority(),
            home_change_frequency: default_home_frequency(),
            page_change_frequency: default_page_frequency(),
        }
    }
}

fn default_home_priority() -> f32 {
    1.0
}
fn default_offering_priority() -> f32 {
    0.8
}
fn default_featured_project_priority() -> f32 {
    0.9
}
fn default_project_priority() -> f32 {
    0.7
}
fn default_page_priority() -> f32 {
    0.6
}
fn default_home_frequency() -> ChangeFrequency {
    ChangeFrequency::Weekly
}
fn default_page_frequency() -> ChangeFrequency {
    ChangeFrequency::Monthly
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitegraph/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SiteGraphError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitegraph/sitegraph.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteGraphError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        SiteGraphError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_sitemap(&config.sitemap)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SiteGraphError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config)
        .map_err(|e| SiteGraphError::Serialization(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SiteGraphError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Sitemap priorities must lie in `0.0..=1.0`.
fn validate_sitemap(sitemap: &SitemapConfig) -> Result<()> {
    let priorities = [
        ("home_priority", sitemap.home_priority),
        ("offering_priority", sitemap.offering_priority),
        ("featured_project_priority", sitemap.featured_project_priority),
        ("project_priority", sitemap.project_priority),
        ("page_priority", sitemap.page_priority),
    ];
    for (name, value) in priorities {
        if !(0.0..=1.0).contains(&value) {
            return Err(SiteGraphError::config(format!(
                "sitemap.{name} must be between 0.0 and 1.0, got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("profile_path"));
        assert!(toml_str.contains("home_priority"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.profile_path, "profile.toml");
        assert_eq!(parsed.sitemap.home_change_frequency, ChangeFrequency::Weekly);
        assert!((parsed.sitemap.featured_project_priority - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
profile_path = "/srv/site/profile.toml"

[sitemap]
project_priority = 0.5
page_change_frequency = "yearly"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.profile_path, "/srv/site/profile.toml");
        assert!(!config.defaults.pretty);
        assert!((config.sitemap.project_priority - 0.5).abs() < f32::EPSILON);
        assert!((config.sitemap.home_priority - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.sitemap.page_change_frequency, ChangeFrequency::Yearly);
    }

    #[test]
    fn out_of_range_priority_rejected() {
        let dir = std::env::temp_dir().join(format!("sg-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sitegraph.toml");
        std::fs::write(&path, "[sitemap]\nhome_priority = 1.5\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("sitemap.home_priority"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn change_frequency_tokens() {
        assert_eq!(ChangeFrequency::Weekly.as_str(), "weekly");
        assert_eq!(ChangeFrequency::Never.as_str(), "never");
    }
}
