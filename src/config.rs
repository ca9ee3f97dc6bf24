//! Configuration management for srpa using the prefer crate.

use serde::{Deserialize, Serialize};

use crate::highlight::HighlightConfig;
use crate::query::DEFAULT_SEARCH_PATH;

/// Default bind address for `srpa serve`.
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path of the search endpoint derived links point at.
    pub search_path: String,
    /// HTML tag wrapping highlighted terms.
    pub highlight_tag: String,
    /// CSS class for highlight tags.
    pub highlight_class: Option<String>,
    /// Whether term matching is case sensitive.
    pub highlight_case_sensitive: bool,
    /// Host the adapter server binds to.
    pub host: String,
    /// Port the adapter server binds to.
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            highlight_tag: "mark".to_string(),
            highlight_class: None,
            highlight_case_sensitive: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// Highlighter configuration derived from these settings.
    pub fn highlight_config(&self) -> HighlightConfig {
        let config = HighlightConfig::new()
            .tag(self.highlight_tag.clone())
            .case_sensitive(self.highlight_case_sensitive);
        match self.highlight_class {
            Some(ref class) => config.css_class(class.clone()),
            None => config,
        }
    }

    /// Set the search endpoint path. Links are absolute paths on the same host.
    pub fn set_search_path(&mut self, path: &str) {
        self.search_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search endpoint path (e.g. "/buscar").
    #[serde(default)]
    pub search_path: Option<String>,
    #[serde(default)]
    pub highlight_tag: Option<String>,
    #[serde(default)]
    pub highlight_class: Option<String>,
    #[serde(default)]
    pub highlight_case_sensitive: Option<bool>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers srpa config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("srpa").await {
            Ok(pref_config) => {
                let search_path: Option<String> = pref_config.get("search_path").ok();
                let highlight_tag: Option<String> = pref_config.get("highlight_tag").ok();
                let highlight_class: Option<String> =
                    pref_config.get("highlight_class").ok();
                let highlight_case_sensitive: Option<bool> =
                    pref_config.get("highlight_case_sensitive").ok();
                let host: Option<String> = pref_config.get("host").ok();
                let port: Option<u16> = pref_config.get("port").ok();

                Config {
                    search_path,
                    highlight_tag,
                    highlight_class,
                    highlight_case_sensitive,
                    host,
                    port,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref path) = self.search_path {
            settings.set_search_path(path);
        }
        if let Some(ref tag) = self.highlight_tag {
            settings.highlight_tag = tag.clone();
        }
        if let Some(ref class) = self.highlight_class {
            settings.highlight_class = Some(class.clone());
        }
        if let Some(case_sensitive) = self.highlight_case_sensitive {
            settings.highlight_case_sensitive = case_sensitive;
        }
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
    }
}

/// Load settings from configuration (async version).
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search_path, "/search");
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.highlight_config().opening_tag(), "<mark>");
    }

    #[test]
    fn test_set_search_path_adds_leading_slash() {
        let mut settings = Settings::default();
        settings.set_search_path("buscar");
        assert_eq!(settings.search_path, "/buscar");

        settings.set_search_path("/consultas/buscar");
        assert_eq!(settings.search_path, "/consultas/buscar");
    }

    #[test]
    fn test_apply_to_settings() {
        let config = Config {
            search_path: Some("buscar".to_string()),
            highlight_tag: Some("em".to_string()),
            highlight_class: Some("hit".to_string()),
            port: Some(9000),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.search_path, "/buscar");
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(
            settings.highlight_config().opening_tag(),
            "<em class=\"hit\">"
        );
    }

    #[test]
    fn test_empty_config_keeps_defaults() {
        let mut settings = Settings::default();
        Config::default().apply_to_settings(&mut settings);
        assert_eq!(settings.search_path, "/search");
        assert!(settings.highlight_class.is_none());
    }
}
