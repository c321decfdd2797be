//! Configuration for the TradeGateway

use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use trade_engine::ClassifierConfig;

/// Main configuration for the TradeGateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Item catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Fairness thresholds
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Largest accepted request body in bytes
    pub max_body_bytes: u64,
}

/// Where the item catalog comes from
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON catalog file; the bundled catalog is used when unset
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "trade_gateway=debug"
    pub level: String,

    /// "text", "pretty" or "json"
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080, max_body_bytes: 16 * 1024 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "text".to_string() }
    }
}

impl GatewayConfig {
    /// Get the server address
    pub fn server_addr(&self) -> GatewayResult<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| GatewayError::Config(format!("invalid server address: {e}")))
    }

    /// Load configuration from file
    pub fn load_from_file(path: &str) -> GatewayResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GatewayConfig =
            toml::from_str(&content).map_err(|e| GatewayError::Config(e.to_string()))?;
        config.classifier.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &str) -> GatewayResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| GatewayError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env(self) -> GatewayResult<Self> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup
    pub fn with_env_overrides<F>(mut self, var: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("TRADE_HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("TRADE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| GatewayError::Config(format!("TRADE_PORT is not a port: '{port}'")))?;
        }

        if let Some(path) = var("TRADE_CATALOG_PATH") {
            self.catalog.path = Some(path);
        }

        if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }

        self.classifier = self.classifier.with_env_overrides(&var)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trade_engine::ThresholdModel;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.server_addr().unwrap().port(), 8080);
        assert!(config.catalog.path.is_none());
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = GatewayConfig::default()
            .with_env_overrides(|key| match key {
                "TRADE_PORT" => Some("9090".to_string()),
                "TRADE_CATALOG_PATH" => Some("data/items.json".to_string()),
                "TRADE_THRESHOLD_MODEL" => Some("absolute".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.catalog.path.as_deref(), Some("data/items.json"));
        assert_eq!(config.classifier.model, ThresholdModel::legacy_absolute());
    }

    #[test]
    fn test_bad_port_rejected() {
        let result = GatewayConfig::default().with_env_overrides(|key| {
            (key == "TRADE_PORT").then(|| "eighty".to_string())
        });
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"
            [server]
            host = "127.0.0.1"
            port = 3000
            max_body_bytes = 4096

            [classifier.model]
            kind = "absolute"
            fair = 50000000
            win = 200000000
            huge_loss = 99999999
            "#,
        )
        .unwrap();

        let config = GatewayConfig::load_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.classifier.model, ThresholdModel::legacy_absolute());
    }

    #[test]
    fn test_save_and_reload() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();

        let mut config = GatewayConfig::default();
        config.catalog.path = Some("catalog.json".to_string());
        config.save_to_file(path).unwrap();

        let loaded = GatewayConfig::load_from_file(path).unwrap();
        assert_eq!(loaded.catalog.path, config.catalog.path);
        assert_eq!(loaded.classifier, config.classifier);
    }
}
