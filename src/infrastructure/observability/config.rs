//! Observability configuration, the `[observability.*]` sections

use serde::Deserialize;

/// `[observability]` section
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// OTLP span export; logging itself is configured under `[logging]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// gRPC collector endpoint
    pub otlp_endpoint: String,
    pub service_name: String,
    /// Fraction of traces kept, 0.0 to 1.0
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            sampling_ratio: 1.0,
        }
    }
}

/// Prometheus scrape endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl MetricsConfig {
    /// Configured path as an axum route, always rooted at `/`
    pub fn route_path(&self) -> String {
        let trimmed = self.path.trim();

        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use ::config::{Config, File, FileFormat};

    #[test]
    fn test_shipped_defaults_match_code_defaults() {
        let shipped: AppConfig = Config::builder()
            .add_source(File::from_str(
                include_str!("../../../config/default.toml"),
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        let coded = ObservabilityConfig::default();

        assert_eq!(shipped.observability.tracing.enabled, coded.tracing.enabled);
        assert_eq!(shipped.observability.tracing.service_name, "versioned-users");
        assert_eq!(shipped.observability.tracing.service_name, coded.tracing.service_name);
        assert_eq!(shipped.observability.metrics.path, coded.metrics.path);
        assert_eq!(shipped.users.update_delay_ms, 5000);
    }

    #[test]
    fn test_partial_tracing_section() {
        let config: TracingConfig =
            serde_json::from_str(r#"{"enabled": true, "sampling_ratio": 0.25}"#).unwrap();

        assert!(config.enabled);
        assert_eq!(config.sampling_ratio, 0.25);
        assert_eq!(config.otlp_endpoint, "http://localhost:4317");
    }

    #[test]
    fn test_route_path_is_rooted() {
        let config: MetricsConfig = serde_json::from_str(r#"{"path": "prometheus"}"#).unwrap();

        assert!(config.enabled);
        assert_eq!(config.route_path(), "/prometheus");
        assert_eq!(MetricsConfig::default().route_path(), "/metrics");
    }
}
