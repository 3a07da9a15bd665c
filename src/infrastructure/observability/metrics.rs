//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("numeric segment pattern is valid"));

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("versioned_users_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            let path = config.route_path();
            tracing::info!("Prometheus metrics initialized at {}", path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path,
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// How an update attempt ended at commit time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Committed,
    Conflict,
}

impl UpdateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::Conflict => "conflict",
        }
    }
}

/// Record the outcome of a user update commit
pub fn record_user_update(outcome: UpdateOutcome) {
    counter!("user_updates_total", "outcome" => outcome.as_str()).increment(1);
}

const MAX_PATH_LABEL_CHARS: usize = 50;

/// Replace numeric IDs with a placeholder to bound label cardinality
fn sanitize_path(path: &str) -> String {
    let path = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");

    // Cut on a char boundary, unmatched paths arrive raw from the client
    let end = path
        .char_indices()
        .nth(MAX_PATH_LABEL_CHARS)
        .map_or(path.len(), |(i, _)| i);

    path[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/user/123/edit"), "/user/{id}/edit");
        assert_eq!(sanitize_path("/user/42"), "/user/{id}");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/users"), "/users");
        assert_eq!(sanitize_path("/"), "/");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }

    #[test]
    fn test_sanitize_path_truncates_on_char_boundary() {
        let path = format!("/{}é/more", "a".repeat(48));

        let label = sanitize_path(&path);
        assert_eq!(label.chars().count(), 50);
        assert!(label.ends_with('é'));
    }

    #[test]
    fn test_update_outcome_labels() {
        assert_eq!(UpdateOutcome::Committed.as_str(), "committed");
        assert_eq!(UpdateOutcome::Conflict.as_str(), "conflict");
    }
}
