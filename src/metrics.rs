//! Prometheus metrics for launcher observability.
//!
//! ## Exposed Metrics
//!
//! All metrics are prefixed with `honey_`:
//!
//! - `honey_match_queries_total` - Queries evaluated by the matcher (counter)
//! - `honey_match_results_total` - Matches produced, by strategy (counter)
//! - `honey_match_duration_seconds` - Matcher latency (histogram)
//! - `honey_plugins_registered` - Plugins in the registry (gauge)
//! - `honey_plugin_executions_total` - Plugin executions, by outcome (counter)

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::plugin::MatchResult;

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Prefix for all metric names (default: "honey")
    pub prefix: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            prefix: "honey".to_string(),
        }
    }
}

/// Metric names with configurable prefix.
#[derive(Debug, Clone)]
pub struct MetricNames {
    pub match_queries: String,
    pub match_results: String,
    pub match_duration: String,
    pub plugins_registered: String,
    pub plugin_executions: String,
}

impl MetricNames {
    /// Create metric names with the given prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            match_queries: format!("{}_match_queries_total", prefix),
            match_results: format!("{}_match_results_total", prefix),
            match_duration: format!("{}_match_duration_seconds", prefix),
            plugins_registered: format!("{}_plugins_registered", prefix),
            plugin_executions: format!("{}_plugin_executions_total", prefix),
        }
    }
}

impl Default for MetricNames {
    fn default() -> Self {
        Self::with_prefix("honey")
    }
}

/// Prometheus metrics service.
pub struct MetricsService {
    names: MetricNames,
    handle: Option<PrometheusHandle>,
}

impl MetricsService {
    /// Create a new metrics service with the given configuration.
    ///
    /// This installs a global Prometheus recorder. Only one can be installed
    /// per process; if one already exists, metrics go to that recorder and
    /// `render` returns an empty string.
    pub fn new(config: MetricsConfig) -> Self {
        let names = MetricNames::with_prefix(&config.prefix);
        let handle = PrometheusBuilder::new().install_recorder().ok();

        let service = Self { names, handle };
        service.register_descriptions();
        service
    }

    /// Create a metrics service with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MetricsConfig::default())
    }

    /// Create a metrics service that installs no recorder (for testing).
    pub fn disabled() -> Self {
        Self {
            names: MetricNames::default(),
            handle: None,
        }
    }

    /// Check if a recorder was installed by this service.
    pub fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }

    /// Render metrics in Prometheus exposition format.
    pub fn render(&self) -> String {
        self.handle.as_ref().map(|h| h.render()).unwrap_or_default()
    }

    /// Get metric names.
    pub fn names(&self) -> &MetricNames {
        &self.names
    }

    fn register_descriptions(&self) {
        describe_counter!(
            self.names.match_queries.clone(),
            "Total number of queries evaluated by the matcher"
        );
        describe_counter!(
            self.names.match_results.clone(),
            "Total number of plugin matches produced"
        );
        describe_histogram!(
            self.names.match_duration.clone(),
            "Matcher evaluation time in seconds"
        );
        describe_gauge!(
            self.names.plugins_registered.clone(),
            "Number of plugins in the registry"
        );
        describe_counter!(
            self.names.plugin_executions.clone(),
            "Total number of plugin executions"
        );
    }

    /// Record one matcher evaluation.
    pub fn match_evaluated(&self, results: &[MatchResult], duration_secs: f64) {
        counter!(self.names.match_queries.clone()).increment(1);
        histogram!(self.names.match_duration.clone()).record(duration_secs);

        for result in results {
            let labels = [("type", result.match_type.as_str().to_string())];
            counter!(self.names.match_results.clone(), &labels).increment(1);
        }
    }

    /// Update the registered plugin count.
    pub fn plugins_registered(&self, count: usize) {
        gauge!(self.names.plugins_registered.clone()).set(count as f64);
    }

    /// Record a plugin execution.
    pub fn plugin_executed(&self, plugin_id: &str, success: bool) {
        let labels = [
            ("plugin", plugin_id.to_string()),
            ("outcome", if success { "ok" } else { "error" }.to_string()),
        ];
        counter!(self.names.plugin_executions.clone(), &labels).increment(1);
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::disabled()
    }
}
