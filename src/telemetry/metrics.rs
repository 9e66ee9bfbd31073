//! Prometheus recorder and metric descriptions

use anyhow::Context;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
pub fn install_prometheus_recorder() -> anyhow::Result<PrometheusHandle> {
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Emit HELP/TYPE lines for every metric from startup, not only after first use.
pub fn describe_metrics() {
    describe_counter!("owl_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "owl_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "owl_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );
    describe_counter!(
        "owl_tenant_resolution_total",
        "Tenant resolution outcomes (resolved/no_tenant/ambiguous)"
    );
    describe_counter!("owl_auth_login_total", "Total number of login attempts");

    gauge!("owl_http_requests_in_flight").set(0.0);
    counter!("owl_tenant_resolution_total", "outcome" => "resolved").absolute(0);
    counter!("owl_auth_login_total", "result" => "success").absolute(0);
}
