use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;

        describe_counter!("taste_reviews_analyzed_total", "Reviews scored by the sentiment engine.");
        describe_counter!("taste_row_failures_total", "Rows reported as failed during analysis.");
        describe_counter!("taste_recommend_requests_total", "Ranking requests served.");
        describe_counter!(
            "taste_index_build_failures_total",
            "Content index builds that failed."
        );
        describe_histogram!("taste_analyze_ms", "Sentiment batch time in milliseconds.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
