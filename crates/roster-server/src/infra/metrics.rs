use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, HistogramOpts,
    HistogramVec, IntCounterVec, IntGauge, Opts,
};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::LazyLock;
use std::time::Instant;
use tracing::warn;

use crate::config::MetricsProfile;

const PROFILE_PROD: u8 = 0;
const PROFILE_STAGING: u8 = 1;
const PROFILE_DEBUG: u8 = 2;

static METRICS_PROFILE: AtomicU8 = AtomicU8::new(PROFILE_PROD);

pub fn set_profile(profile: MetricsProfile) {
    let value = match profile {
        MetricsProfile::Prod => PROFILE_PROD,
        MetricsProfile::Staging => PROFILE_STAGING,
        MetricsProfile::Debug => PROFILE_DEBUG,
    };
    METRICS_PROFILE.store(value, Ordering::Relaxed);
}

fn active_profile() -> MetricsProfile {
    match METRICS_PROFILE.load(Ordering::Relaxed) {
        PROFILE_STAGING => MetricsProfile::Staging,
        PROFILE_DEBUG => MetricsProfile::Debug,
        _ => MetricsProfile::Prod,
    }
}

fn counter_vec_or_fallback(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    match register_int_counter_vec!(name, help, labels) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            IntCounterVec::new(Opts::new(name, help), labels).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                IntCounterVec::new(
                    Opts::new("roster_metrics_fallback", "metrics fallback"),
                    &["name"],
                )
                .expect("fallback metric")
            })
        }
    }
}

fn gauge_or_fallback(name: &str, help: &str) -> IntGauge {
    match register_int_gauge!(name, help) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            IntGauge::new(name, help).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                IntGauge::new("roster_metrics_fallback", "metrics fallback")
                    .expect("fallback metric")
            })
        }
    }
}

fn histogram_vec_or_fallback(
    name: &str,
    help: &str,
    labels: &[&str],
    buckets: Vec<f64>,
) -> HistogramVec {
    match register_histogram_vec!(name, help, labels, buckets.clone()) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            let opts = HistogramOpts::new(name, help).buckets(buckets);
            HistogramVec::new(opts, labels).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                HistogramVec::new(
                    HistogramOpts::new("roster_metrics_fallback", "metrics fallback"),
                    &["name"],
                )
                .expect("fallback metric")
            })
        }
    }
}

fn http_buckets() -> Vec<f64> {
    vec![
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]
}

static USERS_CREATED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "roster_users_created_total",
        "User create attempts",
        &["result", "source"],
    )
});

static HTTP_IN_FLIGHT: LazyLock<IntGauge> =
    LazyLock::new(|| gauge_or_fallback("roster_http_in_flight", "HTTP requests in flight"));

static HTTP_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "roster_http_requests_total",
        "HTTP requests",
        &["method", "route", "status_class"],
    )
});

static HTTP_REQUESTS_BY_STATUS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "roster_http_requests_by_status_total",
        "HTTP requests by status",
        &["method", "route", "status"],
    )
});

static HTTP_LATENCY: LazyLock<HistogramVec> = LazyLock::new(|| {
    histogram_vec_or_fallback(
        "roster_http_request_duration_seconds",
        "HTTP request latency",
        &["route"],
        http_buckets(),
    )
});

/// `source` is `api` for the JSON endpoint and `form` for the index page.
pub fn user_created(result: &str, source: &str) {
    USERS_CREATED.with_label_values(&[result, source]).inc();
}

pub async fn http_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("unmatched")
        .to_string();
    HTTP_IN_FLIGHT.inc();
    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    HTTP_IN_FLIGHT.dec();
    record_http_request(&method, &route, response.status().as_u16(), elapsed);
    response
}

pub fn record_http_request(method: &str, route: &str, status: u16, duration_seconds: f64) {
    let status_class = match status / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "unknown",
    };
    HTTP_REQUESTS
        .with_label_values(&[method, route, status_class])
        .inc();
    HTTP_LATENCY
        .with_label_values(&[route])
        .observe(duration_seconds);

    match active_profile() {
        MetricsProfile::Prod => {}
        MetricsProfile::Staging | MetricsProfile::Debug => {
            let status_label = status.to_string();
            HTTP_REQUESTS_BY_STATUS
                .with_label_values(&[method, route, &status_label])
                .inc();
        }
    }
}
