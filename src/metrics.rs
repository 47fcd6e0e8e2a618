//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{IntCounter, Registry};

/// Registry shared between the HTTP middleware and domain counters.
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Total player rows created (first authenticated contact).
pub static PLAYERS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    let c = IntCounter::new("players_created_total", "Player rows created")
        .expect("counter definition");
    REGISTRY.register(Box::new(c.clone())).ok();
    c
});

/// Total successful daily-reward claims.
pub static DAILY_CLAIMS: Lazy<IntCounter> = Lazy::new(|| {
    let c = IntCounter::new("daily_claims_total", "Daily rewards claimed")
        .expect("counter definition");
    REGISTRY.register(Box::new(c.clone())).ok();
    c
});

/// Global Prometheus handle reused in tests.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("api")
        .registry(REGISTRY.clone())
        .endpoint("/metrics") // exposed URL
        .build()
        .expect("metrics builder")
});
