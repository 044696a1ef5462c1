// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use std::sync::OnceLock;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Per-client-IP limiter for the token endpoint: one request per second on
/// average with bursts of ten. Shared by every router built in-process so
/// buckets survive router rebuilds.
pub fn token_rate_limit_layer() -> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body> {
    static TOKEN_LIMITER: OnceLock<GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>> =
        OnceLock::new();

    TOKEN_LIMITER
        .get_or_init(|| {
            let mut builder = GovernorConfigBuilder::default();
            builder.per_second(1);
            builder.burst_size(10);
            let config = builder
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .expect("valid rate limit configuration");

            GovernorLayer::new(config)
        })
        .clone()
}
