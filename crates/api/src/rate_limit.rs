//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Per-IP request limiting via tower_governor, without background processes.

use std::sync::Arc;

use governor::middleware::StateInformationMiddleware;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

use crate::config::RateLimitSettings;

/// Governor config keyed by peer IP, with X-RateLimit-* response headers
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Build a governor config from the configured settings.
///
/// The service must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()` so the peer IP is
/// available for key extraction.
pub fn create_governor_config(settings: &RateLimitSettings) -> Arc<DefaultGovernorConfig> {
    Arc::new(
        GovernorConfigBuilder::default()
            .per_second(settings.per_second)
            .burst_size(settings.burst_size)
            .use_headers()
            .finish()
            .expect("rate limit settings must be non-zero"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = RateLimitSettings::default();
        assert_eq!(settings.per_second, 2);
        assert_eq!(settings.burst_size, 5);
    }

    #[test]
    fn test_create_governor_config() {
        let governor = create_governor_config(&RateLimitSettings::default());
        assert!(Arc::strong_count(&governor) > 0);
    }
}
