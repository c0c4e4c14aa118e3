//! Telemetry metric name constants.
//!
//! Centralised metric names for mythweaver operations. The `mythd` binary
//! does not install an exporter; embedders install their own `metrics`
//! recorder (e.g. prometheus, statsd). Without a recorder installed, all
//! metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mythweaver_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `outcome`: "success", "degraded", "failed" or "cached"
//! - `stage`: where a fallback was triggered ("parse" | "transport")

/// Total myth requests handled by the service.
///
/// Labels: `outcome` ("success" | "degraded" | "failed" | "cached").
pub const REQUESTS_TOTAL: &str = "mythweaver_requests_total";

/// Wall-clock duration of a generation run, in seconds. Cache hits are not
/// recorded.
///
/// Labels: `outcome`.
pub const GENERATION_DURATION_SECONDS: &str = "mythweaver_generation_duration_seconds";

/// Total strict-prompt retries after a first-attempt parse failure.
pub const RETRIES_TOTAL: &str = "mythweaver_retries_total";

/// Total fallback artifacts served.
///
/// Labels: `stage` ("parse" | "transport").
pub const FALLBACKS_TOTAL: &str = "mythweaver_fallbacks_total";

/// Total scenarios rejected by the moderation provider.
pub const MODERATION_REJECTIONS_TOTAL: &str = "mythweaver_moderation_rejections_total";

/// Total moderation calls that errored and were let through.
pub const MODERATION_ERRORS_TOTAL: &str = "mythweaver_moderation_errors_total";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "mythweaver_cache_hits_total";

/// Total response cache misses, expired entries included.
pub const CACHE_MISSES_TOTAL: &str = "mythweaver_cache_misses_total";
