//! Caching subsystem.
//!
//! [`ResponseCache`] stores generated myths keyed on a request
//! [`Fingerprint`] for a fixed TTL. Time comes from an injected [`Clock`]
//! so expiry is testable without sleeping.

pub mod clock;
pub mod response;

pub use clock::{Clock, ManualClock, SystemClock};
pub use response::{CacheConfig, CacheEntry, Fingerprint, ResponseCache};
