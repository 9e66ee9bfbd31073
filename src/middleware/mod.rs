//! HTTP middleware and request extractors

pub mod auth;
pub mod metrics;

pub use auth::{AuthUser, OptionalAuth, TenantContext};
pub use self::metrics::ObservabilityLayer;
