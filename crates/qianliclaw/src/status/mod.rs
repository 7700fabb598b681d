//! Status snapshot and the external CLI health check.

mod health;
mod snapshot;

pub use health::{
    CapturedOutput, DEFAULT_CLI, DEFAULT_HEALTH_TIMEOUT, HealthChecker, HealthError, HealthOutcome,
    HealthResult,
};
pub use snapshot::StatusSnapshot;
