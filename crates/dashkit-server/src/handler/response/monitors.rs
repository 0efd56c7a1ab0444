//! Monitor response types.

use dashkit_postgres::PgPoolStatus;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Connection pool statistics.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    pub max_size: usize,
    pub size: usize,
    pub available: usize,
    pub waiting: usize,
}

impl From<PgPoolStatus> for DatabaseStatus {
    fn from(status: PgPoolStatus) -> Self {
        Self {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }
}

/// System health status response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Whether the service can take requests.
    pub is_healthy: bool,
    /// Timestamp when this status was generated.
    pub updated_at: Timestamp,
    /// Connection pool statistics.
    pub database: DatabaseStatus,
}

impl HealthStatus {
    /// Derives the status from the current pool statistics.
    pub fn from_pool_status(status: PgPoolStatus) -> Self {
        Self {
            is_healthy: !status.is_exhausted(),
            updated_at: Timestamp::now(),
            database: status.into(),
        }
    }
}
