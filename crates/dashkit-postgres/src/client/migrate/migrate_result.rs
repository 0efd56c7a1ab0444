use std::time::Duration;

/// Applied and pending migration versions at a point in time.
///
/// ```rust
/// use dashkit_postgres::MigrationStatus;
///
/// let status = MigrationStatus::new(vec!["20250601000000".to_owned()], Vec::<String>::new());
/// assert!(status.is_up_to_date());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Applied versions, oldest first.
    pub applied_versions: Vec<String>,
    /// Embedded versions not yet applied, oldest first.
    pub pending_versions: Vec<String>,
}

impl MigrationStatus {
    /// Creates a new migration status.
    pub fn new(
        applied_versions: impl Into<Vec<String>>,
        pending_versions: impl Into<Vec<String>>,
    ) -> Self {
        Self {
            applied_versions: applied_versions.into(),
            pending_versions: pending_versions.into(),
        }
    }

    /// Share of known migrations that are applied, from 0.0 to 1.0.
    pub fn progress_ratio(&self) -> f64 {
        match self.total_migrations() {
            0 => 1.0,
            total => self.applied_migrations() as f64 / total as f64,
        }
    }

    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }

    pub fn next_pending_version(&self) -> Option<&str> {
        self.pending_versions.first().map(String::as_str)
    }

    #[inline]
    pub fn applied_migrations(&self) -> usize {
        self.applied_versions.len()
    }

    #[inline]
    pub fn pending_migrations(&self) -> usize {
        self.pending_versions.len()
    }

    #[inline]
    pub fn total_migrations(&self) -> usize {
        self.applied_migrations() + self.pending_migrations()
    }

    /// Returns true if nothing is left to apply.
    #[inline]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_versions.is_empty()
    }
}

/// Outcome of a [`run_pending_migrations`] call.
///
/// [`run_pending_migrations`]: super::run_pending_migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Wall-clock time spent, including status checks.
    pub duration: Duration,
    /// Versions applied by this run, in order.
    pub processed_versions: Vec<String>,
    /// Set when the run failed.
    pub error_message: Option<String>,
}

impl MigrationResult {
    pub fn success(duration: Duration, processed_versions: Vec<String>) -> Self {
        Self {
            duration,
            processed_versions,
            error_message: None,
        }
    }

    pub fn failure(duration: Duration, error_message: impl Into<String>) -> Self {
        Self {
            duration,
            processed_versions: Vec::new(),
            error_message: Some(error_message.into()),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
    }

    pub fn average_time_per_migration(&self) -> Option<Duration> {
        match u32::try_from(self.processed_versions.len()) {
            Ok(0) | Err(_) => None,
            Ok(count) => Some(self.duration / count),
        }
    }

    /// Returns true for a successful run that applied nothing.
    pub fn is_no_op(&self) -> bool {
        self.is_success() && self.processed_versions.is_empty()
    }

    pub fn last_processed_version(&self) -> Option<&str> {
        self.processed_versions.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(list: &[&str]) -> Vec<String> {
        list.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn status_reports_progress() {
        let status = MigrationStatus::new(versions(&["001", "002"]), versions(&["003", "004"]));

        assert_eq!(status.progress_ratio(), 0.5);
        assert_eq!(status.total_migrations(), 4);
        assert_eq!(status.last_applied_version(), Some("002"));
        assert_eq!(status.next_pending_version(), Some("003"));
        assert!(!status.is_up_to_date());
    }

    #[test]
    fn empty_status_is_up_to_date() {
        let status = MigrationStatus::default();
        assert_eq!(status.progress_ratio(), 1.0);
        assert!(status.is_up_to_date());
        assert_eq!(status.last_applied_version(), None);
    }

    #[test]
    fn result_averages_over_processed_versions() {
        let result = MigrationResult::success(Duration::from_millis(300), versions(&["001", "002", "003"]));
        assert_eq!(result.average_time_per_migration(), Some(Duration::from_millis(100)));
        assert_eq!(result.last_processed_version(), Some("003"));
        assert!(!result.is_no_op());
    }

    #[test]
    fn failed_result_is_not_a_no_op() {
        let result = MigrationResult::failure(Duration::from_millis(5), "relation already exists");
        assert!(!result.is_success());
        assert!(!result.is_no_op());
        assert_eq!(result.average_time_per_migration(), None);
    }
}
