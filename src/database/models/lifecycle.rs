use chrono::{DateTime, Utc};

/// Soft-deleted rows keep their history; only rows without a deletion
/// timestamp take part in reads and uniqueness checks.
pub trait SoftDelete {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_active(&self) -> bool {
        self.deleted_at().is_none()
    }
}

/// The one predicate every query over a soft-deletable table appends.
pub const ACTIVE_ROWS: &str = "deleted_at IS NULL";
