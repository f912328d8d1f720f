use async_trait::async_trait;
use thiserror::Error;

use crate::model::attendance::{AttendanceEvent, EventFilter, NewScan};
use crate::model::tag::{NewTag, Tag};

pub mod mysql;

#[cfg(test)]
pub mod memory;

pub use mysql::MySqlAttendanceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tag `{0}` is not enrolled")]
    UnknownTag(String),

    #[error("tag `{0}` is already enrolled")]
    DuplicateTag(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Durable home of tags and attendance events.
///
/// Every method is a single round trip; nothing is retried here.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Appends exactly one event for an enrolled tag.
    async fn record_scan(&self, scan: NewScan) -> Result<AttendanceEvent, StoreError>;

    /// Newest first, plus the total count matching the filter.
    async fn list_events(
        &self,
        filter: &EventFilter,
    ) -> Result<(Vec<AttendanceEvent>, i64), StoreError>;

    async fn enroll_tag(&self, tag: NewTag) -> Result<Tag, StoreError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
