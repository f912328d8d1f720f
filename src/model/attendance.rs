use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One scan of a tag. Rows are only ever inserted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "tag_id": "A1B2C3",
        "scanned_at": "2026-01-05T08:01:12Z",
        "recorded_at": "2026-01-05T08:01:12Z"
    })
)]
pub struct AttendanceEvent {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = "A1B2C3")]
    pub tag_id: String,

    #[schema(value_type = String, format = "date-time")]
    pub scanned_at: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time")]
    pub recorded_at: DateTime<Utc>,
}

/// What the store needs to append a scan.
#[derive(Debug, Clone)]
pub struct NewScan {
    pub tag_id: String,
    pub scanned_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

/// Filters for the attendance listing.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub tag_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: u32,
    pub offset: u32,
}
