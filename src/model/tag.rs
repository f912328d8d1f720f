use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "tag_id": "A1B2C3",
        "holder_name": "John Doe",
        "external_id": "STU-0042",
        "created_at": "2026-01-01T09:00:00Z"
    })
)]
pub struct Tag {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "A1B2C3")]
    pub tag_id: String,

    #[schema(example = "John Doe")]
    pub holder_name: String,

    #[schema(example = "STU-0042", nullable = true)]
    pub external_id: Option<String>,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub tag_id: String,
    pub holder_name: String,
    pub external_id: Option<String>,
}
