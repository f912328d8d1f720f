use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::{
        api_key::{key_matches, presented_key},
        auth::AuthUser,
    },
    config::Config,
    error::{AppError, AppResult},
    model::attendance::{AttendanceEvent, EventFilter, NewScan},
    store::{AttendanceStore, StoreError},
    utils::validation::{parse_timestamp, validate_tag_id},
};

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Scan payload sent by the reader.
///
/// The body is read as plain JSON for the API key check and only decoded
/// into this shape afterwards, so a malformed field is a validation error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AttendanceRequest {
    /// Tag UID; `rfid_tag` is accepted for older reader firmware
    #[serde(alias = "rfid_tag")]
    #[schema(example = "A1B2C3")]
    pub tag_id: Option<String>,

    /// Used only when no `X-API-Key` header is sent
    #[schema(example = "reader-secret")]
    pub api_key: Option<String>,

    /// Defaults to the time the server received the scan
    #[schema(example = "2026-01-05T08:01:12Z", format = "date-time")]
    pub scanned_at: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Only events for this tag
    pub tag_id: Option<String>,
    /// Inclusive lower bound on `scanned_at`, RFC 3339
    pub from: Option<String>,
    /// Exclusive upper bound on `scanned_at`, RFC 3339
    pub to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceEvent>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 57)]
    pub total: i64,
}

/// Record one RFID scan
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceRequest,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceEvent),
        (status = 400, description = "Missing or malformed tag_id", body = Object, example = json!({
            "error": "RFID tag_id is required"
        })),
        (status = 401, description = "Missing or invalid API key", body = Object, example = json!({
            "error": "Invalid API key"
        })),
        (status = 404, description = "Tag is not enrolled"),
        (status = 500, description = "Attendance store unavailable")
    ),
    security(
        ("api_key" = [])
    ),
    tag = "Attendance"
)]
pub async fn record_attendance(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    let body_json = serde_json::from_slice::<Value>(&body).ok();
    let body_key = body_json
        .as_ref()
        .and_then(|v| v.get("api_key"))
        .and_then(Value::as_str);

    // Authenticate before looking at anything else in the body
    match presented_key(&req, body_key) {
        Some(key) if key_matches(key, &config.api_key) => {}
        Some(_) => {
            warn!("Rejected scan: invalid API key");
            return Err(AppError::Unauthorized("Invalid API key".into()));
        }
        None => {
            warn!("Rejected scan: API key missing");
            return Err(AppError::Unauthorized("API key missing".into()));
        }
    }

    let payload: AttendanceRequest = match body_json {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map_err(|e| AppError::Validation(format!("Invalid scan payload: {e}")))?,
        _ => return Err(AppError::Validation("Body must be a JSON object".into())),
    };
    let tag_id = validate_tag_id(payload.tag_id.as_deref())?;

    // DATETIME(3) keeps milliseconds
    let recorded_at = Utc::now().trunc_subsecs(3);
    let scanned_at = parse_timestamp("scanned_at", payload.scanned_at.as_deref())?
        .map(|t| t.trunc_subsecs(3))
        .unwrap_or(recorded_at);

    let event = store
        .record_scan(NewScan {
            tag_id: tag_id.clone(),
            scanned_at,
            recorded_at,
        })
        .await
        .map_err(|e| {
            if let StoreError::UnknownTag(_) = e {
                warn!(tag_id = %tag_id, "Scan for unknown tag");
            }
            AppError::from(e)
        })?;

    info!(event_id = event.id, tag_id = %event.tag_id, "Attendance recorded");

    Ok(HttpResponse::Created().json(event))
}

/// List recorded scans, newest first
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance events", body = AttendanceListResponse),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    query: web::Query<AttendanceQuery>,
    store: web::Data<dyn AttendanceStore>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let tag_id = match query.tag_id.as_deref() {
        Some(raw) => Some(validate_tag_id(Some(raw))?),
        None => None,
    };
    let from = parse_timestamp("from", query.from.as_deref())?;
    let to = parse_timestamp("to", query.to.as_deref())?;

    if let (Some(from), Some(to)) = (from, to) {
        if from >= to {
            return Err(AppError::Validation("from must be earlier than to".into()));
        }
    }

    let filter = EventFilter {
        tag_id,
        from,
        to,
        limit: per_page,
        offset: (page - 1).saturating_mul(per_page),
    };

    let (data, total) = store.list_events(&filter).await?;

    info!(user = %auth.username, page, per_page, total, "Attendance listed");

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page,
        per_page,
        total,
    }))
}
