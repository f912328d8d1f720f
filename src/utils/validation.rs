use chrono::{DateTime, Utc};

use crate::error::AppError;

pub const TAG_ID_MAX_LEN: usize = 64;
pub const HOLDER_NAME_MAX_LEN: usize = 128;

/// Trims, checks and upper-cases a tag identifier as read off the RFID
/// reader. Readers send the UID as hex, optionally separated with `:` or `-`.
pub fn validate_tag_id(raw: Option<&str>) -> Result<String, AppError> {
    let tag_id = raw.map(str::trim).unwrap_or_default();

    if tag_id.is_empty() {
        return Err(AppError::Validation("RFID tag_id is required".into()));
    }

    if tag_id.chars().count() > TAG_ID_MAX_LEN {
        return Err(AppError::Validation(format!(
            "tag_id must be at most {TAG_ID_MAX_LEN} characters"
        )));
    }

    if !tag_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ':' || c == '-')
    {
        return Err(AppError::Validation(
            "tag_id may only contain letters, digits, ':' and '-'".into(),
        ));
    }

    Ok(tag_id.to_ascii_uppercase())
}

pub fn validate_holder_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(AppError::Validation("holder_name is required".into()));
    }
    if name.chars().count() > HOLDER_NAME_MAX_LEN {
        return Err(AppError::Validation(format!(
            "holder_name must be at most {HOLDER_NAME_MAX_LEN} characters"
        )));
    }

    Ok(name.to_string())
}

/// Parses an optional RFC 3339 timestamp field, naming the field on failure.
pub fn parse_timestamp(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| AppError::Validation(format!("{field} must be an RFC 3339 timestamp"))),
    }
}
