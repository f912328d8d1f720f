use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::{AppError, AppResult},
    model::tag::NewTag,
    store::AttendanceStore,
    utils::validation::{validate_holder_name, validate_tag_id},
};

#[derive(Deserialize, ToSchema)]
pub struct CreateTag {
    #[schema(example = "A1B2C3")]
    pub tag_id: String,
    #[schema(example = "John Doe")]
    pub holder_name: String,
    /// Student or employee number the tag belongs to
    #[schema(example = "STU-0042", nullable = true)]
    pub external_id: Option<String>,
}

/// Enroll a new RFID tag
#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = CreateTag,
    responses(
        (status = 201, description = "Tag enrolled", body = Tag),
        (status = 400, description = "Invalid tag"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Tag already enrolled", body = Object, example = json!({
            "error": "Tag A1B2C3 is already enrolled"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tags"
)]
pub async fn enroll_tag(
    auth: AuthUser,
    payload: web::Json<CreateTag>,
    store: web::Data<dyn AttendanceStore>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();

    let tag_id = validate_tag_id(Some(&payload.tag_id))?;
    let holder_name = validate_holder_name(&payload.holder_name)?;
    let external_id = payload
        .external_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if external_id.as_ref().is_some_and(|s| s.chars().count() > 64) {
        return Err(AppError::Validation(
            "external_id must be at most 64 characters".into(),
        ));
    }

    let tag = store
        .enroll_tag(NewTag {
            tag_id,
            holder_name,
            external_id,
        })
        .await?;

    info!(user = %auth.username, tag_id = %tag.tag_id, "Tag enrolled");

    Ok(HttpResponse::Created().json(tag))
}

/// List enrolled tags
#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "Enrolled tags", body = [Tag]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tags"
)]
pub async fn list_tags(
    _auth: AuthUser,
    store: web::Data<dyn AttendanceStore>,
) -> AppResult<HttpResponse> {
    let tags = store.list_tags().await?;
    Ok(HttpResponse::Ok().json(tags))
}
