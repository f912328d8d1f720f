use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::{error::AppResult, store::AttendanceStore};

/// Check database connectivity
#[utoipa::path(
    get,
    path = "/api/db-test",
    responses(
        (status = 200, description = "Database reachable", body = Object, example = json!({
            "message": "Database connected!"
        })),
        (status = 500, description = "Database unreachable")
    ),
    tag = "Health"
)]
pub async fn db_test(store: web::Data<dyn AttendanceStore>) -> AppResult<HttpResponse> {
    store.ping().await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Database connected!"
    })))
}
