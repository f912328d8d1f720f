use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::attendance::{AttendanceListResponse, AttendanceRequest};
use crate::api::tags::CreateTag;
use crate::auth::api_key::API_KEY_HEADER;
use crate::model::attendance::AttendanceEvent;
use crate::model::tag::Tag;
use crate::models::{LoginReqDto, LoginResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RFID Attendance API",
        version = "0.1.0",
        description = r#"
## RFID Attendance Service

Backend for ESP32 RFID readers. A reader scans a tag and posts the tag UID;
the service stores one attendance event per scan.

### Authentication
- **Readers** send the shared key in the `X-API-Key` header (or `api_key` in the body).
- **Operators** log in with `POST /api/login` and use the returned **Bearer** token
  for listing attendance and managing tags.

### Notes
- Scans are never deduplicated: two posts for the same tag are two events.
- Scans for tags that are not enrolled are rejected with 404.
"#,
    ),
    paths(
        crate::api::attendance::record_attendance,
        crate::api::attendance::list_attendance,

        crate::api::tags::enroll_tag,
        crate::api::tags::list_tags,

        crate::api::health::db_test,

        crate::auth::handlers::login
    ),
    components(
        schemas(
            AttendanceRequest,
            AttendanceEvent,
            AttendanceListResponse,
            CreateTag,
            Tag,
            LoginReqDto,
            LoginResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "RFID scan recording and history"),
        (name = "Tags", description = "Tag enrollment"),
        (name = "Auth", description = "Operator login"),
        (name = "Health", description = "Connectivity checks"),
    )
)]
pub struct ApiDoc;

/// Route paths as written in the handler annotations.
const DOCUMENTED_PREFIX: &str = "/api";

/// The document with every path moved under the configured `API_PREFIX`.
pub fn openapi_for_prefix(prefix: &str) -> openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let prefix = prefix.trim_end_matches('/');

    if prefix != DOCUMENTED_PREFIX {
        let paths = std::mem::take(&mut doc.paths.paths);
        doc.paths.paths = paths
            .into_iter()
            .map(|(path, item)| {
                let rest = path.strip_prefix(DOCUMENTED_PREFIX).unwrap_or(&path);
                (format!("{prefix}{rest}"), item)
            })
            .collect();
    }

    doc
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
        );
    }
}
