use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpRequest, guard, web};

use crate::{
    api::{attendance, health, tags},
    auth::handlers,
    config::{Config, ConfigError},
    error::AppError,
};

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP limiters, built once so their state is shared by every worker.
#[derive(Clone)]
pub struct RateLimiters {
    scan: Limiter,
    login: Limiter,
    operator: Limiter,
}

impl RateLimiters {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            scan: build_limiter("RATE_SCAN_PER_MIN", config.rate_scan_per_min)?,
            login: build_limiter("RATE_LOGIN_PER_MIN", config.rate_login_per_min)?,
            operator: build_limiter("RATE_OPERATOR_PER_MIN", config.rate_operator_per_min)?,
        })
    }
}

fn build_limiter(name: &'static str, requests_per_min: u32) -> Result<Limiter, ConfigError> {
    if requests_per_min == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: requests_per_min.to_string(),
        });
    }

    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| ConfigError::Invalid {
            name,
            value: requests_per_min.to_string(),
        })?;

    Ok(Arc::new(Governor::new(&cfg)))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req: &HttpRequest| AppError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| AppError::Validation(err.to_string()).into())
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &RateLimiters) {
    cfg.service(
        web::scope(&config.api_prefix)
            .app_data(json_config())
            .app_data(query_config())
            // Operator login
            .service(
                web::resource("/login")
                    .wrap(limiters.login.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/db-test")
                    .wrap(limiters.operator.clone())
                    .route(web::get().to(health::db_test)),
            )
            // Readers and operators share the path but not the rate budget
            .service(
                web::resource("/attendance")
                    .guard(guard::Post())
                    .wrap(limiters.scan.clone())
                    .route(web::post().to(attendance::record_attendance)),
            )
            .service(
                web::resource("/attendance")
                    .guard(guard::Get())
                    .wrap(limiters.operator.clone())
                    .route(web::get().to(attendance::list_attendance)),
            )
            .service(
                web::resource("/tags")
                    .wrap(limiters.operator.clone())
                    .route(web::post().to(tags::enroll_tag))
                    .route(web::get().to(tags::list_tags)),
            ),
    );
}

// READER SCAN
//  └─ POST /api/attendance  X-API-Key: <API_KEY>  {"tag_id": "..."}

// OPERATOR
//  ├─ POST /api/login → access_token
//  └─ GET /api/attendance, /api/tags  Authorization: Bearer access_token
