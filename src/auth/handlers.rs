use actix_web::{HttpResponse, web};
use tracing::{debug, error, info, instrument};

use crate::{
    auth::{jwt::generate_access_token, password::verify_password},
    config::Config,
    error::{AppError, AppResult},
    models::{LoginReqDto, LoginResponse},
};

/// Exchange the operator credentials for an access token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "Invalid credentials"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(config, user), fields(username = %user.username))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    config: web::Data<Config>,
) -> AppResult<HttpResponse> {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(AppError::Validation("Username or password required".into()));
    }

    // Same message for both cases so the response does not reveal the username
    if user.username != config.admin_username {
        info!("Invalid credentials: unknown user");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    debug!("Verifying password");
    if let Err(e) = verify_password(&user.password, &config.admin_password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let (access_token, claims) =
        generate_access_token(&user.username, &config.jwt_secret, config.access_token_ttl)
            .map_err(|e| {
                error!(error = %e, "Failed to sign access token");
                AppError::Internal
            })?;

    info!(jti = %claims.jti, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: config.access_token_ttl,
    }))
}
