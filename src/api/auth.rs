//! Session authentication endpoints: login, logout, current user.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::auth::{self, SessionAuth};
use crate::config::Config;
use crate::db::{DbPool, sessions};
use crate::error::{AppError, AppResult};
use crate::models::{AuthenticatedUser, LoginRequest};

/// Log in with username and password.
///
/// On success, sets the session cookie and returns the user.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthenticatedUser),
        (status = 400, description = "Missing credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
    )
)]
#[post("/auth/login")]
pub async fn login(
    config: web::Data<Config>,
    pool: web::Data<DbPool>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.username.is_empty() || req.password.expose_secret().is_empty() {
        return Err(AppError::InvalidInput(
            "Username and password required".to_string(),
        ));
    }

    let user = pool.find_user_by_username(&req.username).await?;
    let valid = user
        .as_ref()
        .map(|u| auth::verify_password(&req.password, &u.password_hash))
        .unwrap_or(false);

    let Some(user) = user.filter(|_| valid) else {
        warn!("Login failed for username '{}'", req.username);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let token = sessions::generate_token();
    pool.insert_session(
        user.id,
        &sessions::hash_token(&token),
        config.session_ttl_hours,
    )
    .await?;

    info!("User '{}' logged in", user.username);

    let cookie = auth::session_cookie(&token, config.environment.is_production());
    Ok(HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "user": AuthenticatedUser {
            id: user.id,
            username: user.username,
        }
    })))
}

/// Log out: revoke the session server-side and clear the cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out"),
    )
)]
#[post("/auth/logout")]
pub async fn logout(
    req: HttpRequest,
    config: web::Data<Config>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    if let Some(cookie) = req.cookie(auth::SESSION_COOKIE) {
        let _ = pool
            .revoke_session(&sessions::hash_token(cookie.value()))
            .await;
    }

    let clear = auth::clear_session_cookie(config.environment.is_production());
    Ok(HttpResponse::Ok()
        .cookie(clear)
        .json(serde_json::json!({ "message": "Logged out successfully" })))
}

/// Get the currently authenticated user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = AuthenticatedUser),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[get("/auth/me")]
pub async fn me(session: SessionAuth) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": session.user })))
}

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout).service(me);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::json;

    use crate::auth::{SESSION_COOKIE, hash_password};
    use crate::config::{Config, Environment};
    use crate::db::test_util::test_pool;

    fn test_config() -> Config {
        Config {
            environment: Environment::Development,
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite::memory:".to_string(),
            data_dir: std::path::PathBuf::from("./data"),
            static_dir: None,
            max_upload_size: 1024 * 1024,
            session_ttl_hours: 24,
        }
    }

    #[actix_web::test]
    async fn test_login_logout_me_flow() {
        let pool = test_pool().await;
        pool.insert_user("admin", &hash_password("admin"))
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(test_config()))
                .service(web::scope("/api").configure(super::configure_routes)),
        )
        .await;

        // Missing password -> 400
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "admin", "password": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        // Wrong password -> 401
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "admin", "password": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        // Unknown user -> 401
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "ghost", "password": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        // Valid login -> 200 with session cookie
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "admin", "password": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let session_cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie set")
            .into_owned();
        assert!(!session_cookie.value().is_empty());

        // /auth/me without a session -> 401
        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        // /auth/me with the session -> 200
        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(session_cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["username"], "admin");

        // Logout revokes the session
        let req = test::TestRequest::post()
            .uri("/api/auth/logout")
            .cookie(session_cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(session_cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
