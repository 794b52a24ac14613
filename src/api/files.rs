//! File serving and deletion handlers.
//!
//! Streams artifact bytes from the per-job directories on disk.

use actix_web::{HttpResponse, delete, get, web};
use tracing::{debug, warn};

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::services::Storage;

/// Serve an artifact by its storage key.
///
/// Content type is inferred from the file extension.
#[utoipa::path(
    get,
    path = "/api/files/{path}",
    tag = "Files",
    params(
        ("path" = String, Path, description = "Storage key, e.g. 7/report_1700000000000.html")
    ),
    responses(
        (status = 200, description = "File bytes"),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[get("/files/{key:.*}")]
pub async fn serve_file(
    _session: SessionAuth,
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = path.into_inner();

    debug!("Serving file: {}", key);

    let data = storage.get(&key).await?;
    let content_type = Storage::content_type_for_key(&key);

    Ok(HttpResponse::Ok().content_type(content_type).body(data))
}

/// Delete a single file attachment.
///
/// Removes the metadata row; the on-disk artifact removal is best-effort.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "Files",
    params(
        ("id" = i32, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted"),
        (status = 404, description = "File not found", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[delete("/files/{id}")]
pub async fn delete_file(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let file = pool
        .get_file(id)
        .await?
        .ok_or_else(|| crate::error::AppError::NotFound(format!("File {}", id)))?;

    pool.delete_file(id).await?;

    if let Err(e) = storage.remove(&file.path).await {
        warn!("Failed to remove artifact '{}': {}", file.path, e);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "File deleted successfully" })))
}

/// Configure file routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(delete_file).service(serve_file);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    use crate::config::{Config, Environment};
    use crate::db::test_util::test_pool;
    use crate::db::sessions;
    use crate::services::Storage;

    #[actix_web::test]
    async fn test_serve_file_round_trip_and_missing() {
        let pool = test_pool().await;
        let user = pool
            .insert_user("admin", &crate::auth::hash_password("admin"))
            .await
            .unwrap();
        let token = sessions::generate_token();
        pool.insert_session(user.id, &sessions::hash_token(&token), 24)
            .await
            .unwrap();
        let cookie = actix_web::cookie::Cookie::new(crate::auth::SESSION_COOKIE, token);

        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path()).await.unwrap();
        storage.put("7/report_1.html", b"<html></html>").await.unwrap();

        let config = Config {
            environment: Environment::Development,
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite::memory:".to_string(),
            data_dir: dir.path().to_path_buf(),
            static_dir: None,
            max_upload_size: 1024,
            session_ttl_hours: 24,
        };

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(config))
                .service(web::scope("/api").configure(super::configure_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/files/7/report_1.html")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html"
        );
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"<html></html>");

        let req = test::TestRequest::get()
            .uri("/api/files/7/missing.html")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
