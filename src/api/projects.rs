//! Project API handlers.

use actix_web::{HttpResponse, get, post, put, web};
use tracing::info;

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{CreateProjectRequest, ListProjectsQuery, ProjectResponse};

/// List projects, optionally filtered by archived flag.
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    params(
        ("archived" = Option<bool>, Query, description = "Filter by archived flag")
    ),
    responses(
        (status = 200, description = "List of projects", body = [ProjectResponse]),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[get("/projects")]
pub async fn list_projects(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListProjectsQuery>,
) -> AppResult<HttpResponse> {
    let projects = pool.list_projects(query.archived).await?;
    let response: Vec<ProjectResponse> = projects.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Create a project.
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid project data", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[post("/projects")]
pub async fn create_project(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let project = pool.insert_project(req.name.trim(), req.archived).await?;
    info!("Project created: id={}, name='{}'", project.id, project.name);

    Ok(HttpResponse::Created().json(ProjectResponse::from(project)))
}

/// Archive a project.
///
/// One-way transition; archived projects disappear from the default job
/// listing but their jobs stay reachable by id.
#[utoipa::path(
    put,
    path = "/api/projects/{id}/archive",
    tag = "Projects",
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project archived"),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[put("/projects/{id}/archive")]
pub async fn archive_project(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let project = pool.archive_project(id).await?;
    info!("Project archived: id={}, name='{}'", project.id, project.name);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Project archived successfully" })))
}

/// Configure project routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_projects)
        .service(create_project)
        .service(archive_project);
}
