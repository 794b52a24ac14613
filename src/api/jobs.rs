//! Job API handlers: CRUD, status-filtered listing, analysis results, and
//! artifact attachment.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use futures_util::StreamExt;
use tracing::{info, warn};

use crate::auth::SessionAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AnalysisUpdateRequest, CreateJobRequest, FileLabel, FileResponse, JobFilters, JobResponse,
    UpdateJobRequest,
};
use crate::services::Storage;

/// Query jobs with filtering and sorting, joined with project names.
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("bench" = Option<String>, Query, description = "Filter by bench"),
        ("search" = Option<String>, Query, description = "Case-insensitive search over project, name, type, bench, status"),
        ("sortBy" = Option<String>, Query, description = "Job field to sort by"),
        ("sortOrder" = Option<String>, Query, description = "asc (default) or desc"),
        ("projectId" = Option<i32>, Query, description = "Filter by owning project"),
        ("includeArchived" = Option<bool>, Query, description = "Include jobs of archived projects")
    ),
    responses(
        (status = 200, description = "List of jobs", body = [JobResponse]),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[get("/jobs")]
pub async fn query_jobs(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    query: web::Query<JobFilters>,
) -> AppResult<HttpResponse> {
    let rows = pool.query_jobs(&query).await?;

    let response: Vec<JobResponse> = rows
        .into_iter()
        .map(|(job, project_name)| JobResponse::from_model(job, project_name))
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Create a job.
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid job data", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[post("/jobs")]
pub async fn create_job(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateJobRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let job = pool.insert_job(&req).await?;
    info!(
        "Job created: id={}, project_id={}, simulation='{}'",
        job.id, job.project_id, job.simulation_name
    );

    let project_name = pool
        .get_project(job.project_id)
        .await?
        .map(|p| p.name)
        .unwrap_or_else(|| crate::db::jobs::UNKNOWN_PROJECT.to_string());

    Ok(HttpResponse::Created().json(JobResponse::from_model(job, project_name)))
}

/// Get a single job by ID.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job details", body = JobResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[get("/jobs/{id}")]
pub async fn get_job(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let (job, project_name) = pool
        .get_job_with_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

    Ok(HttpResponse::Ok().json(JobResponse::from_model(job, project_name)))
}

/// Partially update a job.
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 400, description = "Invalid update data", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[put("/jobs/{id}")]
pub async fn update_job(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateJobRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let job = pool.update_job(id, &req).await?;

    let project_name = pool
        .get_project(job.project_id)
        .await?
        .map(|p| p.name)
        .unwrap_or_else(|| crate::db::jobs::UNKNOWN_PROJECT.to_string());

    Ok(HttpResponse::Ok().json(JobResponse::from_model(job, project_name)))
}

/// Record analysis results (confidence, conclusion) for a job.
#[utoipa::path(
    put,
    path = "/api/jobs/{id}/analysis",
    tag = "Jobs",
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    request_body = AnalysisUpdateRequest,
    responses(
        (status = 200, description = "Analysis updated", body = JobResponse),
        (status = 400, description = "Invalid analysis data", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[put("/jobs/{id}/analysis")]
pub async fn update_analysis(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<AnalysisUpdateRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let job = pool
        .update_job_analysis(id, req.confidence, req.conclusion)
        .await?;

    let project_name = pool
        .get_project(job.project_id)
        .await?
        .map(|p| p.name)
        .unwrap_or_else(|| crate::db::jobs::UNKNOWN_PROJECT.to_string());

    Ok(HttpResponse::Ok().json(JobResponse::from_model(job, project_name)))
}

/// Delete a job, its file rows, and its on-disk artifact directory.
///
/// The directory removal is best-effort: the job record stays deleted even if
/// the filesystem cleanup fails.
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted"),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[delete("/jobs/{id}")]
pub async fn delete_job(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    pool.delete_job(id).await?;

    if let Err(e) = storage.remove_job_dir(id).await {
        warn!("Failed to remove artifact directory for job {}: {}", id, e);
    }

    info!("Job deleted: id={}", id);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Job deleted successfully" })))
}

/// List file attachments for a job.
///
/// A job with no attachments (or no longer existing) yields an empty list.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/files",
    tag = "Files",
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "List of files", body = [FileResponse]),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[get("/jobs/{id}/files")]
pub async fn list_job_files(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let files = pool.get_job_files(path.into_inner()).await?;
    let response: Vec<FileResponse> = files.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Upload a file attachment for a job.
///
/// Multipart form with a `label` text field and a `file` field. The bytes
/// land in the job's artifact directory, then the metadata row is created.
/// A `report` upload must be HTML and additionally updates the job's
/// `reportPath`.
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/files",
    tag = "Files",
    params(
        ("id" = i32, Path, description = "Job ID")
    ),
    responses(
        (status = 201, description = "File uploaded", body = FileResponse),
        (status = 400, description = "Invalid upload", body = crate::error::ErrorResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
    ),
    security(
        ("session_cookie" = [])
    )
)]
#[post("/jobs/{id}/files")]
pub async fn upload_job_file(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    path: web::Path<i32>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    pool.get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    let mut label: Option<FileLabel> = None;
    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match field_name.as_str() {
            "label" => {
                let text = read_field(&mut field, config.max_upload_size).await?;
                let text = String::from_utf8(text)
                    .map_err(|_| AppError::InvalidInput("Invalid label encoding".to_string()))?;
                let trimmed = text.trim().to_string();
                label = Some(FileLabel::parse(&trimmed).ok_or_else(|| {
                    AppError::InvalidInput(format!("Unknown file label '{}'", trimmed))
                })?);
            }
            "file" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .ok_or_else(|| {
                        AppError::InvalidInput("Missing filename in multipart".to_string())
                    })?
                    .to_string();
                let mimetype = field.content_type().map(|m| m.to_string());
                let data = read_field(&mut field, config.max_upload_size).await?;
                upload = Some((filename, mimetype, data));
            }
            // Unknown fields are ignored
            _ => continue,
        }
    }

    let label = label.ok_or_else(|| AppError::InvalidInput("Missing file label".to_string()))?;
    let (filename, mimetype, data) =
        upload.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;

    let mimetype =
        mimetype.unwrap_or_else(|| Storage::content_type_for_key(&filename).to_string());

    if label == FileLabel::Report && mimetype != "text/html" {
        return Err(AppError::InvalidInput(
            "Only HTML files are allowed for reports".to_string(),
        ));
    }

    let key = Storage::job_file_key(
        job_id,
        label.as_str(),
        &filename,
        Utc::now().timestamp_millis(),
    );
    storage.put(&key, &data).await?;

    let record = pool
        .insert_file(job_id, &label, &filename, &key, &mimetype, data.len() as i64)
        .await?;

    // Report uploads also update the job's report_path
    if label == FileLabel::Report {
        pool.set_job_report_path(job_id, &key).await?;
    }

    info!(
        "File uploaded: job_id={}, label={}, filename='{}', size={}",
        job_id,
        label,
        filename,
        data.len()
    );

    Ok(HttpResponse::Created().json(FileResponse::from(record)))
}

/// Read a multipart field into memory, enforcing the upload size limit.
async fn read_field(
    field: &mut actix_multipart::Field,
    max_size: usize,
) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        if data.len() + chunk.len() > max_size {
            return Err(AppError::InvalidInput(format!(
                "Upload exceeds maximum size of {} bytes",
                max_size
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Configure job routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(query_jobs)
        .service(create_job)
        .service(get_job)
        .service(update_job)
        .service(update_analysis)
        .service(delete_job)
        .service(list_job_files)
        .service(upload_job_file);
}
