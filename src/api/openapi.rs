//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SimTrack Server",
        version = "0.3.0",
        description = "API server for tracking FEA simulation jobs, projects, and result artifacts"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth endpoints
        api::auth::login,
        api::auth::logout,
        api::auth::me,
        // Project endpoints
        api::projects::list_projects,
        api::projects::create_project,
        api::projects::archive_project,
        // Job endpoints
        api::jobs::query_jobs,
        api::jobs::create_job,
        api::jobs::get_job,
        api::jobs::update_job,
        api::jobs::update_analysis,
        api::jobs::delete_job,
        api::jobs::list_job_files,
        api::jobs::upload_job_file,
        // File endpoints
        api::files::serve_file,
        api::files::delete_file,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Auth
            models::AuthenticatedUser,
            models::LoginRequest,
            // Projects
            models::ProjectResponse,
            models::CreateProjectRequest,
            models::ListProjectsQuery,
            // Jobs
            models::Bench,
            models::AnalysisType,
            models::JobStatus,
            models::SortOrder,
            models::CreateJobRequest,
            models::UpdateJobRequest,
            models::AnalysisUpdateRequest,
            models::JobFilters,
            models::JobResponse,
            // Files
            models::FileLabel,
            models::FileResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Session login and identity"),
        (name = "Projects", description = "Project creation and archival"),
        (name = "Jobs", description = "Simulation job tracking"),
        (name = "Files", description = "Job artifact uploads and downloads")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add the session cookie security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new(crate::auth::SESSION_COOKIE),
                    ),
                ),
            );
        }
    }
}
