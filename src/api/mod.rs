//! API endpoint modules.

pub mod auth;
pub mod files;
pub mod health;
pub mod jobs;
pub mod openapi;
pub mod projects;

pub use auth::configure_routes as configure_auth_routes;
pub use files::configure_routes as configure_file_routes;
pub use health::configure_health_routes;
pub use jobs::configure_routes as configure_job_routes;
pub use openapi::ApiDoc;
pub use projects::configure_routes as configure_project_routes;
