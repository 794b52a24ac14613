//! Project models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Project as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i32,
    pub name: String,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::project::Model> for ProjectResponse {
    fn from(m: crate::entity::project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            archived: m.archived,
            created_at: m.created_at,
        }
    }
}

/// Request to create a project.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Project name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Query parameters for listing projects.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListProjectsQuery {
    /// Filter by archived flag; absent returns all projects.
    #[serde(default)]
    pub archived: Option<bool>,
}
