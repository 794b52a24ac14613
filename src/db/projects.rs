//! Database operations for projects.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};

use crate::entity::project::{self, ActiveModel, Entity as Project};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// List projects, optionally filtered by archived flag.
    pub async fn list_projects(&self, archived: Option<bool>) -> AppResult<Vec<project::Model>> {
        let mut select = Project::find();

        if let Some(archived) = archived {
            select = select.filter(project::Column::Archived.eq(archived));
        }

        let result = select
            .order_by_asc(project::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list projects: {}", e)))?;

        Ok(result)
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: i32) -> AppResult<Option<project::Model>> {
        let result = Project::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get project: {}", e)))?;

        Ok(result)
    }

    /// Insert a new project. Project names are unique.
    pub async fn insert_project(&self, name: &str, archived: bool) -> AppResult<project::Model> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            archived: Set(archived),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::InvalidInput(format!("Project '{}' already exists", name))
                }
                _ => AppError::Database(format!("Failed to insert project: {}", e)),
            })?;

        Ok(result)
    }

    /// Archive a project. One-way transition; archiving an already-archived
    /// project is a no-op.
    pub async fn archive_project(&self, id: i32) -> AppResult<project::Model> {
        let project = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))?;

        let mut active: ActiveModel = project.into();
        active.archived = Set(true);

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to archive project: {}", e)))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_util::test_pool;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_insert_and_list_projects() {
        let pool = test_pool().await;

        let p1 = pool.insert_project("AION36", false).await.unwrap();
        let p2 = pool.insert_project("Legacy-OldProject", true).await.unwrap();
        assert!(!p1.archived);
        assert!(p2.archived);

        let all = pool.list_projects(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let active = pool.list_projects(Some(false)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "AION36");

        let archived = pool.list_projects(Some(true)).await.unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].name, "Legacy-OldProject");
    }

    #[tokio::test]
    async fn test_duplicate_project_name_rejected() {
        let pool = test_pool().await;

        pool.insert_project("AION36", false).await.unwrap();
        let err = pool.insert_project("AION36", false).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_archive_project_is_one_way() {
        let pool = test_pool().await;

        let project = pool.insert_project("AION36", false).await.unwrap();
        let archived = pool.archive_project(project.id).await.unwrap();
        assert!(archived.archived);

        // Archiving again stays archived
        let again = pool.archive_project(project.id).await.unwrap();
        assert!(again.archived);
    }

    #[tokio::test]
    async fn test_archive_missing_project_is_not_found() {
        let pool = test_pool().await;
        let err = pool.archive_project(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
