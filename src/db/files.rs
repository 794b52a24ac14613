//! Database operations for file attachments.
//!
//! Rows here are metadata only; the route layer persists the bytes to the
//! job's artifact directory before inserting the record.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::file::{self, ActiveModel, Entity as File};
use crate::error::{AppError, AppResult};
use crate::models::FileLabel;

use super::DbPool;

impl DbPool {
    /// Insert a file metadata record.
    pub async fn insert_file(
        &self,
        job_id: i32,
        label: &FileLabel,
        filename: &str,
        path: &str,
        mimetype: &str,
        size: i64,
    ) -> AppResult<file::Model> {
        let model = ActiveModel {
            job_id: Set(job_id),
            label: Set(label.as_str().to_string()),
            filename: Set(filename.to_string()),
            path: Set(path.to_string()),
            mimetype: Set(mimetype.to_string()),
            size: Set(size),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert file: {}", e)))?;

        Ok(result)
    }

    /// Get all file rows for a job in upload order.
    pub async fn get_job_files(&self, job_id: i32) -> AppResult<Vec<file::Model>> {
        let result = File::find()
            .filter(file::Column::JobId.eq(job_id))
            .order_by_asc(file::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get job files: {}", e)))?;

        Ok(result)
    }

    /// Get a file row by ID.
    pub async fn get_file(&self, id: i32) -> AppResult<Option<file::Model>> {
        let result = File::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get file: {}", e)))?;

        Ok(result)
    }

    /// Delete a single file row.
    pub async fn delete_file(&self, id: i32) -> AppResult<()> {
        self.get_file(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {}", id)))?;

        File::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete file: {}", e)))?;

        Ok(())
    }
}
