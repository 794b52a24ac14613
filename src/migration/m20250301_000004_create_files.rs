//! Migration: Create files table.
//!
//! File rows are metadata; the bytes live on disk in a per-job directory.
//! Deleting a job cascades to its file rows.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE files (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    job_id INTEGER NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
                    label TEXT NOT NULL
                        CHECK (label IN ('mesh', 'inp_file', 'result_log', 'report', 'general')),
                    filename TEXT NOT NULL,
                    path TEXT NOT NULL,
                    mimetype TEXT NOT NULL,
                    size INTEGER NOT NULL,
                    uploaded_at TEXT NOT NULL
                );

                CREATE INDEX idx_files_job_id ON files(job_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS files;")
            .await?;

        Ok(())
    }
}
