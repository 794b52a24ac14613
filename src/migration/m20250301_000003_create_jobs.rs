//! Migration: Create jobs table.
//!
//! A job records one simulation request against a test bench, owned by
//! exactly one project. Deleting a project cascades to its jobs.

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
                CREATE TABLE jobs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    simulation_name TEXT NOT NULL,

                    bench TEXT NOT NULL
                        CHECK (bench IN ('symmetric-bending', 'brake-load', 'unknown')),
                    type TEXT NOT NULL
                        CHECK (type IN ('static', 'fatigue')),

                    date_request TEXT NOT NULL,
                    date_due TEXT,

                    priority INTEGER NOT NULL
                        CHECK (priority BETWEEN 1 AND 5),
                    status TEXT NOT NULL
                        CHECK (status IN ('queued', 'running', 'done', 'failed')),

                    -- JSON array of component identifiers
                    components TEXT NOT NULL DEFAULT '[]',

                    -- Analysis results, filled in once the simulation completes
                    confidence INTEGER
                        CHECK (confidence IS NULL OR confidence BETWEEN 0 AND 100),
                    conclusion TEXT,
                    report_path TEXT,

                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE INDEX idx_jobs_status ON jobs(status);
                CREATE INDEX idx_jobs_project ON jobs(project_id);
                CREATE INDEX idx_jobs_created_at ON jobs(created_at);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS jobs;")
            .await?;

        Ok(())
    }
}
