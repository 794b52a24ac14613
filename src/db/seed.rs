//! Startup seeding.
//!
//! Creates the demo login accounts when the users table is empty so a fresh
//! install is usable immediately. Example projects and jobs are only seeded
//! in development mode.

use tracing::info;

use crate::auth::hash_password;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{AnalysisType, Bench, CreateJobRequest, JobStatus};

use super::DbPool;

/// Seed the database if it is empty.
pub async fn run(pool: &DbPool, config: &Config) -> AppResult<()> {
    if pool.count_users().await? > 0 {
        return Ok(());
    }

    pool.insert_user("admin", &hash_password("admin")).await?;
    pool.insert_user("engineer", &hash_password("engineer123"))
        .await?;
    info!("Seeded default users");

    if config.is_development() {
        seed_demo_data(pool).await?;
        info!("Seeded demo projects and jobs");
    }

    Ok(())
}

async fn seed_demo_data(pool: &DbPool) -> AppResult<()> {
    let aion = pool.insert_project("AION36", false).await?;
    let nrx = pool.insert_project("NRX32-IL", false).await?;
    let legacy = pool.insert_project("Legacy-OldProject", false).await?;

    pool.insert_job(&CreateJobRequest {
        project_id: aion.id,
        simulation_name: "Static Analysis - Main Fork".to_string(),
        bench: Bench::SymmetricBending,
        analysis_type: AnalysisType::Static,
        date_request: "2024-01-15".to_string(),
        date_due: Some("2024-02-15".to_string()),
        priority: 4,
        status: JobStatus::Running,
        components: vec!["lower_monolith".to_string(), "crown".to_string()],
        confidence: None,
        conclusion: None,
        report_path: None,
    })
    .await?;

    pool.insert_job(&CreateJobRequest {
        project_id: nrx.id,
        simulation_name: "Fatigue Analysis - Brake Load".to_string(),
        bench: Bench::BrakeLoad,
        analysis_type: AnalysisType::Fatigue,
        date_request: "2024-01-10".to_string(),
        date_due: Some("2024-01-30".to_string()),
        priority: 3,
        status: JobStatus::Queued,
        components: vec![
            "stanchion_left".to_string(),
            "stanchion_right".to_string(),
            "steerer".to_string(),
        ],
        confidence: None,
        conclusion: None,
        report_path: None,
    })
    .await?;

    pool.insert_job(&CreateJobRequest {
        project_id: legacy.id,
        simulation_name: "Old Legacy Test".to_string(),
        bench: Bench::Unknown,
        analysis_type: AnalysisType::Static,
        date_request: "2023-12-01".to_string(),
        date_due: None,
        priority: 2,
        status: JobStatus::Done,
        components: vec!["lower_monolith".to_string()],
        confidence: Some(85),
        conclusion: Some("Valid Design".to_string()),
        report_path: None,
    })
    .await?;

    // The demo legacy project starts archived
    pool.archive_project(legacy.id).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use crate::db::test_util::test_pool;
    use crate::models::JobFilters;

    fn config(environment: Environment) -> Config {
        Config {
            environment,
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite::memory:".to_string(),
            data_dir: std::path::PathBuf::from("./data"),
            static_dir: None,
            max_upload_size: 1024,
            session_ttl_hours: 24,
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let pool = test_pool().await;
        let cfg = config(Environment::Development);

        run(&pool, &cfg).await.unwrap();
        run(&pool, &cfg).await.unwrap();

        assert_eq!(pool.count_users().await.unwrap(), 2);
        assert_eq!(pool.list_projects(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_production_seed_creates_users_only() {
        let pool = test_pool().await;
        run(&pool, &config(Environment::Production)).await.unwrap();

        assert_eq!(pool.count_users().await.unwrap(), 2);
        assert!(pool.list_projects(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_development_seed_hides_archived_demo_jobs() {
        let pool = test_pool().await;
        run(&pool, &config(Environment::Development)).await.unwrap();

        let visible = pool.query_jobs(&JobFilters::default()).await.unwrap();
        assert_eq!(visible.len(), 2);

        let all = pool
            .query_jobs(&JobFilters {
                include_archived: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }
}
