//! Database operations for jobs, including the filtered list query.
//!
//! Equality predicates are pushed into SQL; archived-project exclusion,
//! free-text search, and sorting run over the joined rows so the null and
//! tie-break rules stay exact regardless of the SQLite collation.

use std::cmp::Ordering;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::job::{self, ActiveModel, Entity as Job};
use crate::entity::{file, project};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateJobRequest, JobFilters, SortOrder, UpdateJobRequest, components_to_json,
};

use super::DbPool;

/// Project name used when a job's owning project row is missing.
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

impl DbPool {
    /// Insert a new job.
    pub async fn insert_job(&self, req: &CreateJobRequest) -> AppResult<job::Model> {
        // Surface a clear 400 instead of an opaque foreign-key failure.
        self.get_project(req.project_id)
            .await?
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Project {} does not exist", req.project_id))
            })?;

        let now = Utc::now();

        let model = ActiveModel {
            project_id: Set(req.project_id),
            simulation_name: Set(req.simulation_name.clone()),
            bench: Set(req.bench.as_str().to_string()),
            analysis_type: Set(req.analysis_type.as_str().to_string()),
            date_request: Set(req.date_request.clone()),
            date_due: Set(req.date_due.clone()),
            priority: Set(req.priority),
            status: Set(req.status.as_str().to_string()),
            components: Set(components_to_json(&req.components)),
            confidence: Set(req.confidence),
            conclusion: Set(req.conclusion.clone()),
            report_path: Set(req.report_path.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert job: {}", e)))?;

        Ok(result)
    }

    /// Get a job by ID.
    pub async fn get_job(&self, id: i32) -> AppResult<Option<job::Model>> {
        let result = Job::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get job: {}", e)))?;

        Ok(result)
    }

    /// Get a job by ID together with its resolved project name.
    pub async fn get_job_with_project(&self, id: i32) -> AppResult<Option<(job::Model, String)>> {
        let result = Job::find_by_id(id)
            .find_also_related(project::Entity)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get job: {}", e)))?;

        Ok(result.map(|(job, project)| (job, project_name(project.as_ref()))))
    }

    /// Query jobs joined with their project name, applying the filter set.
    ///
    /// All supplied predicates compose with logical AND. Jobs of archived
    /// projects are excluded unless `include_archived` is set. Returns an
    /// empty vector, never an error, when nothing matches.
    pub async fn query_jobs(&self, filters: &JobFilters) -> AppResult<Vec<(job::Model, String)>> {
        let mut select = Job::find().find_also_related(project::Entity);

        if let Some(project_id) = filters.project_id {
            select = select.filter(job::Column::ProjectId.eq(project_id));
        }
        if let Some(status) = filters.status {
            select = select.filter(job::Column::Status.eq(status.as_str()));
        }
        if let Some(bench) = filters.bench {
            select = select.filter(job::Column::Bench.eq(bench.as_str()));
        }

        // Insertion (id) order is the tie-break baseline for the stable sort.
        let mut rows = select
            .order_by_asc(job::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query jobs: {}", e)))?;

        if !filters.include_archived {
            rows.retain(|(_, p)| !p.as_ref().is_some_and(|p| p.archived));
        }

        if let Some(ref search) = filters.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() {
                rows.retain(|(j, p)| {
                    let name = p.as_ref().map(|p| p.name.as_str()).unwrap_or(UNKNOWN_PROJECT);
                    [
                        name,
                        j.simulation_name.as_str(),
                        j.analysis_type.as_str(),
                        j.bench.as_str(),
                        j.status.as_str(),
                    ]
                    .iter()
                    .any(|hay| hay.to_lowercase().contains(&needle))
                });
            }
        }

        if let Some(ref key) = filters.sort_by {
            let order = filters.sort_order.unwrap_or_default();
            // Vec::sort_by is stable, so ties keep insertion order.
            rows.sort_by(|(a, _), (b, _)| compare_jobs(a, b, key, order));
        }

        Ok(rows
            .into_iter()
            .map(|(job, project)| {
                let name = project_name(project.as_ref());
                (job, name)
            })
            .collect())
    }

    /// Partially update a job. Fields present in the request overwrite the
    /// stored values; `components` replaces the whole list. `updated_at` is
    /// always refreshed.
    pub async fn update_job(&self, id: i32, updates: &UpdateJobRequest) -> AppResult<job::Model> {
        let job = self
            .get_job(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();

        if let Some(project_id) = updates.project_id {
            self.get_project(project_id).await?.ok_or_else(|| {
                AppError::InvalidInput(format!("Project {} does not exist", project_id))
            })?;
            active.project_id = Set(project_id);
        }
        if let Some(ref simulation_name) = updates.simulation_name {
            active.simulation_name = Set(simulation_name.clone());
        }
        if let Some(bench) = updates.bench {
            active.bench = Set(bench.as_str().to_string());
        }
        if let Some(analysis_type) = updates.analysis_type {
            active.analysis_type = Set(analysis_type.as_str().to_string());
        }
        if let Some(ref date_request) = updates.date_request {
            active.date_request = Set(date_request.clone());
        }
        if let Some(ref date_due) = updates.date_due {
            active.date_due = Set(Some(date_due.clone()));
        }
        if let Some(priority) = updates.priority {
            active.priority = Set(priority);
        }
        if let Some(status) = updates.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(ref components) = updates.components {
            active.components = Set(components_to_json(components));
        }
        if let Some(confidence) = updates.confidence {
            active.confidence = Set(Some(confidence));
        }
        if let Some(ref conclusion) = updates.conclusion {
            active.conclusion = Set(Some(conclusion.clone()));
        }
        if let Some(ref report_path) = updates.report_path {
            active.report_path = Set(Some(report_path.clone()));
        }

        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update job: {}", e)))?;

        Ok(result)
    }

    /// Record analysis results for a completed simulation.
    pub async fn update_job_analysis(
        &self,
        id: i32,
        confidence: Option<i32>,
        conclusion: Option<String>,
    ) -> AppResult<job::Model> {
        let job = self
            .get_job(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();
        if confidence.is_some() {
            active.confidence = Set(confidence);
        }
        if let Some(conclusion) = conclusion {
            active.conclusion = Set(Some(conclusion));
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update job analysis: {}", e)))?;

        Ok(result)
    }

    /// Point the job at its most recent HTML report upload.
    pub async fn set_job_report_path(&self, id: i32, report_path: &str) -> AppResult<job::Model> {
        let job = self
            .get_job(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();
        active.report_path = Set(Some(report_path.to_string()));
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to set report path: {}", e)))?;

        Ok(result)
    }

    /// Delete a job and its file rows. The caller is responsible for removing
    /// the job's on-disk artifact directory afterwards.
    pub async fn delete_job(&self, id: i32) -> AppResult<()> {
        self.get_job(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        // File rows cascade at the schema level too; the explicit delete keeps
        // the behavior independent of the foreign_keys pragma.
        file::Entity::delete_many()
            .filter(file::Column::JobId.eq(id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete job files: {}", e)))?;

        Job::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete job: {}", e)))?;

        Ok(())
    }
}

fn project_name(project: Option<&project::Model>) -> String {
    project
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
}

/// A job field value projected for sorting.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Int(i64),
    Text(String),
}

/// Project the named field of a job for sorting. Field names match the API's
/// wire format; unknown names yield no value and leave the order untouched.
fn sort_value(job: &job::Model, key: &str) -> Option<SortValue> {
    match key {
        "id" => Some(SortValue::Int(job.id as i64)),
        "projectId" => Some(SortValue::Int(job.project_id as i64)),
        "simulationName" => Some(SortValue::Text(job.simulation_name.clone())),
        "bench" => Some(SortValue::Text(job.bench.clone())),
        "type" => Some(SortValue::Text(job.analysis_type.clone())),
        "dateRequest" => Some(SortValue::Text(job.date_request.clone())),
        "dateDue" => job.date_due.clone().map(SortValue::Text),
        "priority" => Some(SortValue::Int(job.priority as i64)),
        "status" => Some(SortValue::Text(job.status.clone())),
        "confidence" => job.confidence.map(|c| SortValue::Int(c as i64)),
        "conclusion" => job.conclusion.clone().map(SortValue::Text),
        "reportPath" => job.report_path.clone().map(SortValue::Text),
        "createdAt" => Some(SortValue::Text(job.created_at.to_rfc3339())),
        "updatedAt" => Some(SortValue::Text(job.updated_at.to_rfc3339())),
        _ => None,
    }
}

/// Compare two jobs on the given field. Null values sort last regardless of
/// the requested direction; equal values report Equal so the stable sort
/// keeps insertion order.
fn compare_jobs(a: &job::Model, b: &job::Model, key: &str, order: SortOrder) -> Ordering {
    match (sort_value(a, key), sort_value(b, key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.cmp(&b);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use crate::db::test_util::test_pool;
    use crate::models::{AnalysisType, Bench, FileLabel, JobStatus, components_from_json};

    fn job_req(project_id: i32, name: &str) -> CreateJobRequest {
        CreateJobRequest {
            project_id,
            simulation_name: name.to_string(),
            bench: Bench::SymmetricBending,
            analysis_type: AnalysisType::Static,
            date_request: "2024-01-15".to_string(),
            date_due: None,
            priority: 3,
            status: JobStatus::Queued,
            components: vec!["crown".to_string()],
            confidence: None,
            conclusion: None,
            report_path: None,
        }
    }

    fn filters() -> JobFilters {
        JobFilters::default()
    }

    async fn pool_with_project(name: &str) -> (DbPool, i32) {
        let pool = test_pool().await;
        let project = pool.insert_project(name, false).await.unwrap();
        (pool, project.id)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips_all_fields() {
        let (pool, project_id) = pool_with_project("AION36").await;

        let req = CreateJobRequest {
            bench: Bench::BrakeLoad,
            analysis_type: AnalysisType::Fatigue,
            date_due: Some("2024-01-30".to_string()),
            priority: 5,
            status: JobStatus::Running,
            components: vec!["stanchion_left".to_string(), "stanchion_right".to_string()],
            confidence: Some(85),
            conclusion: Some("Valid Design".to_string()),
            ..job_req(project_id, "Fatigue Analysis - Brake Load")
        };

        let created = pool.insert_job(&req).await.unwrap();
        let fetched = pool.get_job(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.project_id, project_id);
        assert_eq!(fetched.simulation_name, "Fatigue Analysis - Brake Load");
        assert_eq!(fetched.bench, "brake-load");
        assert_eq!(fetched.analysis_type, "fatigue");
        assert_eq!(fetched.date_request, "2024-01-15");
        assert_eq!(fetched.date_due.as_deref(), Some("2024-01-30"));
        assert_eq!(fetched.priority, 5);
        assert_eq!(fetched.status, "running");
        assert_eq!(
            components_from_json(&fetched.components),
            vec!["stanchion_left".to_string(), "stanchion_right".to_string()]
        );
        assert_eq!(fetched.confidence, Some(85));
        assert_eq!(fetched.conclusion.as_deref(), Some("Valid Design"));
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn test_insert_job_requires_existing_project() {
        let pool = test_pool().await;
        let err = pool.insert_job(&job_req(42, "S1")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_query_filters_compose_with_and() {
        let (pool, p1) = pool_with_project("AION36").await;
        let p2 = pool.insert_project("NRX32-IL", false).await.unwrap().id;

        pool.insert_job(&CreateJobRequest {
            bench: Bench::BrakeLoad,
            status: JobStatus::Queued,
            ..job_req(p1, "A")
        })
        .await
        .unwrap();
        pool.insert_job(&CreateJobRequest {
            bench: Bench::BrakeLoad,
            status: JobStatus::Running,
            ..job_req(p1, "B")
        })
        .await
        .unwrap();
        pool.insert_job(&CreateJobRequest {
            bench: Bench::BrakeLoad,
            status: JobStatus::Queued,
            ..job_req(p2, "C")
        })
        .await
        .unwrap();

        let rows = pool
            .query_jobs(&JobFilters {
                status: Some(JobStatus::Queued),
                bench: Some(Bench::BrakeLoad),
                project_id: Some(p1),
                ..filters()
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.simulation_name, "A");
    }

    #[tokio::test]
    async fn test_query_returns_empty_vec_when_nothing_matches() {
        let (pool, p1) = pool_with_project("AION36").await;
        pool.insert_job(&job_req(p1, "A")).await.unwrap();

        let rows = pool
            .query_jobs(&JobFilters {
                status: Some(JobStatus::Failed),
                ..filters()
            })
            .await
            .unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_jobs_are_joined_with_project_name() {
        let (pool, p1) = pool_with_project("P1").await;
        pool.insert_job(&job_req(p1, "S1")).await.unwrap();

        let rows = pool
            .query_jobs(&JobFilters {
                project_id: Some(p1),
                ..filters()
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1, "P1");
    }

    #[tokio::test]
    async fn test_archived_projects_are_excluded_by_default() {
        let (pool, p1) = pool_with_project("P1").await;
        pool.insert_job(&job_req(p1, "S1")).await.unwrap();

        pool.archive_project(p1).await.unwrap();

        let default_rows = pool.query_jobs(&filters()).await.unwrap();
        assert!(default_rows.is_empty());

        let all_rows = pool
            .query_jobs(&JobFilters {
                include_archived: true,
                ..filters()
            })
            .await
            .unwrap();
        assert_eq!(all_rows.len(), 1);
        assert_eq!(all_rows[0].1, "P1");

        // Direct-by-id access is unaffected by archival
        assert!(pool.get_job(all_rows[0].0.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_search_matches_bench_case_insensitively() {
        let (pool, p1) = pool_with_project("AION36").await;
        pool.insert_job(&CreateJobRequest {
            bench: Bench::BrakeLoad,
            ..job_req(p1, "Fatigue Analysis")
        })
        .await
        .unwrap();
        pool.insert_job(&job_req(p1, "Static Analysis")).await.unwrap();

        let rows = pool
            .query_jobs(&JobFilters {
                search: Some("BRAKE".to_string()),
                ..filters()
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.simulation_name, "Fatigue Analysis");
    }

    #[tokio::test]
    async fn test_search_matches_project_and_simulation_name() {
        let (pool, p1) = pool_with_project("AION36").await;
        let p2 = pool.insert_project("NRX32-IL", false).await.unwrap().id;
        pool.insert_job(&job_req(p1, "Crown check")).await.unwrap();
        pool.insert_job(&job_req(p2, "Steerer check")).await.unwrap();

        let by_project = pool
            .query_jobs(&JobFilters {
                search: Some("nrx".to_string()),
                ..filters()
            })
            .await
            .unwrap();
        assert_eq!(by_project.len(), 1);
        assert_eq!(by_project[0].0.simulation_name, "Steerer check");

        let by_name = pool
            .query_jobs(&JobFilters {
                search: Some("crown".to_string()),
                ..filters()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].0.simulation_name, "Crown check");
    }

    #[tokio::test]
    async fn test_sort_by_priority_both_directions() {
        let (pool, p1) = pool_with_project("AION36").await;
        for priority in [3, 1, 5, 2] {
            pool.insert_job(&CreateJobRequest {
                priority,
                ..job_req(p1, &format!("prio-{}", priority))
            })
            .await
            .unwrap();
        }

        let asc = pool
            .query_jobs(&JobFilters {
                sort_by: Some("priority".to_string()),
                ..filters()
            })
            .await
            .unwrap();
        let priorities: Vec<i32> = asc.iter().map(|(j, _)| j.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 5]);

        let desc = pool
            .query_jobs(&JobFilters {
                sort_by: Some("priority".to_string()),
                sort_order: Some(SortOrder::Desc),
                ..filters()
            })
            .await
            .unwrap();
        let priorities: Vec<i32> = desc.iter().map(|(j, _)| j.priority).collect();
        assert_eq!(priorities, vec![5, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_nulls_sort_last_in_both_directions() {
        let (pool, p1) = pool_with_project("AION36").await;
        pool.insert_job(&CreateJobRequest {
            date_due: None,
            ..job_req(p1, "no-due")
        })
        .await
        .unwrap();
        pool.insert_job(&CreateJobRequest {
            date_due: Some("2024-02-01".to_string()),
            ..job_req(p1, "early")
        })
        .await
        .unwrap();
        pool.insert_job(&CreateJobRequest {
            date_due: Some("2024-03-01".to_string()),
            ..job_req(p1, "late")
        })
        .await
        .unwrap();

        let asc = pool
            .query_jobs(&JobFilters {
                sort_by: Some("dateDue".to_string()),
                ..filters()
            })
            .await
            .unwrap();
        let names: Vec<&str> = asc.iter().map(|(j, _)| j.simulation_name.as_str()).collect();
        assert_eq!(names, vec!["early", "late", "no-due"]);

        let desc = pool
            .query_jobs(&JobFilters {
                sort_by: Some("dateDue".to_string()),
                sort_order: Some(SortOrder::Desc),
                ..filters()
            })
            .await
            .unwrap();
        let names: Vec<&str> = desc.iter().map(|(j, _)| j.simulation_name.as_str()).collect();
        assert_eq!(names, vec!["late", "early", "no-due"]);
    }

    #[tokio::test]
    async fn test_sort_ties_keep_insertion_order() {
        let (pool, p1) = pool_with_project("AION36").await;
        for name in ["first", "second", "third"] {
            pool.insert_job(&job_req(p1, name)).await.unwrap();
        }

        let rows = pool
            .query_jobs(&JobFilters {
                sort_by: Some("priority".to_string()),
                ..filters()
            })
            .await
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|(j, _)| j.simulation_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_unknown_sort_key_preserves_order() {
        let (pool, p1) = pool_with_project("AION36").await;
        for name in ["first", "second"] {
            pool.insert_job(&job_req(p1, name)).await.unwrap();
        }

        let rows = pool
            .query_jobs(&JobFilters {
                sort_by: Some("nonsense".to_string()),
                ..filters()
            })
            .await
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|(j, _)| j.simulation_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_named_fields() {
        let (pool, p1) = pool_with_project("AION36").await;
        let created = pool.insert_job(&job_req(p1, "S1")).await.unwrap();

        let updated = pool
            .update_job(
                created.id,
                &UpdateJobRequest {
                    status: Some(JobStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, "done");
        assert_eq!(updated.simulation_name, created.simulation_name);
        assert_eq!(updated.bench, created.bench);
        assert_eq!(updated.priority, created.priority);
        assert_eq!(updated.date_request, created.date_request);
        assert_eq!(updated.components, created.components);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_replaces_component_list_wholesale() {
        let (pool, p1) = pool_with_project("AION36").await;
        let created = pool
            .insert_job(&CreateJobRequest {
                components: vec!["crown".to_string(), "steerer".to_string()],
                ..job_req(p1, "S1")
            })
            .await
            .unwrap();

        let updated = pool
            .update_job(
                created.id,
                &UpdateJobRequest {
                    components: Some(vec!["lower_monolith".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            components_from_json(&updated.components),
            vec!["lower_monolith".to_string()]
        );
    }

    #[tokio::test]
    async fn test_update_missing_job_is_not_found() {
        let pool = test_pool().await;
        let err = pool
            .update_job(7, &UpdateJobRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_job_analysis() {
        let (pool, p1) = pool_with_project("AION36").await;
        let created = pool.insert_job(&job_req(p1, "S1")).await.unwrap();

        let updated = pool
            .update_job_analysis(created.id, Some(85), Some("Valid Design".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.confidence, Some(85));
        assert_eq!(updated.conclusion.as_deref(), Some("Valid Design"));

        // Absent fields are left alone
        let updated = pool
            .update_job_analysis(created.id, None, None)
            .await
            .unwrap();
        assert_eq!(updated.confidence, Some(85));
        assert_eq!(updated.conclusion.as_deref(), Some("Valid Design"));
    }

    #[tokio::test]
    async fn test_delete_job_cascades_to_files() {
        let (pool, p1) = pool_with_project("AION36").await;
        let job = pool.insert_job(&job_req(p1, "S1")).await.unwrap();

        pool.insert_file(
            job.id,
            &FileLabel::Mesh,
            "fork.stl",
            "1/mesh_1.stl",
            "application/octet-stream",
            1024,
        )
        .await
        .unwrap();

        pool.delete_job(job.id).await.unwrap();

        assert!(pool.get_job(job.id).await.unwrap().is_none());
        assert!(pool.get_job_files(job.id).await.unwrap().is_empty());

        let err = pool.delete_job(job.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_scenario_single_project_listing() {
        let (pool, p1) = pool_with_project("P1").await;
        pool.insert_job(&CreateJobRequest {
            priority: 3,
            components: vec!["crown".to_string()],
            ..job_req(p1, "S1")
        })
        .await
        .unwrap();

        let rows = pool
            .query_jobs(&JobFilters {
                project_id: Some(p1),
                ..filters()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.simulation_name, "S1");
        assert_eq!(rows[0].1, "P1");

        // Archive P1: gone from the default view, present with includeArchived
        pool.archive_project(p1).await.unwrap();
        assert!(pool.query_jobs(&filters()).await.unwrap().is_empty());
        let rows = pool
            .query_jobs(&JobFilters {
                include_archived: true,
                ..filters()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
