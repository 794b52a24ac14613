//! Simulation job models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Test rig configuration a job runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Bench {
    SymmetricBending,
    BrakeLoad,
    Unknown,
}

impl Bench {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SymmetricBending => "symmetric-bending",
            Self::BrakeLoad => "brake-load",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "symmetric-bending" => Some(Self::SymmetricBending),
            "brake-load" => Some(Self::BrakeLoad),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for Bench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of analysis requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Static,
    Fatigue,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Fatigue => "fatigue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "static" => Some(Self::Static),
            "fatigue" => Some(Self::Fatigue),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a simulation job.
///
/// The server only records transitions; the external simulation process
/// itself is not modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "done" => Some(Self::Done),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction for job listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Request to create a job.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub project_id: i32,
    pub simulation_name: String,
    pub bench: Bench,
    #[serde(rename = "type")]
    pub analysis_type: AnalysisType,
    pub date_request: String,
    #[serde(default)]
    pub date_due: Option<String>,
    pub priority: i32,
    pub status: JobStatus,
    /// Component identifiers under test; defaults to empty.
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub confidence: Option<i32>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
}

impl CreateJobRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.simulation_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Simulation name must not be empty".to_string(),
            ));
        }
        validate_priority(self.priority)?;
        if let Some(confidence) = self.confidence {
            validate_confidence(confidence)?;
        }
        Ok(())
    }
}

/// Partial update for a job. Fields present in the payload overwrite the
/// stored values; `components` replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[serde(default)]
    pub project_id: Option<i32>,
    #[serde(default)]
    pub simulation_name: Option<String>,
    #[serde(default)]
    pub bench: Option<Bench>,
    #[serde(default, rename = "type")]
    pub analysis_type: Option<AnalysisType>,
    #[serde(default)]
    pub date_request: Option<String>,
    #[serde(default)]
    pub date_due: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub components: Option<Vec<String>>,
    #[serde(default)]
    pub confidence: Option<i32>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
}

impl UpdateJobRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref name) = self.simulation_name
            && name.trim().is_empty()
        {
            return Err(AppError::InvalidInput(
                "Simulation name must not be empty".to_string(),
            ));
        }
        if let Some(priority) = self.priority {
            validate_priority(priority)?;
        }
        if let Some(confidence) = self.confidence {
            validate_confidence(confidence)?;
        }
        Ok(())
    }
}

/// Analysis result update (confidence and conclusion only).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisUpdateRequest {
    #[serde(default)]
    pub confidence: Option<i32>,
    #[serde(default)]
    pub conclusion: Option<String>,
}

impl AnalysisUpdateRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(confidence) = self.confidence {
            validate_confidence(confidence)?;
        }
        Ok(())
    }
}

fn validate_priority(priority: i32) -> AppResult<()> {
    if !(1..=5).contains(&priority) {
        return Err(AppError::InvalidInput(
            "Priority must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn validate_confidence(confidence: i32) -> AppResult<()> {
    if !(0..=100).contains(&confidence) {
        return Err(AppError::InvalidInput(
            "Confidence must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Query parameters for listing jobs.
///
/// All predicates compose with logical AND.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFilters {
    /// Exact-match status filter.
    pub status: Option<JobStatus>,
    /// Exact-match bench filter.
    pub bench: Option<Bench>,
    /// Case-insensitive substring match over project name, simulation name,
    /// type, bench, and status.
    pub search: Option<String>,
    /// Job field name to sort by; unknown names leave the natural order.
    pub sort_by: Option<String>,
    /// Sort direction, ascending by default.
    pub sort_order: Option<SortOrder>,
    /// Exact-match owning project filter.
    pub project_id: Option<i32>,
    /// Include jobs whose project is archived.
    pub include_archived: bool,
}

/// Job as returned by the API, enriched with the owning project's name.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: i32,
    pub project_id: i32,
    pub project_name: String,
    pub simulation_name: String,
    pub bench: Bench,
    #[serde(rename = "type")]
    pub analysis_type: AnalysisType,
    pub date_request: String,
    pub date_due: Option<String>,
    pub priority: i32,
    pub status: JobStatus,
    pub components: Vec<String>,
    pub confidence: Option<i32>,
    pub conclusion: Option<String>,
    pub report_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobResponse {
    /// Build a response from a job row and its resolved project name.
    pub fn from_model(job: crate::entity::job::Model, project_name: String) -> Self {
        Self {
            id: job.id,
            project_id: job.project_id,
            project_name,
            simulation_name: job.simulation_name,
            bench: Bench::parse(&job.bench).unwrap_or(Bench::Unknown),
            analysis_type: AnalysisType::parse(&job.analysis_type).unwrap_or(AnalysisType::Static),
            date_request: job.date_request,
            date_due: job.date_due,
            priority: job.priority,
            status: JobStatus::parse(&job.status).unwrap_or(JobStatus::Queued),
            components: components_from_json(&job.components),
            confidence: job.confidence,
            conclusion: job.conclusion,
            report_path: job.report_path,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Decode the stored JSON component list; malformed values collapse to empty.
pub fn components_from_json(value: &JsonValue) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Encode a component list for storage.
pub fn components_to_json(components: &[String]) -> JsonValue {
    serde_json::to_value(components).unwrap_or_else(|_| JsonValue::Array(Vec::new()))
}
