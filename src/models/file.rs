//! File attachment models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What an uploaded artifact is, from the engineer's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileLabel {
    /// Mesh geometry (STL, MSH, ...)
    Mesh,
    /// Solver input deck
    InpFile,
    /// Solver output log
    ResultLog,
    /// HTML result report
    Report,
    /// Anything else
    General,
}

impl FileLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mesh => "mesh",
            Self::InpFile => "inp_file",
            Self::ResultLog => "result_log",
            Self::Report => "report",
            Self::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mesh" => Some(Self::Mesh),
            "inp_file" => Some(Self::InpFile),
            "result_log" => Some(Self::ResultLog),
            "report" => Some(Self::Report),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File metadata as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: i32,
    pub job_id: i32,
    pub label: FileLabel,
    pub filename: String,
    /// Storage key, usable with the file-serving endpoint.
    pub path: String,
    pub mimetype: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<crate::entity::file::Model> for FileResponse {
    fn from(m: crate::entity::file::Model) -> Self {
        Self {
            id: m.id,
            job_id: m.job_id,
            label: FileLabel::parse(&m.label).unwrap_or(FileLabel::General),
            filename: m.filename,
            path: m.path,
            mimetype: m.mimetype,
            size: m.size,
            uploaded_at: m.uploaded_at,
        }
    }
}
