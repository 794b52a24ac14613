//! Simulation job entity.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub simulation_name: String,
    /// Test rig configuration: symmetric-bending, brake-load, unknown
    pub bench: String,
    /// Analysis type: static, fatigue
    #[sea_orm(column_name = "type")]
    pub analysis_type: String,
    pub date_request: String,
    pub date_due: Option<String>,
    /// 1 (lowest) to 5 (highest)
    pub priority: i32,
    /// queued, running, done, failed
    pub status: String,
    /// JSON array of component identifiers under test
    #[sea_orm(column_type = "Json")]
    pub components: JsonValue,
    /// Engineer-entered confidence percentage, 0-100
    pub confidence: Option<i32>,
    pub conclusion: Option<String>,
    /// Storage key of the most recent HTML report upload
    pub report_path: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
    #[sea_orm(has_many = "super::file::Entity")]
    Files,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
