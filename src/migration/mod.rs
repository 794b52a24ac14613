//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_projects;
mod m20250301_000003_create_jobs;
mod m20250301_000004_create_files;
mod m20250301_000005_create_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_projects::Migration),
            Box::new(m20250301_000003_create_jobs::Migration),
            Box::new(m20250301_000004_create_files::Migration),
            Box::new(m20250301_000005_create_sessions::Migration),
        ]
    }
}
