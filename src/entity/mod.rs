//! SeaORM entity definitions for the SQLite database.

pub mod file;
pub mod job;
pub mod project;
pub mod session;
pub mod user;
