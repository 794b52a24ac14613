//! Business logic services.

pub mod storage;

pub use storage::Storage;
