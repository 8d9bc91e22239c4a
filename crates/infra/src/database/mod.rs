//! Database implementations

mod columns;

pub mod attendance_repository;
pub mod bill_repository;
pub mod manager;
pub mod worker_repository;

pub use attendance_repository::*;
pub use bill_repository::*;
pub use manager::*;
pub use worker_repository::*;
