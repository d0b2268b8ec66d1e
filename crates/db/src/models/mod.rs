//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO whose rules run before any write
//! - A `Deserialize` update DTO (all `Option` fields) merged onto the stored
//!   row and re-validated as a create DTO
//! - A query struct for list filters and a populated `*Detail` view

pub mod asset;
pub mod attendance;
pub mod audit;
pub mod common;
pub mod dashboard;
pub mod document;
pub mod employee;
pub mod leave;
pub mod recruitment;
pub mod salary;
pub mod separation;
pub mod training;
pub mod user;
