//! Domain rules for the HRMS backend.
//!
//! Everything in this crate is pure logic with no database or HTTP
//! dependencies: status vocabularies, transition tables, derivation rules
//! (net salary, leave days, asset assignment), pagination arithmetic,
//! aggregation helpers, and validation plumbing shared by the `db` and
//! `api` crates.

pub mod asset;
pub mod attendance;
pub mod audit;
pub mod document;
pub mod employee;
pub mod error;
pub mod hashing;
pub mod leave;
pub mod pagination;
pub mod payroll;
pub mod recruitment;
pub mod roles;
pub mod separation;
pub mod stats;
pub mod training;
pub mod transition;
pub mod types;
pub mod upload;
pub mod validation;
