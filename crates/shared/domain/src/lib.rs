//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O or policy decisions, just data and simple lookups.
//!
//! * [`version`] - release majors, release lines and runtime versions.
//! * [`catalog`] - the static reference data every resolver consults.
//! * [`config`] - the validated matrix request.
//! * [`job`] - job descriptors and the emitted matrix document.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod installer;
pub mod job;
pub mod manifest;
pub mod project;
pub mod suites;
pub mod version;
