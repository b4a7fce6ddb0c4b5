//! # Matrix builder
//!
//! Turns resolved inputs into CI jobs:
//!
//! * unit tests run once per row of the major's engine table, the first row with
//!   `--prefer-lowest`;
//! * coverage, linting, end-to-end (once per `@job<N>` tag), docs and JS run once on the
//!   lowest runtime and the default engine;
//! * caller-supplied extra jobs follow, then identical jobs are dropped and every job is named.

mod builder;
mod error;
mod naming;
mod suite;

pub use builder::{MatrixBuilder, MatrixRequest, runtime_slot};
pub use error::{MatrixError, MatrixErrorExt};
pub use naming::job_name;
pub use suite::Suite;
