//! Facade crate for the matrix generator.
//! Re-exports the domain and kernel primitives and wires the resolvers into one pipeline.
//! Keep this crate thin: it composes the feature crates, it does not implement policy.
//!
//! ## Usage
//! ```rust
//! use mgen::{GenerateRequest, generate};
//! use mgen::domain::config::MatrixConfig;
//! use mgen::domain::suites::SuiteSet;
//!
//! let catalog = mgen::kernel::config::load_catalog(None).unwrap();
//! let config = MatrixConfig::new("silverstripe/silverstripe-framework", "5")
//!     .with_suites(SuiteSet::PHPUNIT);
//! let matrix = generate(&GenerateRequest::new(config), &catalog).unwrap();
//! assert_eq!(matrix.include[0].name, "8.1 prf-low mysql57 phpunit all");
//! ```

mod error;
mod pipeline;

pub use error::{GenerateError, GenerateErrorExt};
pub use pipeline::{GenerateRequest, generate};

pub use mgen_domain as domain;
pub use mgen_kernel as kernel;

/// The resolvers, for callers that need a single stage.
pub mod features {
    pub use mgen_branch as branch;
    pub use mgen_installer as installer;
    pub use mgen_matrix as matrix;
    pub use mgen_runtime as runtime;
}
