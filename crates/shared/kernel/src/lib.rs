//! Kernel utilities shared by the pipeline and the CLI.
//!
//! Everything here is a collaborator of the resolvers: it turns files and documents into
//! the typed inputs of [`mgen_domain`] and performs all of the I/O the core avoids.
//!
//! ## Catalog loading
//! ```rust
//! let catalog = mgen_kernel::config::load_catalog(None).unwrap();
//! assert_eq!(catalog.lowest_supported_major.get(), 5);
//! ```
//!
//! ## Inputs
//! ```rust
//! let config = mgen_kernel::inputs::parse_inputs(
//!     "github_repository: 'silverstripe/silverstripe-admin'\ngithub_my_ref: '2.1'\nphpunit: true",
//! )
//! .unwrap();
//! assert_eq!(config.repository_name(), "silverstripe-admin");
//! ```
pub mod config;
mod error;
pub mod inputs;
pub mod manifest;
pub mod project;

pub use crate::error::{KernelError, KernelErrorExt};
pub use mgen_domain as domain;
