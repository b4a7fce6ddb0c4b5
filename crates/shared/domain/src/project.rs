use serde::{Deserialize, Serialize};

/// A feature file found in the project and the `@job<N>` tag it carries, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFile {
    pub path: String,
    pub job_tag: Option<u32>,
}

impl FeatureFile {
    #[must_use]
    pub fn tagged(path: impl Into<String>, job: u32) -> Self {
        Self { path: path.into(), job_tag: Some(job) }
    }

    #[must_use]
    pub fn untagged(path: impl Into<String>) -> Self {
        Self { path: path.into(), job_tag: None }
    }
}
