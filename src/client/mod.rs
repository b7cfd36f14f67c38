//! GitLab runners client
//!
//! `GitlabApi` owns the HTTP client and maps each operation in `runners` to
//! exactly one request. Responses are hydrated into `ObjectifiedHash` values
//! or a `PaginatedResponse` of them.

pub mod api;
pub mod config;
pub mod error;
pub mod hydrate;
pub mod options;
pub mod pagination;
mod runners;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use api::GitlabApi;
pub use config::{ClientConfig, DebugConfig, RequestConfig, TokenKind};
pub use error::{ClientError, Result};
pub use hydrate::{Hydrated, ObjectifiedHash};
pub use options::{
    CreateRunnerOptions, RegisterRunnerOptions, RunnerJobsOptions, RunnerListOptions,
    UpdateRunnerOptions,
};
pub use pagination::{PageInfo, PageLinks, PaginatedResponse};
