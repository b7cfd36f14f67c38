//! Client library for the GitLab CI runners API.
//!
//! ```no_run
//! use gitlab_runners::{
//!     client::{ClientConfig, GitlabApi, RunnerListOptions},
//!     domain::{Runner, RunnerType},
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = GitlabApi::new(ClientConfig::new("https://gitlab.com/api/v4", "glpat-..."))?;
//! let page = api.runners(&RunnerListOptions::of_type(RunnerType::InstanceType)).await?;
//! for runner in &page {
//!     let runner: Runner = runner.parse()?;
//!     println!("{} {:?}", runner.id, runner.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod domain;
pub mod id;
