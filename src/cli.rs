use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compact_str::CompactString;
use gitlab_runners::{
    client::{
        GitlabApi, ObjectifiedHash, PaginatedResponse, RunnerJobsOptions, RunnerListOptions,
        UpdateRunnerOptions,
    },
    domain::{JobStatus, RunnerStatus, RunnerType},
    id::{GroupId, ProjectId, RunnerId},
};
use serde_json::{json, Value};
use tracing::info;

use crate::result::{AppError, Result};

/// Manage GitLab CI runners from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Alternate path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Print the path to the configuration file and exit.
    #[arg(short, long)]
    pub print_config_path: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List runners available to the current user
    List {
        /// List every runner in the instance (administrators only)
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        filter: ListFilter,
    },
    /// Show a runner's details
    Show { id: RunnerId },
    /// Update a runner
    Update {
        id: RunnerId,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        paused: Option<bool>,
        #[arg(long)]
        locked: Option<bool>,
        #[arg(long)]
        run_untagged: Option<bool>,
        /// Replace the runner's tags; repeat for several tags
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Maximum job timeout in seconds
        #[arg(long)]
        maximum_timeout: Option<u32>,
    },
    /// Delete a runner
    Delete { id: RunnerId },
    /// List jobs processed by a runner
    Jobs {
        id: RunnerId,
        #[arg(long)]
        status: Option<JobStatus>,
    },
    /// List runners available to a project
    ProjectRunners {
        project: ProjectId,
        #[command(flatten)]
        filter: ListFilter,
    },
    /// Assign a runner to a project
    Enable { project: ProjectId, runner: RunnerId },
    /// Unassign a runner from a project
    Disable { project: ProjectId, runner: RunnerId },
    /// List runners available to a group
    GroupRunners {
        group: GroupId,
        #[command(flatten)]
        filter: ListFilter,
    },
    /// Check that a runner authentication token is valid
    Verify { token: String },
    /// Write the GitLab endpoint and token to the configuration file
    Configure {
        /// API endpoint, e.g. https://gitlab.example.com/api/v4
        #[arg(long)]
        url: String,
        #[arg(long)]
        token: String,
        #[arg(long)]
        log_level: Option<String>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ListFilter {
    /// instance_type, group_type or project_type
    #[arg(long = "type")]
    runner_type: Option<RunnerType>,
    /// online, offline, stale or never_contacted
    #[arg(long)]
    status: Option<RunnerStatus>,
    #[arg(long)]
    paused: Option<bool>,
    /// Only runners with this tag; repeat for several tags
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    per_page: Option<u32>,
}

impl ListFilter {
    fn to_options(&self) -> RunnerListOptions {
        RunnerListOptions {
            runner_type: self.runner_type,
            status: self.status,
            paused: self.paused,
            tag_list: to_tag_list(&self.tags),
            page: self.page,
            per_page: self.per_page,
        }
    }
}

fn to_tag_list(tags: &[String]) -> Option<Vec<CompactString>> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.iter().map(CompactString::from).collect())
    }
}

/// Run a command and return the hydrated response as JSON
pub async fn execute(api: &GitlabApi, command: Command) -> Result<Value> {
    info!(command = ?command, "Executing command");

    let output = match command {
        Command::List { all: false, filter } => list_json(api.runners(&filter.to_options()).await?),
        Command::List { all: true, filter } => {
            list_json(api.all_runners(&filter.to_options()).await?)
        },
        Command::Show { id } => api.runner(id).await?.to_value(),
        Command::Update {
            id,
            description,
            paused,
            locked,
            run_untagged,
            tags,
            maximum_timeout,
        } => {
            let options = UpdateRunnerOptions {
                description: description.map(|d| Some(d.into())),
                paused,
                locked,
                run_untagged,
                tag_list: to_tag_list(&tags),
                maximum_timeout: maximum_timeout.map(Some),
                ..Default::default()
            };
            api.update_runner(id, &options).await?.to_value()
        },
        Command::Delete { id } => optional_json(api.delete_runner(id).await?),
        Command::Jobs { id, status } => {
            let options = RunnerJobsOptions { status, ..Default::default() };
            list_json(api.runner_jobs(id, &options).await?)
        },
        Command::ProjectRunners { project, filter } => {
            list_json(api.project_runners(project, &filter.to_options()).await?)
        },
        Command::Enable { project, runner } => {
            api.project_enable_runner(project, runner).await?.to_value()
        },
        Command::Disable { project, runner } => {
            optional_json(api.project_disable_runner(project, runner).await?)
        },
        Command::GroupRunners { group, filter } => {
            list_json(api.group_runners(group, &filter.to_options()).await?)
        },
        Command::Verify { token } => match api.verify_auth_registered_runner(&token).await? {
            Some(object) => object.to_value(),
            None => json!({ "valid": true }),
        },
        Command::Configure { .. } => {
            return Err(AppError::GeneralError("configure does not call the API".into()))
        },
    };

    Ok(output)
}

fn list_json(page: PaginatedResponse<ObjectifiedHash>) -> Value {
    Value::Array(page.iter().map(ObjectifiedHash::to_value).collect())
}

fn optional_json(object: Option<ObjectifiedHash>) -> Value {
    object.map(|o| o.to_value()).unwrap_or(Value::Null)
}
