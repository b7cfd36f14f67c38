// GitLab Runners API Documentation: https://docs.gitlab.com/ee/api/runners.html
use std::str::FromStr;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::id::{JobId, ProjectId, RunnerId};

/// Typed view of a runner as returned by the list and detail endpoints.
///
/// Detail-only fields (`tag_list`, `locked`, ...) are `None` on list items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Runner {
    pub id: RunnerId,
    pub description: Option<CompactString>,
    pub ip_address: Option<CompactString>,
    pub active: Option<bool>,
    pub paused: Option<bool>,
    pub is_shared: Option<bool>,
    pub runner_type: Option<RunnerType>,
    pub name: Option<CompactString>,
    pub online: Option<bool>,
    pub status: Option<CompactString>,
    pub tag_list: Option<Vec<CompactString>>,
    pub run_untagged: Option<bool>,
    pub locked: Option<bool>,
    pub access_level: Option<AccessLevel>,
    pub maximum_timeout: Option<u32>,
    pub maintenance_note: Option<CompactString>,
    pub contacted_at: Option<DateTime<Utc>>,
}

/// Response of the registration and creation endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunnerToken {
    pub id: RunnerId,
    pub token: CompactString,
    pub token_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunnerJob {
    pub id: JobId,
    pub name: CompactString,
    pub stage: CompactString,
    pub status: JobStatus,
    #[serde(rename = "ref")]
    pub branch: Option<CompactString>,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
    pub web_url: Option<CompactString>,
    pub project: Option<JobProject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobProject {
    pub id: ProjectId,
    pub name: CompactString,
    pub path_with_namespace: Option<CompactString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerType {
    InstanceType,
    GroupType,
    ProjectType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerStatus {
    Online,
    Offline,
    Stale,
    NeverContacted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    NotProtected,
    RefProtected,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Created,
    WaitingForResource,
    Preparing,
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
    Skipped,
    Manual,
    Scheduled,
    /// A status this client does not know; received only, never sent
    #[serde(other, skip_serializing)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOrderBy {
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parses the wire name of a unit variant, e.g. `"group_type"`
macro_rules! wire_name_from_str {
    ($($name:ident),*) => {$(
        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                serde_json::from_value(serde_json::Value::String(s.into()))
                    .map_err(|_| format!("invalid {}: {s}", stringify!($name)))
            }
        }
    )*};
}

wire_name_from_str!(RunnerType, RunnerStatus, AccessLevel, SortOrder);

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match serde_json::from_value(serde_json::Value::String(s.into())) {
            Ok(JobStatus::Unknown) | Err(_) => Err(format!("invalid JobStatus: {s}")),
            Ok(status) => Ok(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_runner_from_list_item() {
        let runner: Runner = serde_json::from_value(json!({
            "active": true,
            "paused": false,
            "description": "test-1-20150125",
            "id": 6,
            "ip_address": "127.0.0.1",
            "is_shared": false,
            "runner_type": "project_type",
            "name": null,
            "online": true,
            "status": "online"
        }))
        .unwrap();

        assert_eq!(runner.id, RunnerId::new(6));
        assert_eq!(runner.description.as_deref(), Some("test-1-20150125"));
        assert_eq!(runner.runner_type, Some(RunnerType::ProjectType));
        assert_eq!(runner.tag_list, None);
        assert_eq!(runner.name, None);
    }

    #[test]
    fn test_runner_token_with_null_expiry() {
        let token: RunnerToken = serde_json::from_value(json!({
            "id": 12345,
            "token": "glrt-kyahzxLaj4Dc1jQf4xjX",
            "token_expires_at": null
        }))
        .unwrap();

        assert_eq!(token.id, RunnerId::new(12345));
        assert_eq!(token.token_expires_at, None);
    }

    #[test]
    fn test_enums_use_wire_names() {
        assert_eq!("instance_type".parse::<RunnerType>().unwrap(), RunnerType::InstanceType);
        assert_eq!("ref_protected".parse::<AccessLevel>().unwrap(), AccessLevel::RefProtected);
        assert!("bogus".parse::<RunnerType>().is_err());
        assert_eq!(
            serde_json::to_value(RunnerStatus::NeverContacted).unwrap(),
            json!("never_contacted")
        );
    }

    #[test]
    fn test_unknown_job_status() {
        let status: JobStatus = serde_json::from_value(json!("waiting_for_resource")).unwrap();
        assert_eq!(status, JobStatus::WaitingForResource);

        let status: JobStatus = serde_json::from_value(json!("deferred")).unwrap();
        assert_eq!(status, JobStatus::Unknown);
        assert!(serde_json::to_value(JobStatus::Unknown).is_err());
    }

    #[test]
    fn test_job_status_from_str() {
        assert_eq!("scheduled".parse::<JobStatus>().unwrap(), JobStatus::Scheduled);
        assert_eq!("preparing".parse::<JobStatus>().unwrap(), JobStatus::Preparing);
        assert!("runing".parse::<JobStatus>().is_err());
        assert!("unknown".parse::<JobStatus>().is_err());
    }
}
