//! Query and body options for runner operations
//!
//! Every field is optional and unset fields are never sent. Fields GitLab
//! allows to be cleared are `Option<Option<T>>`: `None` omits the key,
//! `Some(None)` sends `null`.

use compact_str::CompactString;
use derive_builder::Builder;
use itertools::Itertools;
use serde::{Serialize, Serializer};
use serde_with::rust::double_option;

use crate::{
    domain::{AccessLevel, JobOrderBy, JobStatus, RunnerStatus, RunnerType, SortOrder},
    id::{GroupId, ProjectId},
};

/// Filters for the runner list endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Builder)]
#[builder(pattern = "owned", default, setter(into, strip_option))]
pub struct RunnerListOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub runner_type: Option<RunnerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RunnerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "comma_separated")]
    pub tag_list: Option<Vec<CompactString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl RunnerListOptions {
    pub fn builder() -> RunnerListOptionsBuilder {
        RunnerListOptionsBuilder::default()
    }

    /// Only runners of the given scope
    pub fn of_type(runner_type: RunnerType) -> Self {
        Self { runner_type: Some(runner_type), ..Default::default() }
    }
}

/// Filters for the jobs a runner has processed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Builder)]
#[builder(pattern = "owned", default, setter(into, strip_option))]
pub struct RunnerJobsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<JobOrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl RunnerJobsOptions {
    pub fn builder() -> RunnerJobsOptionsBuilder {
        RunnerJobsOptionsBuilder::default()
    }

    pub fn by_status(status: JobStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }
}

/// Body fields for `PUT /runners/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateRunnerOptions {
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Option<Option<CompactString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<CompactString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_untagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub maximum_timeout: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "double_option")]
    pub maintenance_note: Option<Option<CompactString>>,
}

impl UpdateRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<CompactString>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Send `description: null`
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = Some(paused);
        self
    }

    pub fn with_tag_list<T: Into<CompactString>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.tag_list = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_run_untagged(mut self, run_untagged: bool) -> Self {
        self.run_untagged = Some(run_untagged);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = Some(access_level);
        self
    }

    pub fn with_maximum_timeout(mut self, seconds: u32) -> Self {
        self.maximum_timeout = Some(Some(seconds));
        self
    }

    /// Send `maximum_timeout: null`, removing the limit
    pub fn clear_maximum_timeout(mut self) -> Self {
        self.maximum_timeout = Some(None);
        self
    }

    pub fn with_maintenance_note(mut self, note: impl Into<CompactString>) -> Self {
        self.maintenance_note = Some(Some(note.into()));
        self
    }

    pub fn clear_maintenance_note(mut self) -> Self {
        self.maintenance_note = Some(None);
        self
    }
}

/// Body fields for the legacy `POST /runners` registration, besides the token
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegisterRunnerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<CompactString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_untagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<CompactString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_note: Option<CompactString>,
}

impl RegisterRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<CompactString>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = Some(paused);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_run_untagged(mut self, run_untagged: bool) -> Self {
        self.run_untagged = Some(run_untagged);
        self
    }

    pub fn with_tag_list<T: Into<CompactString>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.tag_list = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = Some(access_level);
        self
    }

    pub fn with_maximum_timeout(mut self, seconds: u32) -> Self {
        self.maximum_timeout = Some(seconds);
        self
    }

    pub fn with_maintenance_note(mut self, note: impl Into<CompactString>) -> Self {
        self.maintenance_note = Some(note.into());
        self
    }
}

/// Body fields for `POST /user/runners`, besides the scope discriminator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateRunnerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<CompactString>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<CompactString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_untagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_note: Option<CompactString>,
}

impl CreateRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag_list<T: Into<CompactString>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.tag_list = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, description: impl Into<CompactString>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = Some(paused);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_run_untagged(mut self, run_untagged: bool) -> Self {
        self.run_untagged = Some(run_untagged);
        self
    }

    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = Some(access_level);
        self
    }

    pub fn with_maximum_timeout(mut self, seconds: u32) -> Self {
        self.maximum_timeout = Some(seconds);
        self
    }

    pub fn with_maintenance_note(mut self, note: impl Into<CompactString>) -> Self {
        self.maintenance_note = Some(note.into());
        self
    }
}

/// Complete `POST /user/runners` body
#[derive(Debug, Serialize)]
pub(crate) struct CreateRunnerBody<'a> {
    pub runner_type: RunnerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(flatten)]
    pub options: &'a CreateRunnerOptions,
}

/// Complete legacy `POST /runners` body
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRunnerBody<'a> {
    pub token: &'a str,
    #[serde(flatten)]
    pub options: &'a RegisterRunnerOptions,
}

/// Body of the endpoints that only take a runner authentication token
#[derive(Debug, Serialize)]
pub(crate) struct RunnerTokenBody<'a> {
    pub token: &'a str,
}

/// GitLab takes list filters on tags as `tag_list=a,b`
fn comma_separated<S>(tags: &Option<Vec<CompactString>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match tags {
        Some(tags) => serializer.serialize_str(&tags.iter().join(",")),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_list_options_serialize_to_nothing() {
        let query = serde_json::to_value(RunnerListOptions::default()).unwrap();
        assert_eq!(query, json!({}));
    }

    #[test]
    fn test_list_options_builder() {
        let options = RunnerListOptions::builder()
            .runner_type(RunnerType::InstanceType)
            .paused(false)
            .tag_list(vec![CompactString::from("docker"), CompactString::from("linux")])
            .build()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"type": "instance_type", "paused": false, "tag_list": "docker,linux"})
        );
    }

    #[test]
    fn test_update_options_tri_state() {
        let absent = UpdateRunnerOptions::new().with_paused(true);
        assert_eq!(serde_json::to_value(&absent).unwrap(), json!({"paused": true}));

        let null = UpdateRunnerOptions::new()
            .clear_description()
            .clear_maximum_timeout();
        assert_eq!(
            serde_json::to_value(&null).unwrap(),
            json!({"description": null, "maximum_timeout": null})
        );

        let value = UpdateRunnerOptions::new().with_description("abcefg");
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"description": "abcefg"}));
    }

    #[test]
    fn test_create_body_adds_only_the_discriminator() {
        let options = CreateRunnerOptions::new()
            .with_tag_list(["foo", "bar"])
            .with_description("desc")
            .with_locked(false);
        let body = CreateRunnerBody {
            runner_type: RunnerType::GroupType,
            group_id: Some(GroupId::new(12345)),
            project_id: None,
            options: &options,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "runner_type": "group_type",
                "group_id": 12345,
                "tag_list": ["foo", "bar"],
                "description": "desc",
                "locked": false
            })
        );
    }

    #[test]
    fn test_register_body() {
        let options = RegisterRunnerOptions::new()
            .with_description("Some Description")
            .with_active(true)
            .with_locked(false);
        let body = RegisterRunnerBody { token: "6337ff461c94fd3fa32ba3b1ff4125", options: &options };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "token": "6337ff461c94fd3fa32ba3b1ff4125",
                "description": "Some Description",
                "active": true,
                "locked": false
            })
        );
    }
}
