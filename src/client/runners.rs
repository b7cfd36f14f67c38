//! Runner endpoints
//!
//! API docs: https://docs.gitlab.com/ee/api/runners.html and
//! https://docs.gitlab.com/ee/api/users.html#create-a-runner-linked-to-a-user

use compact_str::format_compact;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{
    api::GitlabApi,
    error::Result,
    hydrate::ObjectifiedHash,
    options::{
        CreateRunnerBody, CreateRunnerOptions, RegisterRunnerBody, RegisterRunnerOptions,
        RunnerJobsOptions, RunnerListOptions, RunnerTokenBody, UpdateRunnerOptions,
    },
    pagination::PaginatedResponse,
};
use crate::{
    domain::RunnerType,
    id::{GroupId, ProjectId, RunnerId},
};

#[derive(Serialize)]
struct EnableRunnerBody {
    runner_id: RunnerId,
}

impl GitlabApi {
    /// Runners owned by the current user.
    ///
    /// `GET /runners`
    #[instrument(skip(self))]
    pub async fn runners(
        &self,
        options: &RunnerListOptions,
    ) -> Result<PaginatedResponse<ObjectifiedHash>> {
        self.get_paginated("/runners", options).await
    }

    /// Every runner in the instance; requires administrator access.
    ///
    /// `GET /runners/all`
    #[instrument(skip(self))]
    pub async fn all_runners(
        &self,
        options: &RunnerListOptions,
    ) -> Result<PaginatedResponse<ObjectifiedHash>> {
        self.get_paginated("/runners/all", options).await
    }

    /// `GET /runners/:id`
    #[instrument(skip(self), fields(runner_id = %id))]
    pub async fn runner(&self, id: RunnerId) -> Result<ObjectifiedHash> {
        let path = format_compact!("/runners/{id}");
        let request = self.request(Method::GET, &path);
        self.send(request, &path).await?.into_object()
    }

    /// `PUT /runners/:id`
    #[instrument(skip(self), fields(runner_id = %id))]
    pub async fn update_runner(
        &self,
        id: RunnerId,
        options: &UpdateRunnerOptions,
    ) -> Result<ObjectifiedHash> {
        let path = format_compact!("/runners/{id}");
        let request = self.request(Method::PUT, &path).json(options);
        self.send(request, &path).await?.into_object()
    }

    /// Removes a runner by id. GitLab answers 204, so the object is usually `None`.
    ///
    /// `DELETE /runners/:id`
    #[instrument(skip(self), fields(runner_id = %id))]
    pub async fn delete_runner(&self, id: RunnerId) -> Result<Option<ObjectifiedHash>> {
        let path = format_compact!("/runners/{id}");
        let request = self.request(Method::DELETE, &path);
        let deleted = self.send(request, &path).await?.into_optional_object()?;

        info!(runner_id = %id, "Deleted runner");
        Ok(deleted)
    }

    /// Jobs processed by a runner.
    ///
    /// `GET /runners/:id/jobs`
    #[instrument(skip(self), fields(runner_id = %id))]
    pub async fn runner_jobs(
        &self,
        id: RunnerId,
        options: &RunnerJobsOptions,
    ) -> Result<PaginatedResponse<ObjectifiedHash>> {
        let path = format_compact!("/runners/{id}/jobs");
        self.get_paginated(&path, options).await
    }

    /// Runners available to a project.
    ///
    /// `GET /projects/:id/runners`
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn project_runners(
        &self,
        project_id: ProjectId,
        options: &RunnerListOptions,
    ) -> Result<PaginatedResponse<ObjectifiedHash>> {
        let path = format_compact!("/projects/{project_id}/runners");
        self.get_paginated(&path, options).await
    }

    /// Assign a runner to a project.
    ///
    /// `POST /projects/:id/runners`
    #[instrument(skip(self), fields(project_id = %project_id, runner_id = %runner_id))]
    pub async fn project_enable_runner(
        &self,
        project_id: ProjectId,
        runner_id: RunnerId,
    ) -> Result<ObjectifiedHash> {
        let path = format_compact!("/projects/{project_id}/runners");
        let request = self
            .request(Method::POST, &path)
            .json(&EnableRunnerBody { runner_id });
        self.send(request, &path).await?.into_object()
    }

    /// Unassign a runner from a project.
    ///
    /// `DELETE /projects/:id/runners/:runner_id`
    #[instrument(skip(self), fields(project_id = %project_id, runner_id = %runner_id))]
    pub async fn project_disable_runner(
        &self,
        project_id: ProjectId,
        runner_id: RunnerId,
    ) -> Result<Option<ObjectifiedHash>> {
        let path = format_compact!("/projects/{project_id}/runners/{runner_id}");
        let request = self.request(Method::DELETE, &path);
        self.send(request, &path).await?.into_optional_object()
    }

    /// Runners available to a group and its subgroups.
    ///
    /// `GET /groups/:id/runners`
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn group_runners(
        &self,
        group_id: GroupId,
        options: &RunnerListOptions,
    ) -> Result<PaginatedResponse<ObjectifiedHash>> {
        let path = format_compact!("/groups/{group_id}/runners");
        self.get_paginated(&path, options).await
    }

    /// Register a runner with a registration token (legacy workflow).
    ///
    /// `POST /runners`
    #[instrument(skip(self, token))]
    pub async fn register_runner(
        &self,
        token: &str,
        options: &RegisterRunnerOptions,
    ) -> Result<ObjectifiedHash> {
        let body = RegisterRunnerBody { token, options };
        let request = self.request(Method::POST, "/runners").json(&body);
        self.send(request, "/runners").await?.into_object()
    }

    /// Create a group runner linked to the current user.
    ///
    /// `POST /user/runners` with `runner_type=group_type`
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn create_group_runner(
        &self,
        group_id: GroupId,
        options: &CreateRunnerOptions,
    ) -> Result<ObjectifiedHash> {
        self.create_user_runner(CreateRunnerBody {
            runner_type: RunnerType::GroupType,
            group_id: Some(group_id),
            project_id: None,
            options,
        })
        .await
    }

    /// Create a project runner linked to the current user.
    ///
    /// `POST /user/runners` with `runner_type=project_type`
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn create_project_runner(
        &self,
        project_id: ProjectId,
        options: &CreateRunnerOptions,
    ) -> Result<ObjectifiedHash> {
        self.create_user_runner(CreateRunnerBody {
            runner_type: RunnerType::ProjectType,
            group_id: None,
            project_id: Some(project_id),
            options,
        })
        .await
    }

    /// Create an instance runner linked to the current user.
    ///
    /// `POST /user/runners` with `runner_type=instance_type`
    #[instrument(skip(self))]
    pub async fn create_instance_runner(
        &self,
        options: &CreateRunnerOptions,
    ) -> Result<ObjectifiedHash> {
        self.create_user_runner(CreateRunnerBody {
            runner_type: RunnerType::InstanceType,
            group_id: None,
            project_id: None,
            options,
        })
        .await
    }

    /// Delete a runner by its authentication token.
    ///
    /// `DELETE /runners`
    #[instrument(skip(self, token))]
    pub async fn delete_registered_runner(&self, token: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE, "/runners")
            .json(&RunnerTokenBody { token });
        self.send(request, "/runners").await?;
        Ok(())
    }

    /// Check that a runner authentication token is valid.
    ///
    /// `POST /runners/verify`
    #[instrument(skip(self, token))]
    pub async fn verify_auth_registered_runner(
        &self,
        token: &str,
    ) -> Result<Option<ObjectifiedHash>> {
        let request = self
            .request(Method::POST, "/runners/verify")
            .json(&RunnerTokenBody { token });
        self.send(request, "/runners/verify").await?.into_optional_object()
    }

    /// `POST /runners/:id/reset_authentication_token`
    #[instrument(skip(self), fields(runner_id = %id))]
    pub async fn reset_runner_authentication_token(&self, id: RunnerId) -> Result<ObjectifiedHash> {
        let path = format_compact!("/runners/{id}/reset_authentication_token");
        self.post_without_body(&path).await
    }

    /// `POST /runners/reset_registration_token`
    #[instrument(skip(self))]
    pub async fn reset_instance_registration_token(&self) -> Result<ObjectifiedHash> {
        self.post_without_body("/runners/reset_registration_token").await
    }

    /// `POST /groups/:id/runners/reset_registration_token`
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn reset_group_registration_token(&self, group_id: GroupId) -> Result<ObjectifiedHash> {
        let path = format_compact!("/groups/{group_id}/runners/reset_registration_token");
        self.post_without_body(&path).await
    }

    /// `POST /projects/:id/runners/reset_registration_token`
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn reset_project_registration_token(
        &self,
        project_id: ProjectId,
    ) -> Result<ObjectifiedHash> {
        let path = format_compact!("/projects/{project_id}/runners/reset_registration_token");
        self.post_without_body(&path).await
    }

    async fn create_user_runner(&self, body: CreateRunnerBody<'_>) -> Result<ObjectifiedHash> {
        let request = self.request(Method::POST, "/user/runners").json(&body);
        let created = self.send(request, "/user/runners").await?.into_object()?;

        debug!(runner_type = ?body.runner_type, runner_id = ?created.get_u64("id"), "Created runner");
        Ok(created)
    }

    async fn get_paginated<Q>(&self, path: &str, query: &Q) -> Result<PaginatedResponse<ObjectifiedHash>>
    where
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).query(query);
        let runners = self.send(request, path).await?.into_paginated()?;

        debug!(path, item_count = runners.len(), "Fetched page");
        Ok(runners)
    }

    async fn post_without_body(&self, path: &str) -> Result<ObjectifiedHash> {
        let request = self.request(Method::POST, path);
        self.send(request, path).await?.into_object()
    }
}
