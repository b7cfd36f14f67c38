//! Test utilities and common test fixtures for client modules


use serde_json::json;

use crate::client::{api::GitlabApi, config::ClientConfig};

/// Two runners as returned by `GET /runners`
pub fn runners_json_response() -> serde_json::Value {
    json!([
        {
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
        },
        {
            "active": true,
            "paused": false,
            "description": "test-2-20150125",
            "id": 8,
            "ip_address": "127.0.0.1",
            "is_shared": false,
            "runner_type": "group_type",
            "name": null,
            "online": false,
            "status": "offline"
        }
    ])
}

/// Runners as returned by `GET /projects/:id/runners`
pub fn project_runners_json_response() -> serde_json::Value {
    json!([
        {
            "active": true,
            "description": "test-2-20150125",
            "id": 8,
            "ip_address": "127.0.0.1",
            "is_shared": false,
            "runner_type": "project_type",
            "name": null,
            "online": false,
            "status": "offline"
        },
        {
            "active": true,
            "description": "development_runner",
            "id": 5,
            "ip_address": "127.0.0.1",
            "is_shared": true,
            "runner_type": "instance_type",
            "name": null,
            "online": true,
            "status": "online"
        }
    ])
}

/// Runners as returned by `GET /groups/:id/runners`
pub fn group_runners_json_response() -> serde_json::Value {
    json!([
        {
            "active": true,
            "description": "group-runner",
            "id": 3,
            "ip_address": "127.0.0.1",
            "is_shared": false,
            "runner_type": "group_type",
            "name": "gitlab-runner",
            "online": true,
            "status": "online"
        }
    ])
}

/// Runner details as returned by `GET /runners/:id`
pub fn runner_json_response(description: &str) -> serde_json::Value {
    json!({
        "active": true,
        "paused": false,
        "architecture": null,
        "description": description,
        "id": 6,
        "ip_address": "127.0.0.1",
        "is_shared": false,
        "runner_type": "project_type",
        "contacted_at": "2016-01-25T16:39:48.066Z",
        "maintenance_note": null,
        "name": null,
        "online": true,
        "status": "online",
        "platform": null,
        "projects": [
            {
                "id": 1,
                "name": "GitLab Community Edition",
                "name_with_namespace": "GitLab.org / GitLab Community Edition",
                "path": "gitlab-foss",
                "path_with_namespace": "gitlab-org/gitlab-foss"
            }
        ],
        "revision": null,
        "tag_list": ["ruby", "mysql"],
        "version": null,
        "access_level": "ref_protected",
        "maximum_timeout": 3600
    })
}

/// Jobs as returned by `GET /runners/:id/jobs`
pub fn runner_jobs_json_response() -> serde_json::Value {
    json!([
        {
            "id": 2,
            "status": "running",
            "stage": "test",
            "name": "test",
            "ref": "main",
            "tag": false,
            "coverage": null,
            "created_at": "2017-11-16T08:50:29.000Z",
            "started_at": "2017-11-16T08:51:29.000Z",
            "finished_at": null,
            "duration": 0.192,
            "web_url": "https://gitlab.example.com/gitlab-org/gitlab-foss/-/jobs/2",
            "project": {
                "id": 1,
                "name": "gitlab-foss",
                "path_with_namespace": "gitlab-org/gitlab-foss"
            }
        }
    ])
}

/// Body of `POST /runners` and `POST /user/runners`
pub fn runner_token_json_response(id: u64, token: &str) -> serde_json::Value {
    json!({
        "id": id,
        "token": token,
        "token_expires_at": null
    })
}

/// Create GitLab API error response
pub fn gitlab_error_response(message: &str) -> serde_json::Value {
    json!({
        "message": message
    })
}

/// Mock HTTP server for testing
pub struct MockServer {
    pub server: wiremock::MockServer,
}

impl MockServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = wiremock::MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Create a test config pointing to this mock server
    pub fn test_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url(), "test-token")
    }

    pub fn api(&self) -> GitlabApi {
        GitlabApi::new(self.test_config()).unwrap()
    }

    /// Query string of the only request the server received
    pub async fn single_request_query(&self) -> Option<String> {
        let requests = self.server.received_requests().await.unwrap_or_default();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].url.query().map(str::to_string)
    }
}

#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures() {
        let runners = runners_json_response();
        assert_eq!(runners[0]["id"], 6);
        assert_eq!(runners[0]["description"], "test-1-20150125");

        let project_runners = project_runners_json_response();
        assert_eq!(project_runners[0]["id"], 8);

        let token = runner_token_json_response(9171, "glrt-kyahzxLaj4Dc1jQf4xjX");
        assert!(token["token_expires_at"].is_null());
    }
}
