//! Core HTTP client for GitLab API

use std::time::Duration;

use chrono::Local;
use compact_str::{format_compact, CompactString};
use reqwest::{
    header::{HeaderMap, AUTHORIZATION, RETRY_AFTER},
    Client, Method, RequestBuilder, Response, Url,
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    config::{ClientConfig, TokenKind},
    error::{ClientError, Result},
    hydrate::{hydrate, Hydrated, ObjectifiedHash},
    pagination::{PageInfo, PaginatedResponse},
};

/// Pure HTTP client for GitLab API
///
/// Each call maps to exactly one request; nothing is retried or cached.
#[derive(Debug, Clone)]
pub struct GitlabApi {
    client: Client,
    config: ClientConfig,
}

/// GitLab API error response formats
#[derive(Debug, Deserialize)]
struct GitlabApiError {
    error: CompactString,
    error_description: Option<CompactString>,
}

#[derive(Debug, Deserialize)]
struct GitlabApiError2 {
    message: serde_json::Value,
}

/// A successful response, hydrated but not yet narrowed to the shape the
/// operation expects
#[derive(Debug)]
pub(crate) struct ApiResponse {
    endpoint: String,
    headers: HeaderMap,
    hydrated: Hydrated,
}

impl ApiResponse {
    pub fn into_object(self) -> Result<ObjectifiedHash> {
        self.hydrated.into_object(&self.endpoint)
    }

    pub fn into_optional_object(self) -> Result<Option<ObjectifiedHash>> {
        self.hydrated.into_optional_object(&self.endpoint)
    }

    pub fn into_paginated(self) -> Result<PaginatedResponse<ObjectifiedHash>> {
        let items = self.hydrated.into_collection(&self.endpoint)?;
        Ok(PaginatedResponse::new(items, PageInfo::from_headers(&self.headers)))
    }
}

impl GitlabApi {
    /// Create a new GitLab API client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Self::build_http_client(&config)?;

        Ok(Self { client, config })
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the page following `page`, or `None` on the last page
    ///
    /// The `next` link must point at the configured GitLab origin; credentials
    /// are never sent anywhere else.
    pub async fn next_page<T>(
        &self,
        page: &PaginatedResponse<T>,
    ) -> Result<Option<PaginatedResponse<ObjectifiedHash>>> {
        let Some(link) = &page.page_info().links.next else {
            return Ok(None);
        };

        let url = self.resolve_link(link)?;
        debug!(url = %url, "Fetching next page");
        let request = self.authenticated_request(Method::GET, url.as_str());
        let response = self.send(request, url.path()).await?;
        response.into_paginated().map(Some)
    }

    /// Follow `next` links from `first`, returning the items of at most
    /// `max_pages` pages in total, `first` included
    pub async fn collect_all_pages(
        &self,
        first: PaginatedResponse<ObjectifiedHash>,
        max_pages: usize,
    ) -> Result<Vec<ObjectifiedHash>> {
        if max_pages == 0 {
            return Ok(Vec::new());
        }

        let mut fetched = 1;
        let mut current = first;
        let mut items = Vec::with_capacity(current.len());

        loop {
            let next = if fetched < max_pages { self.next_page(&current).await? } else { None };
            items.extend(current.into_items());

            match next {
                Some(page) => {
                    fetched += 1;
                    current = page;
                },
                None => break,
            }
        }

        debug!(pages = fetched, item_count = items.len(), "Collected pages");
        Ok(items)
    }

    // Crate-internal request dispatch

    /// Create an authenticated request for a path relative to the API base URL
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format_compact!("{}{}", self.config.base_url, path);
        self.authenticated_request(method, &url)
    }

    /// Send a request and hydrate the response body
    pub(crate) async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<ApiResponse> {
        let response = request.send().await?;
        let (headers, body) = self.handle_response(response).await?;
        let hydrated = hydrate(endpoint, &body)?;

        Ok(ApiResponse { endpoint: endpoint.to_string(), headers, hydrated })
    }

    // Private helper methods

    fn build_http_client(config: &ClientConfig) -> Result<Client> {
        Client::builder()
            .timeout(config.request.timeout)
            .user_agent(config.request.user_agent.as_str())
            .build()
            .map_err(ClientError::Http)
    }

    /// Resolve a pagination link against the base URL, rejecting other origins
    fn resolve_link(&self, link: &str) -> Result<Url> {
        let foreign = || ClientError::ForeignLink { url: link.to_string() };

        let base = Url::parse(&self.config.base_url).map_err(|_| foreign())?;
        let url = base.join(link).map_err(|_| foreign())?;

        if url.origin() == base.origin() {
            Ok(url)
        } else {
            warn!(link, base_url = %self.config.base_url, "Refusing to follow link to another host");
            Err(foreign())
        }
    }

    /// Create authenticated request builder
    fn authenticated_request(&self, method: Method, url: &str) -> RequestBuilder {
        let token = self.config.private_token.as_str();
        let request = match self.config.token_kind {
            TokenKind::Private => self.client.request(method, url).header("PRIVATE-TOKEN", token),
            TokenKind::OAuth => self
                .client
                .request(method, url)
                .header(AUTHORIZATION, format!("Bearer {token}")),
        };

        match &self.config.sudo {
            Some(sudo) => request.header("Sudo", sudo.as_str()),
            None => request,
        }
    }

    /// Split a response into headers and body, turning non-2xx statuses into errors
    async fn handle_response(&self, response: Response) -> Result<(HeaderMap, String)> {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!(path = %url_path, status = status.as_u16(), body_len = body.len(), "Received response");

        // Log response if debug is enabled
        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &body);
        }

        if status.is_success() {
            Ok((headers, body))
        } else {
            warn!(path = %url_path, status = status.as_u16(), "GitLab returned an error status");
            Err(Self::error_from_response(status.as_u16(), &headers, &url_path, body))
        }
    }

    /// Map an error response from GitLab API to a `ClientError`
    fn error_from_response(status: u16, headers: &HeaderMap, path: &str, body: String) -> ClientError {
        match status {
            401 => ClientError::Authentication { body },
            403 => ClientError::Forbidden { body },
            404 => ClientError::not_found(path, body),
            429 => {
                let retry_after = headers
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);
                ClientError::rate_limit(retry_after, body)
            },
            _ => {
                // Try to parse GitLab API error formats
                let message = if let Ok(api_error) = serde_json::from_str::<GitlabApiError>(&body) {
                    match api_error.error_description {
                        Some(description) => format_compact!("{}: {}", api_error.error, description),
                        None => api_error.error,
                    }
                } else if let Ok(api_error2) = serde_json::from_str::<GitlabApiError2>(&body) {
                    match api_error2.message {
                        serde_json::Value::String(message) => message.into(),
                        other => format_compact!("{}", other),
                    }
                } else {
                    body.as_str().into()
                };

                ClientError::gitlab_api(status, message, body)
            },
        }
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists() {
                if let Err(e) = std::fs::create_dir_all(log_dir) {
                    warn!("Failed to create log directory: {}", e);
                    return;
                }
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
                path.replace('/', "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response log to {:?}: {}", log_path, e);
            } else {
                debug!("Response logged to {:?}", log_path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig::new("https://gitlab.example.com/api/v4", "test-token")
    }

    #[test]
    fn test_api_creation() {
        let config = test_config();
        let api = GitlabApi::new(config);
        assert!(api.is_ok());
    }

    #[test]
    fn test_api_creation_invalid_config() {
        let config = ClientConfig::new("", "test-token");
        let api = GitlabApi::new(config);
        assert!(api.is_err());
    }

    #[test]
    fn test_request_url_and_headers() {
        let api = GitlabApi::new(test_config().with_sudo(Some("admin".into()))).unwrap();
        let request = api.request(Method::GET, "/runners/6").build().unwrap();

        assert_eq!(request.url().as_str(), "https://gitlab.example.com/api/v4/runners/6");
        assert_eq!(request.headers()["PRIVATE-TOKEN"], "test-token");
        assert_eq!(request.headers()["Sudo"], "admin");
    }

    #[test]
    fn test_oauth_header() {
        let api = GitlabApi::new(test_config().with_token_kind(TokenKind::OAuth)).unwrap();
        let request = api.request(Method::GET, "/runners").build().unwrap();

        assert_eq!(request.headers()[AUTHORIZATION], "Bearer test-token");
        assert!(request.headers().get("PRIVATE-TOKEN").is_none());
    }

    #[test]
    fn test_resolve_link_same_origin() {
        let api = GitlabApi::new(test_config()).unwrap();

        let url = api
            .resolve_link("https://gitlab.example.com/api/v4/runners?page=2")
            .unwrap();
        assert_eq!(url.query(), Some("page=2"));

        let url = api.resolve_link("/api/v4/runners?page=3").unwrap();
        assert_eq!(url.as_str(), "https://gitlab.example.com/api/v4/runners?page=3");
    }

    #[test]
    fn test_resolve_link_rejects_other_origins() {
        let api = GitlabApi::new(test_config()).unwrap();

        for link in [
            "https://evil.example.com/api/v4/runners?page=2",
            "http://gitlab.example.com/api/v4/runners?page=2",
            "https://gitlab.example.com:8443/api/v4/runners?page=2",
        ] {
            let error = api.resolve_link(link).unwrap_err();
            assert!(matches!(error, ClientError::ForeignLink { ref url } if url == link));
        }
    }

    #[test]
    fn test_error_handling() {
        let headers = HeaderMap::new();

        // Test authentication error
        let error = GitlabApi::error_from_response(401, &headers, "/runners", "".into());
        assert!(matches!(error, ClientError::Authentication { .. }));

        // Test not found error
        let error = GitlabApi::error_from_response(404, &headers, "/runners/1", "{}".into());
        assert!(matches!(error, ClientError::NotFound { ref path, .. } if path == "/runners/1"));
        assert_eq!(error.body(), Some("{}"));

        // Test rate limit error
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("60"));
        let error = GitlabApi::error_from_response(429, &headers, "/runners", "".into());
        assert!(matches!(
            error,
            ClientError::RateLimit { retry_after: Some(d), .. } if d == Duration::from_secs(60)
        ));
    }

    #[test]
    fn test_error_message_formats() {
        let headers = HeaderMap::new();

        let error = GitlabApi::error_from_response(
            400,
            &headers,
            "/runners",
            r#"{"error": "invalid_request", "error_description": "token is missing"}"#.into(),
        );
        assert!(matches!(
            error,
            ClientError::GitlabApi { status: 400, ref message, .. } if message == "invalid_request: token is missing"
        ));

        let error = GitlabApi::error_from_response(
            400,
            &headers,
            "/runners/6",
            r#"{"message": {"tag_list": ["is invalid"]}}"#.into(),
        );
        assert!(matches!(
            error,
            ClientError::GitlabApi { ref message, .. } if message == r#"{"tag_list":["is invalid"]}"#
        ));

        let error = GitlabApi::error_from_response(500, &headers, "/runners", "boom".into());
        assert!(matches!(error, ClientError::GitlabApi { status: 500, ref message, .. } if message == "boom"));
        assert_eq!(error.body(), Some("boom"));
    }
}
