//! GitHub API client.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use dirmap_core::{AccountType, RepositoryDetails, UserDetails};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::{Auth, Token};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::retry::{self, RetryPolicy, RetryReason};
use crate::traits::GitHubApi;
use crate::types::Tree;

/// Default GitHub API URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// === Internal API response types ===

/// Internal representation of a user from the GitHub API.
#[derive(serde::Deserialize)]
struct ApiUser {
    login: String,
    id: u64,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
    html_url: String,
    public_repos: Option<u64>,
    #[serde(rename = "type", default)]
    account_type: Option<String>,
}

impl ApiUser {
    fn into_user_details(self) -> UserDetails {
        UserDetails {
            login: self.login,
            id: self.id,
            name: self.name,
            email: self.email,
            avatar_url: self.avatar_url,
            html_url: self.html_url,
            public_repos: self.public_repos,
            account_type: AccountType::from_api(self.account_type.as_deref().unwrap_or("User")),
        }
    }
}

/// Internal representation of a repository from the GitHub API.
#[derive(serde::Deserialize)]
struct ApiRepository {
    id: u64,
    name: String,
    full_name: String,
    owner: ApiOwner,
    description: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    archived: bool,
    default_branch: String,
    html_url: String,
    clone_url: Option<String>,
    language: Option<String>,
    size: Option<u64>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
}

#[derive(serde::Deserialize)]
struct ApiOwner {
    login: String,
}

impl ApiRepository {
    fn into_repository_details(self) -> RepositoryDetails {
        RepositoryDetails {
            id: self.id,
            name: self.name,
            full_name: self.full_name,
            owner: self.owner.login,
            description: self.description,
            private: self.private,
            fork: self.fork,
            archived: self.archived,
            default_branch: self.default_branch,
            html_url: self.html_url,
            clone_url: self.clone_url,
            language: self.language,
            size: self.size,
            stargazers_count: self.stargazers_count,
            forks_count: self.forks_count,
            open_issues_count: self.open_issues_count,
        }
    }
}

/// Internal representation of a contents API response for a file.
#[derive(serde::Deserialize)]
struct ApiContent {
    #[serde(rename = "type")]
    kind: String,
    content: Option<String>,
    encoding: Option<String>,
}

/// Everything a client needs at construction time.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Token sent with every request.
    pub oauth_token: Token,
    /// API base URL.
    pub api_url: String,
    /// Retry budget and backoff schedule.
    pub retry: RetryPolicy,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Defaults for github.com.
    #[must_use]
    pub fn new(oauth_token: Token) -> Self {
        Self {
            oauth_token,
            api_url: DEFAULT_API_URL.into(),
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Take API URL, retry, and timeout settings from a loaded config file.
    #[must_use]
    pub fn from_config(config: &dirmap_core::Config, oauth_token: Token) -> Self {
        Self {
            oauth_token,
            api_url: config
                .github
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.into()),
            retry: RetryPolicy::from(&config.retry),
            request_timeout: config.github.request_timeout(),
        }
    }

    /// Use a custom API URL (for GitHub Enterprise).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Use a custom retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use a custom per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// GitHub API client.
///
/// Every request goes through the configured [`RetryPolicy`]; the clock is
/// injectable so backoff can be observed in tests.
pub struct GitHubClient<C = SystemClock> {
    client: Client,
    base_url: Url,
    token: Token,
    retry: RetryPolicy,
    clock: C,
}

impl GitHubClient {
    /// Create a new GitHub client.
    ///
    /// # Errors
    /// Returns error if authentication fails.
    pub fn new(auth: &Auth) -> Result<Self> {
        Self::with_base_url(auth, DEFAULT_API_URL)
    }

    /// Create a new GitHub client with a custom API URL (for GitHub Enterprise).
    ///
    /// # Errors
    /// Returns error if authentication fails or the URL is unusable.
    pub fn with_base_url(auth: &Auth, base_url: impl Into<String>) -> Result<Self> {
        let token = auth.resolve()?;
        Self::from_config(ClientConfig::new(token).with_api_url(base_url))
    }

    /// Create a client from a full configuration record.
    ///
    /// # Errors
    /// Returns error if the URL is unusable or the HTTP client can't be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> GitHubClient<C> {
    /// Create a client with a custom clock.
    ///
    /// # Errors
    /// Returns error if the URL is unusable or the HTTP client can't be built.
    pub fn with_clock(config: ClientConfig, clock: C) -> Result<Self> {
        let base_url =
            Url::parse(&config.api_url).map_err(|_| Error::InvalidApiUrl(config.api_url.clone()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidApiUrl(config.api_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("dirmap"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config.oauth_token,
            retry: config.retry,
            clock,
        })
    }

    /// The retry policy applied to every request.
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Build an API URL from path segments, percent-encoding each one.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidApiUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET, retrying transient failures until the policy gives up.
    ///
    /// Returns the first response that isn't retryable; the caller decides
    /// what its status means.
    async fn send_with_retry(&self, url: Url) -> Result<Response> {
        let mut state = self.retry.start();

        loop {
            tracing::debug!(attempt = state.attempt(), url = %url, "GET");
            let sent = self
                .client
                .get(url.clone())
                .header(AUTHORIZATION, self.token.bearer())
                .send()
                .await;

            let (reason, hint, transport_error) = match sent {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 403 && retry::is_rate_limit_exhausted(response.headers()) {
                        tracing::error!(
                            reset_at = retry::rate_limit_reset_at(response.headers())
                                .as_deref()
                                .unwrap_or("unknown"),
                            "GitHub API rate limit exhausted"
                        );
                        return Err(Error::RateLimitExceeded {
                            attempts: state.attempt(),
                        });
                    }
                    let Some(reason) = RetryPolicy::classify(status) else {
                        return Ok(response);
                    };
                    let hint = retry::rate_limit_hint(response.headers(), self.clock.now());
                    (reason, hint, None)
                }
                Err(e) if e.is_timeout() || e.is_connect() => (RetryReason::Transport, None, Some(e)),
                Err(e) => return Err(Error::Network(e)),
            };

            match state.on_failure(&self.retry, reason, hint, self.clock.jitter()) {
                Some(delay) => self.clock.sleep(delay).await,
                None => return Err(exhausted(reason, transport_error, state.attempt())),
            }
        }
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<T> {
        let response = self.send_with_retry(url).await?;
        handle_response(response, resource).await
    }

    /// Get the user the token belongs to.
    ///
    /// # Errors
    /// Returns [`Error::AuthenticationFailed`] if the token is rejected.
    pub async fn get_authenticated_user(&self) -> Result<UserDetails> {
        let user: ApiUser = self
            .get(self.endpoint(["user"])?, "authenticated user")
            .await?;
        Ok(user.into_user_details())
    }

    /// Get repository metadata.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the repository doesn't exist or isn't visible.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositoryDetails> {
        let url = self.endpoint(["repos", owner, repo])?;
        let api_repo: ApiRepository = self
            .get(url, &format!("repository {owner}/{repo}"))
            .await?;
        Ok(api_repo.into_repository_details())
    }

    /// List a git tree by SHA or ref name.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the tree or ref doesn't exist.
    pub async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_ish: &str,
        recursive: bool,
    ) -> Result<Tree> {
        let segments = ["repos", owner, repo, "git", "trees"]
            .into_iter()
            .chain(tree_ish.split('/'));
        let mut url = self.endpoint(segments)?;
        if recursive {
            url.query_pairs_mut().append_pair("recursive", "1");
        }
        self.get(url, &format!("tree {tree_ish} in {owner}/{repo}"))
            .await
    }

    /// Get a file's decoded text content through the contents API.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] if the path isn't a file or the payload
    /// isn't valid base64.
    pub async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<Option<String>> {
        let segments = ["repos", owner, repo, "contents"]
            .into_iter()
            .chain(path.split('/'));
        let mut url = self.endpoint(segments)?;
        if let Some(git_ref) = git_ref {
            url.query_pairs_mut().append_pair("ref", git_ref);
        }
        let content: ApiContent = self
            .get(url, &format!("file {path} in {owner}/{repo}"))
            .await?;
        decode_content(path, content)
    }
}

/// Map a final non-success response to an error, or parse a success body.
async fn handle_response<T: DeserializeOwned>(response: Response, resource: &str) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        let body = response.bytes().await?;
        return Ok(serde_json::from_slice(&body)?);
    }

    match status.as_u16() {
        401 | 403 => Err(Error::AuthenticationFailed),
        404 => Err(Error::NotFound(resource.to_string())),
        status_code => {
            let text = response.text().await.unwrap_or_default();
            Err(Error::ApiError {
                status: status_code,
                message: text,
            })
        }
    }
}

/// The error to surface once the retry budget is spent.
fn exhausted(reason: RetryReason, transport_error: Option<reqwest::Error>, attempts: u32) -> Error {
    match (reason, transport_error) {
        (_, Some(e)) => Error::Network(e),
        (RetryReason::ServerError(status), None) => Error::ServiceUnavailable { status, attempts },
        (RetryReason::RateLimited | RetryReason::Transport, None) => {
            Error::RateLimitExceeded { attempts }
        }
    }
}

fn decode_content(path: &str, content: ApiContent) -> Result<Option<String>> {
    if content.kind != "file" {
        return Err(Error::Decode {
            path: path.to_string(),
            reason: format!("expected a file, found {}", content.kind),
        });
    }

    let (Some("base64"), Some(encoded)) = (content.encoding.as_deref(), content.content) else {
        // Files over 1 MB come back with encoding "none" and no content
        tracing::debug!(path, "content not inlined by GitHub");
        return Ok(None);
    };

    let cleaned: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(cleaned).map_err(|e| Error::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    if let Ok(text) = String::from_utf8(bytes) {
        Ok(Some(text))
    } else {
        tracing::debug!(path, "skipping non-UTF-8 content");
        Ok(None)
    }
}

impl<C> std::fmt::Debug for GitHubClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[redacted]")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

// === Trait Implementation ===

impl<C: Clock> GitHubApi for GitHubClient<C> {
    async fn get_authenticated_user(&self) -> Result<UserDetails> {
        self.get_authenticated_user().await
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositoryDetails> {
        self.get_repository(owner, repo).await
    }

    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_ish: &str,
        recursive: bool,
    ) -> Result<Tree> {
        self.get_tree(owner, repo, tree_ish, recursive).await
    }

    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<Option<String>> {
        self.get_file_content(owner, repo, path, git_ref).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::testing::FakeClock;
    use crate::types::TreeEntryKind;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NOW: u64 = 1_700_000_000;

    fn test_config(base_url: &str) -> ClientConfig {
        ClientConfig::new(Token::new("test-token").unwrap())
            .with_api_url(base_url)
            .with_retry(RetryPolicy::new(3, Duration::from_millis(10)).with_jitter_factor(0.0))
    }

    /// Create a test client pointing to the mock server, with a frozen clock.
    fn test_client(base_url: &str) -> (GitHubClient<FakeClock>, FakeClock) {
        let clock = FakeClock::at(NOW);
        let client = GitHubClient::with_clock(test_config(base_url), clock.clone()).unwrap();
        (client, clock)
    }

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "login": "octocat",
            "id": 583231,
            "name": "The Octocat",
            "email": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat",
            "public_repos": 8,
            "type": "User"
        })
    }

    fn repo_json() -> serde_json::Value {
        serde_json::json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": { "login": "octocat", "id": 1 },
            "description": "My first repository",
            "private": false,
            "fork": false,
            "archived": false,
            "default_branch": "main",
            "html_url": "https://github.com/octocat/Hello-World",
            "clone_url": "https://github.com/octocat/Hello-World.git",
            "language": "Rust",
            "size": 108,
            "stargazers_count": 80,
            "forks_count": 9,
            "open_issues_count": 0
        })
    }

    // === User / repository ===

    #[tokio::test]
    async fn test_get_authenticated_user_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("user-agent", "dirmap"))
            .and(header("x-github-api-version", "2022-11-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let user = client.get_authenticated_user().await.unwrap();

        assert_eq!(user.login, "octocat");
        assert_eq!(user.id, 583_231);
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
        assert_eq!(user.public_repos, Some(8));
        assert_eq!(user.account_type, AccountType::User);
    }

    #[tokio::test]
    async fn test_get_repository_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json()))
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let repo = client
            .get_repository("octocat", "Hello-World")
            .await
            .unwrap();

        assert_eq!(repo.full_name, "octocat/Hello-World");
        assert_eq!(repo.owner, "octocat");
        assert_eq!(repo.default_branch, "main");
        assert_eq!(repo.stargazers_count, 80);
        assert_eq!(repo.language.as_deref(), Some("Rust"));
    }

    #[tokio::test]
    async fn test_get_repository_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/missing-repo"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({
                    "message": "Not Found"
                })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, clock) = test_client(&mock_server.uri());
        let err = client
            .get_repository("owner", "missing-repo")
            .await
            .unwrap_err();

        assert!(matches!(&err, Error::NotFound(what) if what.contains("owner/missing-repo")));
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let result = client.get_authenticated_user().await;

        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_forbidden_is_auth_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "4999"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let result = client.get_authenticated_user().await;

        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_primary_rate_limit_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "1700000060"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, clock) = test_client(&mock_server.uri());
        let result = client.get_authenticated_user().await;

        assert!(matches!(
            result,
            Err(Error::RateLimitExceeded { attempts: 1 })
        ));
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_status_is_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r"))
            .respond_with(ResponseTemplate::new(451).set_body_string("blocked"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let err = client.get_repository("o", "r").await.unwrap_err();

        assert!(matches!(
            err,
            Error::ApiError { status: 451, ref message } if message == "blocked"
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let result = client.get_authenticated_user().await;

        assert!(matches!(result, Err(Error::Parse(_))));
    }

    // === Retry behavior ===

    #[tokio::test]
    async fn test_server_errors_exhaust_budget() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let (client, clock) = test_client(&mock_server.uri());
        let result = client.get_authenticated_user().await;

        assert!(matches!(
            result,
            Err(Error::ServiceUnavailable {
                status: 503,
                attempts: 3
            })
        ));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[tokio::test]
    async fn test_rate_limited_exhausts_budget() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let result = client.get_repository("o", "r").await;

        assert!(matches!(
            result,
            Err(Error::RateLimitExceeded { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, clock) = test_client(&mock_server.uri());
        let user = client.get_authenticated_user().await.unwrap();

        assert_eq!(user.login, "octocat");
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(10)]);
    }

    #[tokio::test]
    async fn test_retry_after_header_sets_delay() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&mock_server)
            .await;

        let (client, clock) = test_client(&mock_server.uri());
        client.get_authenticated_user().await.unwrap();

        assert_eq!(clock.sleeps(), vec![Duration::from_secs(2)]);
    }

    #[tokio::test]
    async fn test_rate_limit_reset_sets_delay() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", (NOW + 5).to_string()),
            )
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&mock_server)
            .await;

        let (client, clock) = test_client(&mock_server.uri());
        client.get_authenticated_user().await.unwrap();

        assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn test_connection_refused_retried_then_network_error() {
        // Nothing listens on port 1
        let (client, clock) = test_client("http://127.0.0.1:1");
        let result = client.get_authenticated_user().await;

        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(clock.sleeps().len(), 2);
    }

    // === Trees and contents ===

    #[tokio::test]
    async fn test_get_tree_recursive() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/git/trees/main"))
            .and(query_param("recursive", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "root",
                "truncated": false,
                "tree": [
                    { "path": "src", "mode": "040000", "type": "tree", "sha": "t1" },
                    { "path": "src/lib.rs", "mode": "100644", "type": "blob", "sha": "b1", "size": 30 }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let tree = client.get_tree("o", "r", "main", true).await.unwrap();

        assert_eq!(tree.sha, "root");
        assert!(!tree.truncated);
        assert_eq!(tree.entries.len(), 2);
        assert_eq!(tree.entries[0].kind, TreeEntryKind::Tree);
        assert_eq!(tree.entries[1].size, Some(30));
    }

    #[tokio::test]
    async fn test_get_tree_branch_with_slash() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/git/trees/feature/x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "root",
                "tree": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let tree = client.get_tree("o", "r", "feature/x", false).await.unwrap();
        assert!(tree.entries.is_empty());
    }

    #[tokio::test]
    async fn test_get_file_content_decodes_base64() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/contents/docs/read%20me.md"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "file",
                "encoding": "base64",
                "content": "aGVsbG8g\nd29ybGQ=\n"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let content = client
            .get_file_content("o", "r", "docs/read me.md", Some("main"))
            .await
            .unwrap();

        assert_eq!(content.as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn test_get_file_content_binary_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/contents/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "file",
                "encoding": "base64",
                "content": "//4="
            })))
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let content = client
            .get_file_content("o", "r", "logo.png", None)
            .await
            .unwrap();

        assert!(content.is_none());
    }

    #[tokio::test]
    async fn test_get_file_content_rejects_bad_base64() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/contents/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "file",
                "encoding": "base64",
                "content": "!!!"
            })))
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let result = client.get_file_content("o", "r", "a.txt", None).await;

        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[tokio::test]
    async fn test_large_file_without_inline_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/o/r/contents/big.bin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "file",
                "encoding": "none",
                "content": ""
            })))
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&mock_server.uri());
        let content = client
            .get_file_content("o", "r", "big.bin", None)
            .await
            .unwrap();

        assert!(content.is_none());
    }

    // === Construction ===

    #[tokio::test]
    async fn test_enterprise_base_path_preserved() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _) = test_client(&format!("{}/api/v3/", mock_server.uri()));
        client.get_authenticated_user().await.unwrap();
    }

    #[test]
    fn test_invalid_api_url_rejected() {
        for url in ["not a url", "mailto:someone@example.com", "ftp://example.com"] {
            let result = GitHubClient::from_config(test_config(url));
            assert!(matches!(result, Err(Error::InvalidApiUrl(_))), "{url}");
        }
    }

    #[test]
    fn test_client_from_file_config() {
        let mut config = dirmap_core::Config::default();
        config.github.api_url = Some("https://github.example.com/api/v3".into());
        config.retry.max_attempts = 2;

        let client_config = ClientConfig::from_config(&config, Token::new("t").unwrap());
        assert_eq!(client_config.api_url, "https://github.example.com/api/v3");
        assert_eq!(client_config.retry.max_attempts(), 2);
        assert_eq!(client_config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = GitHubClient::from_config(test_config("https://api.github.com")).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("test-token"));
        assert!(debug.contains("[redacted]"));
    }
}
