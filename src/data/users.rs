//! Remote user service client
//!
//! Fetches the user list with a single parameterless GET and decodes the JSON
//! array into `User` records.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::User;

/// Default endpoint of the user service
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// User-facing message for a failed load when nothing more specific applies
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load users";

/// Errors that can occur when fetching users
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service answered with a non-success status
    #[error("User service returned HTTP {0}")]
    Status(u16),

    /// HTTP request failed before a usable response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not a JSON array of users
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Message suitable for showing to the user
    ///
    /// A bad status always maps to the fixed `LOAD_FAILED_MESSAGE`. Transport
    /// and decode failures get a more specific message where one exists.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Status(_) => LOAD_FAILED_MESSAGE.to_string(),
            FetchError::Request(e) if e.is_connect() || e.is_timeout() => {
                format!("{}: user service unreachable", LOAD_FAILED_MESSAGE)
            }
            FetchError::Request(_) => LOAD_FAILED_MESSAGE.to_string(),
            FetchError::Decode(_) => {
                format!("{}: malformed response", LOAD_FAILED_MESSAGE)
            }
        }
    }
}

/// Source of the authoritative user list
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetches the complete user list in server order
    async fn fetch_users(&self) -> Result<Vec<User>, FetchError>;
}

/// Client for fetching users over HTTP
#[derive(Debug, Clone)]
pub struct UsersClient {
    client: Client,
    endpoint: String,
}

impl Default for UsersClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UsersClient {
    /// Create a new UsersClient pointed at `DEFAULT_ENDPOINT`
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a new UsersClient for a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint this client requests
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UserSource for UsersClient {
    async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        debug!(endpoint = %self.endpoint, "Requesting users");

        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let users: Vec<User> = serde_json::from_str(&text)?;

        debug!(count = users.len(), "Received users");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USERS_BODY: &str = r#"[
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org"
        },
        {
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv",
            "phone": "010-692-6593 x09125",
            "website": "anastasia.net"
        }
    ]"#;

    fn client_for(server: &MockServer) -> UsersClient {
        UsersClient::with_endpoint(format!("{}/users", server.uri()))
    }

    #[test]
    fn test_default_endpoint() {
        let client = UsersClient::new();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[tokio::test]
    async fn test_fetch_users_preserves_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USERS_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let users = client_for(&server)
            .fetch_users()
            .await
            .expect("Fetch should succeed");

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[0].name, "Leanne Graham");
        assert_eq!(users[1].id, 2);
        assert_eq!(users[1].website, "anastasia.net");
    }

    #[tokio::test]
    async fn test_fetch_users_server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_users()
            .await
            .expect_err("Fetch should fail on HTTP 500");

        assert!(matches!(err, FetchError::Status(500)));
        assert_eq!(err.user_message(), LOAD_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_fetch_users_not_found_is_status_error() {
        let server = MockServer::start().await;

        // No mock mounted: wiremock answers 404
        let err = client_for(&server)
            .fetch_users()
            .await
            .expect_err("Fetch should fail on HTTP 404");

        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_users_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"users": []}"#))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_users()
            .await
            .expect_err("Fetch should fail on a non-array body");

        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.user_message().starts_with(LOAD_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_fetch_users_unreachable_is_request_error() {
        // Port 9 (discard) on localhost is not expected to accept connections
        let client = UsersClient::with_endpoint("http://127.0.0.1:9/users");

        let err = client
            .fetch_users()
            .await
            .expect_err("Fetch should fail when nothing listens");

        assert!(matches!(err, FetchError::Request(_)));
        assert!(!err.user_message().is_empty());
    }
}
