use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use directory_service::domain::user::models::NewUser;
use directory_service::domain::user::models::ProfilePatch;
use directory_service::domain::user::models::User;
use directory_service::domain::user::models::UserId;
use directory_service::domain::user::ports::UserRepository;
use directory_service::domain::user::query::UserQuery;
use directory_service::domain::user::service::AuthService;
use directory_service::domain::user::service::DirectoryService;
use directory_service::inbound::http::router::create_router;
use directory_service::user::errors::UserError;
use directory_service::user::errors::UserIdError;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory user repository backing the integration tests.
///
/// Honors the store contract the service relies on: unique email and
/// username, id assignment at insert, natural insertion order, and
/// predicate evaluation via `UserQuery::matches`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    fn parse_id(&self, raw: &str) -> Result<UserId, UserIdError> {
        Uuid::parse_str(raw)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == *id)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<UserId, UserError> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|u| u.email.as_str() == user.email.as_str())
        {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }
        if users
            .iter()
            .any(|u| u.username.as_str() == user.username.as_str())
        {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        let id = UserId::new();
        users.push(user.clone().into_user(id));
        Ok(id)
    }

    async fn update_fields(&self, id: &UserId, patch: &ProfilePatch) -> Result<u64, UserError> {
        let mut users = self.users.lock().unwrap();

        match users.iter_mut().find(|u| u.id == *id) {
            Some(user) => {
                patch.apply(user);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn query(&self, query: &UserQuery) -> Result<Vec<User>, UserError> {
        let users = self.users.lock().unwrap();
        let matching = users.iter().filter(|u| query.matches(u)).cloned();

        Ok(match query.limit {
            Some(limit) => matching.take(limit as usize).collect(),
            None => matching.collect(),
        })
    }
}

/// Test application that spawns a real server on a random port
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::default());
        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            authenticator,
            24,
        ));
        let directory_service = Arc::new(DirectoryService::new(repository));

        let router = create_router(auth_service, directory_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return its id and access token
    pub async fn register_user(&self, name: &str, email: &str, password: &str) -> (String, String) {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        (
            body["user"]["id"].as_str().unwrap().to_string(),
            body["access_token"].as_str().unwrap().to_string(),
        )
    }
}
