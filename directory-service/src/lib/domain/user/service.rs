use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use auth::PasswordError;
use chrono::Duration;
use chrono::Utc;
use rand::Rng;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::ProfilePatch;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::query::UserFilter;
use crate::domain::user::query::UserQuery;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::DirectoryServicePort;
use crate::user::ports::UserRepository;

/// Authentication orchestrator: register, login, and token-to-user
/// resolution, composed from the hasher/token coordinator and the user
/// repository. All dependencies are constructor-injected.
pub struct AuthService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
}

impl<R> AuthService<R>
where
    R: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing + token signing coordinator
    /// * `token_ttl_hours` - Lifetime of issued access tokens
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>, token_ttl_hours: i64) -> Self {
        Self {
            repository,
            authenticator,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    fn issue_token(&self, id: &UserId) -> Result<String, UserError> {
        let claims = Claims::for_subject(id, self.token_ttl);
        self.authenticator
            .generate_token(&claims)
            .map_err(|e| UserError::Unknown(format!("Token generation failed: {}", e)))
    }

    /// Resolve a username candidate against the store.
    ///
    /// Retries exactly once, with a single wider-random suffix, after
    /// which the name is reported as taken. The 4-digit fallback space is
    /// large enough that a second collision means the name is genuinely
    /// contested.
    async fn available_username(&self, candidate: Username) -> Result<Username, UserError> {
        if self
            .repository
            .find_by_username(candidate.as_str())
            .await?
            .is_none()
        {
            return Ok(candidate);
        }

        let suffix = rand::thread_rng().gen_range(1000..=9999);
        let retry = Username::new(suffixed(candidate.as_str(), suffix))?;

        if self
            .repository
            .find_by_username(retry.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                candidate.as_str().to_string(),
            ));
        }

        Ok(retry)
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let candidate = match command.username {
            Some(username) => username,
            None => Username::new(derive_username(&command.name))?,
        };
        let username = self.available_username(candidate).await?;

        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| match e {
                PasswordError::EmptyPassword => UserError::InvalidPassword(e.to_string()),
                other => UserError::Unknown(format!("Password hashing failed: {}", other)),
            })?;

        let new_user =
            NewUser::with_default_profile(command.name, username, command.email, password_hash);
        let id = self.repository.insert(&new_user).await?;
        let user = new_user.into_user(id);

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");

        let access_token = self.issue_token(&user.id)?;

        Ok(AuthSession { user, access_token })
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let claims = Claims::for_subject(&user.id, self.token_ttl);
        let result = self
            .authenticator
            .authenticate(password, &user.password_hash, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
                other => UserError::Unknown(other.to_string()),
            })?;

        Ok(AuthSession {
            user,
            access_token: result.access_token,
        })
    }

    async fn identify(&self, token: &str) -> Result<User, UserError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::debug!(error = %e, "token validation failed");
            UserError::InvalidToken
        })?;

        let id = self
            .repository
            .parse_id(&claims.sub)
            .map_err(|_| UserError::InvalidToken)?;

        self.repository
            .find_by_id(&id)
            .await?
            .ok_or(UserError::InvalidToken)
    }
}

/// Directory orchestrator: listing, single lookup, and owner-only profile
/// updates over the user repository.
pub struct DirectoryService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
}

impl<R> DirectoryService<R>
where
    R: UserRepository,
{
    /// Create a new directory service with an injected repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> DirectoryServicePort for DirectoryService<R>
where
    R: UserRepository,
{
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>, UserError> {
        let query = UserQuery::build(filter);
        self.repository.query(&query).await
    }

    async fn get_user(&self, raw_id: &str) -> Result<User, UserError> {
        let id = self.repository.parse_id(raw_id)?;

        self.repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| UserError::NotFound(raw_id.to_string()))
    }

    async fn update_profile(
        &self,
        actor: &UserId,
        raw_target: &str,
        mut patch: ProfilePatch,
    ) -> Result<User, UserError> {
        // Ownership is checked on the raw string before the identifier is
        // parsed: a non-owner gets Forbidden, not a parse error.
        if actor.to_string() != raw_target {
            return Err(UserError::Forbidden);
        }

        let id = self.repository.parse_id(raw_target)?;

        if patch.is_empty() {
            return Err(UserError::EmptyUpdate);
        }

        patch.updated_at = Some(Utc::now());

        let modified = self.repository.update_fields(&id, &patch).await?;
        if modified == 0 {
            return Err(UserError::NotFound(raw_target.to_string()));
        }

        self.repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| UserError::NotFound(raw_target.to_string()))
    }
}

/// Derive a username slug from a display name: non-ASCII-alphanumerics
/// stripped, lowercased, random 3-digit disambiguator appended.
fn derive_username(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    suffixed(&slug, rand::thread_rng().gen_range(100..=999))
}

/// Append `_<suffix>`, truncating the base so the result stays within the
/// username length bound.
fn suffixed(base: &str, suffix: u32) -> String {
    let suffix = format!("_{}", suffix);
    let base = truncate_to_bytes(base, Username::MAX_LENGTH - suffix.len());
    format!("{}{}", base, suffix)
}

fn truncate_to_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
