use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::ProfilePatch;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::query::UserFilter;
use crate::domain::user::query::UserQuery;
use crate::user::errors::UserError;
use crate::user::errors::UserIdError;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue an access token.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `UsernameAlreadyExists` - Username is taken even after the
    ///   collision retry
    /// * `InvalidPassword` - Password is empty
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, UserError>;

    /// Verify credentials by email and issue an access token.
    ///
    /// Unknown email and wrong password are indistinguishable.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such account or password mismatch
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, UserError>;

    /// Resolve an access token to the user it identifies.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, forged, or expired, or the
    ///   subject no longer exists
    /// * `DatabaseError` - Store operation failed
    async fn identify(&self, token: &str) -> Result<User, UserError>;
}

/// Port for directory listing and profile operations.
#[async_trait]
pub trait DirectoryServicePort: Send + Sync + 'static {
    /// List users matching the given filters.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>, UserError>;

    /// Retrieve a single user by its raw identifier.
    ///
    /// # Errors
    /// * `InvalidUserId` - Identifier is not well-formed
    /// * `NotFound` - No matching record
    /// * `DatabaseError` - Store operation failed
    async fn get_user(&self, raw_id: &str) -> Result<User, UserError>;

    /// Apply a partial profile update on behalf of `actor`.
    ///
    /// Strictly self-only: the actor must be the target.
    ///
    /// # Errors
    /// * `Forbidden` - Actor is not the target
    /// * `InvalidUserId` - Target identifier is not well-formed
    /// * `EmptyUpdate` - Patch carries no fields
    /// * `NotFound` - No record matched or nothing was modified
    /// * `DatabaseError` - Store operation failed
    async fn update_profile(
        &self,
        actor: &UserId,
        raw_target: &str,
        patch: ProfilePatch,
    ) -> Result<User, UserError>;
}

/// Persistence operations for the user collection.
///
/// The store owns identifier encoding (`parse_id`), id assignment at
/// insert, and per-record consistency (unique email/username, atomic
/// update). This core issues single-record operations and treats them as
/// atomic.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Parse a raw identifier string into a `UserId`.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a well-formed identifier for this
    ///   store
    fn parse_id(&self, raw: &str) -> Result<UserId, UserIdError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Persist a new user and return the store-assigned identifier.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserError>;

    /// Apply the present patch fields to one record.
    ///
    /// # Returns
    /// Number of records modified (0 or 1)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn update_fields(&self, id: &UserId, patch: &ProfilePatch) -> Result<u64, UserError>;

    /// Evaluate a query predicate over the collection.
    ///
    /// Results follow the store's natural insertion order; `query.limit`
    /// bounds the result count.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn query(&self, query: &UserQuery) -> Result<Vec<User>, UserError>;
}
