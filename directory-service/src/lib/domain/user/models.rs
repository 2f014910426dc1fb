use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::UsernameError;

/// Profile defaults applied at registration.
pub const DEFAULT_AVATAR: &str =
    "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?w=400&h=400&fit=crop";
pub const DEFAULT_COVER_IMAGE: &str =
    "https://images.unsplash.com/photo-1557672172-298e090bd0f1?w=1200&h=400&fit=crop";
pub const DEFAULT_MEDIUM: &str = "Digital";
pub const DEFAULT_EXPERIENCE: &str = "Emerging";

/// User aggregate entity.
///
/// Represents a registered user: profile attributes plus the stored
/// credential. The `password_hash` never appears in any outward-facing
/// representation; response shaping at the HTTP boundary omits it by
/// construction.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub bio: String,
    pub avatar: String,
    pub cover_image: String,
    pub location: String,
    pub medium: String,
    pub experience: String,
    pub social: SocialLinks,
    pub verified: bool,
    pub followers: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric,
/// underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Social profile links. Individual links are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

/// Command to register a new user with domain types.
///
/// `username` is optional; when absent the service derives one from `name`.
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: String,
    pub email: EmailAddress,
    pub password: String,
    pub username: Option<Username>,
}

/// A fully-shaped user record awaiting a store-assigned identifier.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub bio: String,
    pub avatar: String,
    pub cover_image: String,
    pub location: String,
    pub medium: String,
    pub experience: String,
    pub social: SocialLinks,
    pub verified: bool,
    pub followers: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Shape a registration into a record with the default profile.
    pub fn with_default_profile(
        name: String,
        username: Username,
        email: EmailAddress,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            name,
            username,
            email,
            password_hash,
            bio: String::new(),
            avatar: DEFAULT_AVATAR.to_string(),
            cover_image: DEFAULT_COVER_IMAGE.to_string(),
            location: String::new(),
            medium: DEFAULT_MEDIUM.to_string(),
            experience: DEFAULT_EXPERIENCE.to_string(),
            social: SocialLinks::default(),
            verified: false,
            followers: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the store-assigned identifier, completing the aggregate.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            bio: self.bio,
            avatar: self.avatar,
            cover_image: self.cover_image,
            location: self.location,
            medium: self.medium,
            experience: self.experience,
            social: self.social,
            verified: self.verified,
            followers: self.followers,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial profile update.
///
/// Absent fields are untouched, not reset. `social`, when present, replaces
/// the whole links object. `updated_at` is stamped by the service, never by
/// callers.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub medium: Option<String>,
    pub experience: Option<String>,
    pub social: Option<SocialLinks>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    /// True when no user-settable field is present.
    pub fn is_empty(&self) -> bool {
        self.bio.is_none()
            && self.location.is_none()
            && self.medium.is_none()
            && self.experience.is_none()
            && self.social.is_none()
            && self.avatar.is_none()
            && self.cover_image.is_none()
    }

    /// Apply the present fields to a user record.
    ///
    /// Defines the patch semantics; store adapters must produce the same
    /// observable result.
    pub fn apply(&self, user: &mut User) {
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
        if let Some(location) = &self.location {
            user.location = location.clone();
        }
        if let Some(medium) = &self.medium {
            user.medium = medium.clone();
        }
        if let Some(experience) = &self.experience {
            user.experience = experience.clone();
        }
        if let Some(social) = &self.social {
            user.social = social.clone();
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = avatar.clone();
        }
        if let Some(cover_image) = &self.cover_image {
            user.cover_image = cover_image.clone();
        }
        if let Some(updated_at) = self.updated_at {
            user.updated_at = updated_at;
        }
    }
}

/// A registered or logged-in principal together with its access token.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
}
