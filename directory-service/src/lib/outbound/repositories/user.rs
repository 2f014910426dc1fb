use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::ProfilePatch;
use crate::domain::user::models::SocialLinks;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::query::UserQuery;
use crate::user::errors::UserError;
use crate::user::errors::UserIdError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    username: String,
    email: String,
    password_hash: String,
    bio: String,
    avatar: String,
    cover_image: String,
    location: String,
    medium: String,
    experience: String,
    social_instagram: Option<String>,
    social_twitter: Option<String>,
    social_website: Option<String>,
    verified: bool,
    followers: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            name: self.name,
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            bio: self.bio,
            avatar: self.avatar,
            cover_image: self.cover_image,
            location: self.location,
            medium: self.medium,
            experience: self.experience,
            social: SocialLinks {
                instagram: self.social_instagram,
                twitter: self.social_twitter,
                website: self.social_website,
            },
            verified: self.verified,
            followers: self.followers,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    fn parse_id(&self, raw: &str) -> Result<UserId, UserIdError> {
        Uuid::parse_str(raw)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn insert(&self, user: &NewUser) -> Result<UserId, UserError> {
        let id = UserId::new();

        sqlx::query(
            "INSERT INTO users (id, name, username, email, password_hash, bio, avatar, \
             cover_image, location, medium, experience, social_instagram, social_twitter, \
             social_website, verified, followers, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18)",
        )
        .bind(id.0)
        .bind(&user.name)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.bio)
        .bind(&user.avatar)
        .bind(&user.cover_image)
        .bind(&user.location)
        .bind(&user.medium)
        .bind(&user.experience)
        .bind(user.social.instagram.clone())
        .bind(user.social.twitter.clone())
        .bind(user.social.website.clone())
        .bind(user.verified)
        .bind(user.followers)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_from_unique_violation(e, user))?;

        Ok(id)
    }

    async fn update_fields(&self, id: &UserId, patch: &ProfilePatch) -> Result<u64, UserError> {
        // Callers stamp `updated_at` before the update, so the SET list is
        // never empty here.
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut fields = builder.separated(", ");

        if let Some(bio) = &patch.bio {
            fields.push("bio = ");
            fields.push_bind_unseparated(bio.clone());
        }
        if let Some(location) = &patch.location {
            fields.push("location = ");
            fields.push_bind_unseparated(location.clone());
        }
        if let Some(medium) = &patch.medium {
            fields.push("medium = ");
            fields.push_bind_unseparated(medium.clone());
        }
        if let Some(experience) = &patch.experience {
            fields.push("experience = ");
            fields.push_bind_unseparated(experience.clone());
        }
        if let Some(social) = &patch.social {
            fields.push("social_instagram = ");
            fields.push_bind_unseparated(social.instagram.clone());
            fields.push("social_twitter = ");
            fields.push_bind_unseparated(social.twitter.clone());
            fields.push("social_website = ");
            fields.push_bind_unseparated(social.website.clone());
        }
        if let Some(avatar) = &patch.avatar {
            fields.push("avatar = ");
            fields.push_bind_unseparated(avatar.clone());
        }
        if let Some(cover_image) = &patch.cover_image {
            fields.push("cover_image = ");
            fields.push_bind_unseparated(cover_image.clone());
        }
        if let Some(updated_at) = patch.updated_at {
            fields.push("updated_at = ");
            fields.push_bind_unseparated(updated_at);
        }

        builder.push(" WHERE id = ").push_bind(id.0);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn query(&self, query: &UserQuery) -> Result<Vec<User>, UserError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM users");
        let mut prefix = " WHERE ";

        if let Some(medium) = &query.medium {
            builder.push(prefix).push("medium = ").push_bind(medium.clone());
            prefix = " AND ";
        }
        if let Some(experience) = &query.experience {
            builder
                .push(prefix)
                .push("experience = ")
                .push_bind(experience.clone());
            prefix = " AND ";
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", escape_like(search));
            builder
                .push(prefix)
                .push("(name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR username ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR bio ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        // Insertion order: rows are stamped with created_at on insert
        builder.push(" ORDER BY created_at");

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows: Vec<UserRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(UserRow::try_into_user).collect()
    }
}

fn conflict_from_unique_violation(e: sqlx::Error, user: &NewUser) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_username_key") {
                return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
            }
            if db_err.constraint() == Some("users_email_key") {
                return UserError::EmailAlreadyExists(user.email.as_str().to_string());
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

/// Escape LIKE wildcards so search text is matched literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_done"), "50\\%\\_done");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
