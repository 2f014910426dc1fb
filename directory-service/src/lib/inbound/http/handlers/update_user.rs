use axum::extract::Path;
use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::UserData;
use crate::domain::user::models::ProfilePatch;
use crate::domain::user::models::SocialLinks;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::ports::DirectoryServicePort;
use crate::user::ports::UserRepository;

pub async fn update_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserData>, ApiError> {
    let user = state
        .directory_service
        .update_profile(&auth.user.id, &user_id, body.into_patch())
        .await?;

    Ok(Json((&user).into()))
}

/// HTTP request body for a profile update (raw JSON).
///
/// Every field is optional; absent fields are left untouched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    medium: Option<String>,
    #[serde(default)]
    experience: Option<String>,
    #[serde(default)]
    social: Option<SocialLinks>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    cover_image: Option<String>,
}

impl UpdateUserRequest {
    fn into_patch(self) -> ProfilePatch {
        ProfilePatch {
            bio: self.bio,
            location: self.location,
            medium: self.medium,
            experience: self.experience,
            social: self.social,
            avatar: self.avatar,
            cover_image: self.cover_image,
            updated_at: None,
        }
    }
}
