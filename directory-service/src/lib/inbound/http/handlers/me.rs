use axum::Extension;
use axum::Json;

use super::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Return the principal identified by the bearer token.
///
/// Token validation and the principal lookup happen in the auth middleware.
pub async fn me(Extension(auth): Extension<AuthenticatedUser>) -> Json<UserData> {
    Json((&auth.user).into())
}
