use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::AuthResponseData;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

pub async fn login<R: UserRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponseData>, ApiError> {
    let email = EmailAddress::new(body.email)
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid email: {}", e)))?;

    let session = state
        .auth_service
        .login(email.as_str(), &body.password)
        .await?;

    Ok(Json((&session).into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
