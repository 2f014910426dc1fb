use axum::extract::Query;
use axum::extract::State;
use axum::Json;

use super::ApiError;
use super::UserData;
use crate::domain::user::query::UserFilter;
use crate::inbound::http::router::AppState;
use crate::user::ports::DirectoryServicePort;
use crate::user::ports::UserRepository;

pub async fn list_users<R: UserRepository>(
    State(state): State<AppState<R>>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<UserData>>, ApiError> {
    let users = state.directory_service.list_users(filter).await?;

    Ok(Json(users.iter().map(UserData::from).collect()))
}
