use axum::extract::Path;
use axum::extract::State;
use axum::Json;

use super::ApiError;
use super::UserData;
use crate::inbound::http::router::AppState;
use crate::user::ports::DirectoryServicePort;
use crate::user::ports::UserRepository;

pub async fn get_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserData>, ApiError> {
    let user = state.directory_service.get_user(&user_id).await?;

    Ok(Json((&user).into()))
}
