use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::handlers::update_user::update_user;
use super::middleware::authenticate;
use crate::domain::user::service::AuthService;
use crate::domain::user::service::DirectoryService;
use crate::user::ports::UserRepository;

pub struct AppState<R: UserRepository> {
    pub auth_service: Arc<AuthService<R>>,
    pub directory_service: Arc<DirectoryService<R>>,
}

impl<R: UserRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            directory_service: Arc::clone(&self.directory_service),
        }
    }
}

pub fn create_router<R: UserRepository>(
    auth_service: Arc<AuthService<R>>,
    directory_service: Arc<DirectoryService<R>>,
) -> Router {
    let state = AppState {
        auth_service,
        directory_service,
    };

    let auth_layer = middleware::from_fn_with_state(state.clone(), authenticate::<R>);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // GET on /api/users/:user_id is public while PUT is bearer-protected,
    // so the auth layer is attached per method router rather than to a
    // separate protected sub-router.
    Router::new()
        .route("/api/auth/register", post(register::<R>))
        .route("/api/auth/login", post(login::<R>))
        .route("/api/auth/me", get(me).route_layer(auth_layer.clone()))
        .route("/api/users", get(list_users::<R>))
        .route(
            "/api/users/:user_id",
            get(get_user::<R>).merge(put(update_user::<R>).route_layer(auth_layer)),
        )
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
