use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth::confirm_email::confirm_email;
use super::handlers::auth::confirm_reset_password::confirm_reset_password;
use super::handlers::auth::login::login;
use super::handlers::auth::register::register;
use super::handlers::auth::request_email::request_email;
use super::handlers::auth::reset_password::reset_password;
use super::handlers::contacts::create_contact::create_contact;
use super::handlers::contacts::delete_contact::delete_contact;
use super::handlers::contacts::get_contact::get_contact;
use super::handlers::contacts::list_contacts::list_contacts;
use super::handlers::contacts::update_contact::update_contact;
use super::handlers::health::healthchecker;
use super::handlers::users::me::me;
use super::handlers::users::update_avatar::update_avatar;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::service::AuthService;
use crate::domain::contact::service::ContactService;
use crate::domain::user::service::UserService;
use crate::outbound::cache::RedisUserCache;
use crate::outbound::email::SmtpMailer;
use crate::outbound::repositories::PostgresContactRepository;
use crate::outbound::repositories::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub auth_service: Arc<AuthService<PostgresUserRepository, RedisUserCache>>,
    pub contact_service: Arc<ContactService<PostgresContactRepository>>,
    pub mailer: Arc<SmtpMailer>,
    pub avatar_requires_admin: bool,
    pub db: PgPool,
}

pub fn create_router(
    user_service: Arc<UserService<PostgresUserRepository>>,
    auth_service: Arc<AuthService<PostgresUserRepository, RedisUserCache>>,
    contact_service: Arc<ContactService<PostgresContactRepository>>,
    mailer: Arc<SmtpMailer>,
    avatar_requires_admin: bool,
    db: PgPool,
) -> Router {
    let state = AppState {
        user_service,
        auth_service,
        contact_service,
        mailer,
        avatar_requires_admin,
        db,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/confirmed_email/:token", get(confirm_email))
        .route("/api/auth/request_email", post(request_email))
        .route("/api/auth/reset_password", post(reset_password))
        .route(
            "/api/auth/confirm_reset_password/:token",
            get(confirm_reset_password),
        )
        .route("/api/healthchecker", get(healthchecker));

    let protected_routes = Router::new()
        .route("/api/users/me", get(me))
        .route("/api/users/avatar", patch(update_avatar))
        .route("/api/contacts", post(create_contact))
        .route("/api/contacts", get(list_contacts))
        .route("/api/contacts/:contact_id", get(get_contact))
        .route("/api/contacts/:contact_id", put(update_contact))
        .route("/api/contacts/:contact_id", delete(delete_contact))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

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

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
