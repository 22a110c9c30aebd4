use std::sync::Arc;
use std::time::Duration;

use auth::Algorithm;
use auth::TokenCodec;
use contacts_service::config::Config;
use contacts_service::domain::auth::service::AuthService;
use contacts_service::domain::contact::service::ContactService;
use contacts_service::domain::user::service::UserService;
use contacts_service::inbound::http::router::create_router;
use contacts_service::outbound::cache::RedisUserCache;
use contacts_service::outbound::email::SmtpMailer;
use contacts_service::outbound::repositories::PostgresContactRepository;
use contacts_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contacts_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "contacts-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database_url = %config.database.url,
        redis_url = %config.redis.url,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let algorithm: Algorithm = config.jwt.algorithm.parse()?;
    let token_codec = TokenCodec::with_algorithm(config.jwt.secret.as_bytes(), algorithm);

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let contact_repository = Arc::new(PostgresContactRepository::new(pg_pool.clone()));
    let user_cache = Arc::new(RedisUserCache::new(&config.redis.url)?);
    let mailer = Arc::new(SmtpMailer::new(&config.mail, &config.server.public_url)?);

    let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        user_cache,
        token_codec,
        config.jwt.expiration_seconds,
        Duration::from_secs(config.redis.user_cache_ttl_seconds),
    ));
    let contact_service = Arc::new(ContactService::new(contact_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        user_service,
        auth_service,
        contact_service,
        mailer,
        config.policy.avatar_requires_admin,
        pg_pool,
    );

    axum::serve(http_listener, http_application).await?;

    Ok(())
}
