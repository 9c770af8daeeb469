mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::announcements::{
    routes as announcements_routes, services::AnnouncementCache, AnnouncementService,
};
use crate::features::auth::{routes as auth_routes, AuthService, JwtValidator};
use crate::features::faqs::{routes as faqs_routes, services::FaqCache, FaqService};
use crate::features::files::{routes as files_routes, FileService};
use crate::features::moderation::ModerationService;
use crate::features::offices::routes::{self as offices_routes, OfficeState};
use crate::features::portals::{routes as portals_routes, PortalService};
use crate::features::quick_links::{routes as quick_links_routes, QuickLinkService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::storage::LocalStorage;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}, environment={}",
        worker_threads,
        std::process::id(),
        config.app.environment
    );
    tracing::info!("Configuration loaded, frontend at {}", config.app.frontend_url);

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    let storage = Arc::new(LocalStorage::new(&config.storage));
    storage
        .ensure_root()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare upload directory: {}", e))?;

    // Accounts and sessions
    let user_service = Arc::new(UserService::new(pool.clone()));
    let jwt_validator = Arc::new(JwtValidator::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expire,
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_service),
        jwt_validator,
        config.auth.clone(),
    ));
    tracing::info!("Auth service initialized");

    // Content
    let moderation_service = Arc::new(ModerationService::new(pool.clone()));
    let file_service = Arc::new(FileService::new(
        pool.clone(),
        Arc::clone(&storage),
        Arc::clone(&moderation_service),
    ));
    let announcement_service = Arc::new(AnnouncementService::new(
        pool.clone(),
        Arc::clone(&storage),
        Arc::clone(&moderation_service),
        AnnouncementCache::new(config.cache.ttl),
    ));
    let quick_link_service = Arc::new(QuickLinkService::new(
        pool.clone(),
        Arc::clone(&moderation_service),
    ));
    let portal_service = Arc::new(PortalService::new(
        pool.clone(),
        Arc::clone(&moderation_service),
    ));
    let faq_service = Arc::new(FaqService::new(
        pool.clone(),
        FaqCache::new(config.cache.ttl),
    ));
    let office_state = OfficeState {
        files: Arc::clone(&file_service),
        faqs: Arc::clone(&faq_service),
    };
    tracing::info!(
        "Content services initialized (cache ttl {}s)",
        config.cache.ttl.as_secs()
    );

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require a valid session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(users_routes::protected_routes(Arc::clone(&user_service)))
        .merge(offices_routes::protected_routes(office_state))
        .merge(files_routes::protected_routes(Arc::clone(&file_service)))
        .merge(announcements_routes::protected_routes(Arc::clone(
            &announcement_service,
        )))
        .merge(quick_links_routes::protected_routes(Arc::clone(
            &quick_link_service,
        )))
        .merge(portals_routes::protected_routes(Arc::clone(&portal_service)))
        .merge(faqs_routes::protected_routes(Arc::clone(&faq_service)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    // Public routes; a session, when present, is still resolved
    let public_routes = Router::new()
        .merge(users_routes::public_routes(Arc::clone(&user_service)))
        .merge(offices_routes::public_routes())
        .merge(files_routes::public_routes(file_service))
        .merge(announcements_routes::public_routes(announcement_service))
        .merge(quick_links_routes::public_routes(quick_link_service))
        .merge(portals_routes::public_routes(portal_service))
        .merge(faqs_routes::public_routes(faq_service))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::optional_auth_middleware,
        ))
        .merge(auth_routes::public_routes(auth_service));

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
