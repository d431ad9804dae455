use std::sync::Arc;

use jikjob_web::auth::{AuthRouteState, LoginFlow, SessionStore};
use jikjob_web::backend::{HttpJoinBackend, JoinBackend};
use jikjob_web::config::AppConfig;
use jikjob_web::server::build_router;
use jikjob_web::signup::{SignupManager, SignupRouteState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Arc::new(AppConfig::from_env()?);

    eprintln!("🏗  Jikjob Web v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Listening: http://0.0.0.0:{}", config.port);
    eprintln!("   Backend:   {}", config.api_base_url);
    eprintln!("   Static:    {}\n", config.public_dir.display());

    let backend: Arc<dyn JoinBackend> =
        Arc::new(HttpJoinBackend::new(config.api_base_url.clone()));
    let session = Arc::new(SessionStore::new());

    let signup = SignupRouteState {
        manager: Arc::new(SignupManager::new(Arc::clone(&backend))),
    };
    let auth = AuthRouteState {
        flow: Arc::new(LoginFlow::new(backend, Arc::clone(&session))),
        session,
    };

    let app = build_router(Arc::clone(&config), signup, auth);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
