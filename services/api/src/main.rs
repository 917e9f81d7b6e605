use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, health_check, init_pool};

use api::{
    email::{EmailService, SmtpConfig},
    jwt::{JwtConfig, JwtService},
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::{AdminRepository, CarRepository, SubmissionRepository},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting dealer API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!().run(&pool).await?;
    info!("Database migrations applied");

    // Initialize services
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(&jwt_config);

    let smtp_config = SmtpConfig::from_env()?;
    let email_service = EmailService::new(&smtp_config)?;

    let admin_repository = AdminRepository::new(pool.clone());
    let car_repository = CarRepository::new(pool.clone());
    let submission_repository = SubmissionRepository::new(pool);
    let rate_limiter = RateLimiter::new(RateLimiterConfig::default());

    let secure_cookies = std::env::var("APP_ENV")
        .map(|env| env == "production")
        .unwrap_or(false);

    let app_state = AppState {
        admin_repository,
        car_repository,
        submission_repository,
        jwt_service,
        email_service,
        rate_limiter,
        secure_cookies,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!("Dealer API service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
