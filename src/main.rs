use std::io::Error;
use std::sync::Arc;

use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use sqlx::postgres::PgPoolOptions;
use tokio::main;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dispatch::{
    application::{
        handlers::dispatch_orchestrator::DispatchOrchestrator,
        services::{clock::SystemClock, messenger::MessagingBackend},
    },
    domain::repositories::{DispatchConfigurationRepository, MessagingInstanceRepository},
    infrastructure::{
        messaging::{
            http::{HttpMessagingBackend, HttpMessagingConfig},
            in_memory::InMemoryMessagingBackend,
        },
        repositories::{
            in_memory::{InMemoryDispatchConfigurationRepository, InMemoryMessagingInstanceRepository},
            postgres::{PostgresDispatchConfigurationRepository, PostgresMessagingInstanceRepository},
        },
    },
    presentation::http::endpoints::{
        configurations::ConfigurationsEndpoints, dispatch::DispatchEndpoints,
        health::HealthEndpoints, instances::InstancesEndpoints, root::ApiState,
    },
};

use crate::config::{Config, LogFormat};

mod config;

#[main]
async fn main() -> Result<(), Error> {
    let config = Config::try_parse().map_err(Error::other)?;
    init_tracing(config.log_format);

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);

    let (config_repo, instance_repo) = build_repositories(&config).await?;
    let backend = build_backend(&config)?;

    let orchestrator = Arc::new(
        DispatchOrchestrator::new(backend, Arc::new(SystemClock))
            .with_fallback_interval(config.fallback_interval),
    );

    let state = Arc::new(ApiState::new(config_repo, instance_repo, orchestrator));

    info!(%server_url, "starting server");

    let endpoints = (
        HealthEndpoints,
        ConfigurationsEndpoints::new(state.clone()),
        InstancesEndpoints::new(state.clone()),
        DispatchEndpoints::new(state),
    );
    let api_service = OpenApiService::new(endpoints, "Broker Dispatch API", "0.1.0")
        .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/", ui);

    Server::new(TcpListener::bind(format!("0.0.0.0:{}", config.port)))
        .run(app)
        .await
}

fn init_tracing(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn build_repositories(
    config: &Config,
) -> Result<
    (
        Arc<dyn DispatchConfigurationRepository>,
        Arc<dyn MessagingInstanceRepository>,
    ),
    Error,
> {
    let Some(database_url) = &config.database_url else {
        info!("DATABASE_URL not set, using in-memory repositories");
        let config_repo: Arc<dyn DispatchConfigurationRepository> =
            Arc::new(InMemoryDispatchConfigurationRepository::new());
        let instance_repo: Arc<dyn MessagingInstanceRepository> =
            Arc::new(InMemoryMessagingInstanceRepository::new());
        return Ok((config_repo, instance_repo));
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(Error::other)?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(Error::other)?;

    let config_repo: Arc<dyn DispatchConfigurationRepository> =
        PostgresDispatchConfigurationRepository::new(pool.clone());
    let instance_repo: Arc<dyn MessagingInstanceRepository> =
        PostgresMessagingInstanceRepository::new(pool);
    Ok((config_repo, instance_repo))
}

fn build_backend(config: &Config) -> Result<Arc<dyn MessagingBackend>, Error> {
    match &config.messaging_api_url {
        Some(base_url) => HttpMessagingBackend::new(HttpMessagingConfig {
            base_url: base_url.clone(),
            api_key: config.messaging_api_key.clone(),
            timeout: config.messaging_timeout,
        })
        .map_err(Error::other),
        None => {
            warn!("MESSAGING_IN_MEMORY enabled, messages are kept in process and never delivered");
            let backend: Arc<dyn MessagingBackend> = Arc::new(InMemoryMessagingBackend::new());
            Ok(backend)
        }
    }
}
