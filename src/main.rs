//! Shillbot binary: Telegram poller plus the redirect HTTP server.

use std::future::IntoFuture;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shillbot::adapters::ai::{OpenAIConfig, OpenAIProvider};
use shillbot::adapters::http::{redirect_router, RedirectAppState};
use shillbot::adapters::memory::{
    InMemoryConfigurationRepository, InMemoryLinkRepository, InMemoryReplyRepository,
};
use shillbot::adapters::postgres::{
    self, PostgresConfigurationRepository, PostgresLinkRepository, PostgresReplyRepository,
};
use shillbot::adapters::telegram::{TelegramClient, TelegramPoller};
use shillbot::application::{
    ChatStateStore, CommandDispatcher, FlowServices, RedeemLinkHandler, ReplyGenerator,
};
use shillbot::config::AppConfig;
use shillbot::domain::reply::PersonaTable;
use shillbot::ports::{ConfigurationRepository, LinkRepository, ReplyRepository};

struct Stores {
    links: Arc<dyn LinkRepository>,
    replies: Arc<dyn ReplyRepository>,
    configurations: Arc<dyn ConfigurationRepository>,
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}

async fn build_stores(config: &AppConfig) -> Result<Stores, sqlx::Error> {
    if config.database.connection_url().is_none() {
        warn!("No database configured, using in-memory stores");
        return Ok(Stores {
            links: Arc::new(InMemoryLinkRepository::new()),
            replies: Arc::new(InMemoryReplyRepository::new()),
            configurations: Arc::new(InMemoryConfigurationRepository::new()),
        });
    }

    let pool = postgres::connect(&config.database).await?;
    info!("Database connection established");
    Ok(Stores {
        links: Arc::new(PostgresLinkRepository::new(pool.clone())),
        replies: Arc::new(PostgresReplyRepository::new(pool.clone())),
        configurations: Arc::new(PostgresConfigurationRepository::new(pool)),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    info!(environment = ?config.server.environment, "Starting shillbot");

    let personas = Arc::new(match &config.personas.path {
        Some(path) => PersonaTable::load(path)?,
        None => PersonaTable::default(),
    });
    info!(chat_personas = personas.len(), "Persona table ready");

    let stores = build_stores(&config).await?;

    let api_key = config
        .ai
        .openai_api_key
        .as_ref()
        .map(|key| key.expose_secret().clone())
        .unwrap_or_default();
    let provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?;

    let telegram = Arc::new(TelegramClient::new(
        config.telegram.bot_token.clone(),
        config.telegram.api_base.clone(),
        config.telegram.poll_timeout(),
    )?);

    let services = FlowServices {
        transport: telegram.clone(),
        links: stores.links.clone(),
        configurations: stores.configurations.clone(),
        personas: personas.clone(),
        public_url: config.server.public_base_url().to_string(),
    };
    let store = Arc::new(ChatStateStore::new());
    let dispatcher = Arc::new(CommandDispatcher::new(store, services));
    let poller = TelegramPoller::new(telegram, dispatcher);

    let generator = Arc::new(ReplyGenerator::new(
        Arc::new(provider),
        personas,
        stores.configurations,
    ));
    let redeem = Arc::new(RedeemLinkHandler::new(
        stores.links,
        stores.replies,
        generator,
    ));
    let app = redirect_router().with_state(RedirectAppState::new(redeem));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server stopped");
                return Err(e.into());
            }
        }
        _ = poller.run() => {
            warn!("Telegram poller stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
