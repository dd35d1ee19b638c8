mod cache;
mod error;
mod llm_client;
mod orchestrator;
mod persona;
mod routes;
mod store;
mod tool_registry;
mod tools;
mod types;

#[cfg(test)]
mod mocks;
#[cfg(test)]
mod tests;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::cache::TtlCache;
use crate::llm_client::LlmClient;
use crate::orchestrator::Orchestrator;
use crate::routes::AppState;
use crate::store::{EmployeeStore, IdentityCasePolicy, SqliteStore};

const REPLY_CACHE_TTL: Duration = Duration::from_secs(3600);
const REPLY_CACHE_MAXSIZE: usize = 512;

struct Config {
    base_url: String,
    api_key: String,
    model: String,
    database_path: String,
    bind_addr: String,
    case_policy: IdentityCasePolicy,
}

impl Config {
    fn from_env() -> anyhow::Result<Self> {
        let case_policy = match env::var("IDENTITY_CASE_POLICY").ok() {
            Some(raw) => IdentityCasePolicy::parse(&raw)
                .with_context(|| format!("invalid IDENTITY_CASE_POLICY '{raw}'"))?,
            None => IdentityCasePolicy::Exact,
        };
        Ok(Self {
            base_url: env::var("OPENAI_BASE_URL").context("OPENAI_BASE_URL not set")?,
            api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?,
            model: env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/employees.db".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            case_policy,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn EmployeeStore> =
        Arc::new(SqliteStore::open(&config.database_path, config.case_policy)?);
    let llm = Arc::new(LlmClient::new(
        config.base_url,
        config.api_key,
        config.model,
    )?);
    let orchestrator = Arc::new(Orchestrator::new(llm, store.clone()));
    let reply_cache = Arc::new(TtlCache::new(REPLY_CACHE_TTL, REPLY_CACHE_MAXSIZE));

    let app = routes::router(AppState {
        orchestrator,
        store,
        reply_cache,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "training assistant API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
