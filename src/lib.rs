//! listingd - property listing copy relay daemon
//!
//! Accepts listing metadata over HTTP and returns a title plus "business" and
//! "emotional" descriptions. Copy comes from an external chat-completion
//! provider when one is configured and answers usefully, and from a
//! deterministic template generator otherwise.

pub mod api;
pub mod compose;
pub mod listing;
pub mod llm;
pub mod prompt;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use axum::Router;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use api::AppState;
use listing::Locale;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "listingd.toml";

/// Unprefixed provider variables honoured alongside `LISTINGD_*`
const PROVIDER_ENV_KEYS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENAI_MODEL",
    "OPENAI_BASE_URL",
    "OPENAI_ORG_ID",
    "OPENAI_PROJECT_ID",
];

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Provider credential; absent or blank means fallback-only operation
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub openai_org_id: Option<String>,
    pub openai_project_id: Option<String>,
    /// Upper bound on a single provider call
    pub llm_timeout_secs: u64,
    /// Base for resolving relative image paths
    pub public_base_url: String,
    pub max_images: usize,
    /// Request bodies past this size are treated as empty
    pub max_body_bytes: usize,
    /// Comma-separated allow-list, or `*`
    pub cors_origin: String,
    /// Copy language used when a request does not name one
    pub locale: Locale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_org_id: None,
            openai_project_id: None,
            llm_timeout_secs: 25,
            public_base_url: String::new(),
            max_images: 6,
            max_body_bytes: 2 * 1024 * 1024,
            cors_origin: "*".to_string(),
            locale: Locale::En,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the TOML file, then the environment.
    ///
    /// A missing TOML file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("LISTINGD_"))
            .merge(Env::raw().only(PROVIDER_ENV_KEYS))
            .extract()
    }

    /// Whether a usable provider credential is present
    pub fn has_api_key(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// The listingd server instance
pub struct Server {
    config: Config,
    state: AppState,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            state,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Build the router
    pub fn router(&self) -> Router {
        api::router(self.state.clone())
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!(
            llm_configured = self.config.has_api_key(),
            model = %self.config.openai_model,
            "listingd listening on {}",
            local_addr
        );

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("listingd shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
