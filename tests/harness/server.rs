//! TestServer - in-process listingd on a random port

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use listingd::api::LISTING_COPY_PATH;
use listingd::{Config, Server};
use reqwest::Client;
use serde_json::Value;
use tokio::task::JoinHandle;

/// Test harness that runs the listingd server on a random port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the given config; `bind_addr` is replaced
    pub async fn start(mut config: Config) -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        config.bind_addr = addr;
        let server = Arc::new(Server::new(config)?);

        let run_server = server.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = run_server.run().await {
                eprintln!("test server exited with error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        // Poll until server is ready (max 5 seconds)
        let mut ready = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 5 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            handle,
        })
    }

    /// Start a server with no provider credential
    pub async fn start_without_key() -> Result<Self> {
        Self::start(Config::default()).await
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// POST a raw body to the listing copy endpoint
    pub async fn post_raw(&self, body: impl Into<reqwest::Body>) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), LISTING_COPY_PATH))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await?)
    }

    /// POST a listing and return the decoded response body
    pub async fn post_listing(&self, listing: &Value) -> Result<Value> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url(), LISTING_COPY_PATH))
            .json(listing)
            .send()
            .await?;
        anyhow::ensure!(
            resp.status().is_success(),
            "unexpected status {}",
            resp.status()
        );
        Ok(resp.json().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.shutdown();
        self.handle.abort();
    }
}
