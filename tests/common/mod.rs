//! Common test utilities - CombatdTest harness for end-to-end testing

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use combatd::{Config, Server};
use reqwest::Client;
use serde_json::Value;
use tokio::task::JoinHandle;

/// Test harness that spawns a real combatd server on a random port
pub struct CombatdTest {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    _handle: JoinHandle<()>,
}

impl CombatdTest {
    /// Start a server with an in-memory database and seeded dice
    pub async fn start() -> Result<Self> {
        Self::start_with(Config {
            dice_seed: Some(1),
            ..Config::default()
        })
        .await
    }

    /// Start a server with the given config; the bind address is replaced
    pub async fn start_with(mut config: Config) -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        config.bind_addr = listener.local_addr()?;
        drop(listener);
        let addr = config.bind_addr;

        let server = Arc::new(Server::new(config).await?);
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
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
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            server,
            _handle: handle,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self.client.patch(self.url(path)).json(body).send().await?)
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self.client.put(self.url(path)).json(body).send().await?)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }

    /// POST and decode the JSON reply, failing on a non-2xx status
    pub async fn post_ok(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self.post(path, body).await?;
        let status = response.status();
        let json: Value = response.json().await?;
        anyhow::ensure!(status.is_success(), "POST {} -> {}: {}", path, status, json);
        Ok(json)
    }

    /// Add a combatant and return its id
    pub async fn add_combatant(&self, body: Value) -> Result<String> {
        let json = self.post_ok("/encounter/combatants", &body).await?;
        json["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("no id in {}", json))
    }

    /// Current encounter
    pub async fn encounter(&self) -> Result<Value> {
        Ok(self.get("/encounter").await?.json().await?)
    }

    /// Get direct access to the database for test setup/assertions
    pub fn db(&self) -> Arc<combatd::db::Database> {
        self.server.db()
    }

    /// Shutdown the server gracefully
    pub fn shutdown(&self) {
        self.server.shutdown();
    }
}
