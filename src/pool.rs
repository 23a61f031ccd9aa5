//! Bounded pool of upstream HTTP clients.
//!
//! Each client wraps a `reqwest::blocking::Client` configured with the upstream's timeouts,
//! TLS settings, and connection limits. The pool hands out clients via [`ClientPool::get`]
//! and callers return them with [`ClientPool::put`] on every exit path, success or error.

use crate::config::ServerConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A pooled upstream client. Build once per pool; cheap to clone internally since
/// `reqwest::blocking::Client` is itself a handle around a connection-pooling `hyper` client.
#[derive(Clone)]
pub struct PooledClient(pub reqwest::blocking::Client);

/// Fixed-capacity pool of upstream clients.
///
/// `get()` pops an idle client, or builds a fresh one (up to `capacity`) if the pool is
/// empty; if capacity is already exhausted it blocks the calling coroutine until one is
/// returned. `put()` must be called on every exit path — callers should wrap pipeline work
/// in a guard that releases the client on drop.
pub struct ClientPool {
    idle: Mutex<Vec<PooledClient>>,
    capacity: usize,
    outstanding: Mutex<usize>,
    template: ServerConfig,
}

impl ClientPool {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let capacity = config.client_pool_capacity.max(1);
        Ok(Self {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            outstanding: Mutex::new(0),
            template: config.clone(),
        })
    }

    fn build_client(&self) -> anyhow::Result<PooledClient> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.template.read_timeout_secs))
            .connect_timeout(Duration::from_secs(self.template.dial_timeout_secs))
            .pool_max_idle_per_host(self.template.max_conns_per_host);
        if self.template.insecure_connection {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(ca_path) = &self.template.root_ca {
            let pem = std::fs::read(ca_path)?;
            let cert = reqwest::Certificate::from_pem(&pem)?;
            builder = builder.add_root_certificate(cert);
        }
        Ok(PooledClient(builder.build()?))
    }

    /// Acquire a client, building a fresh one if the pool is empty and under capacity.
    pub fn get(&self) -> anyhow::Result<PooledClient> {
        if let Some(client) = self.idle.lock().unwrap_or_else(|e| e.into_inner()).pop() {
            return Ok(client);
        }
        let mut outstanding = self.outstanding.lock().unwrap_or_else(|e| e.into_inner());
        if *outstanding >= self.capacity {
            anyhow::bail!("upstream client pool exhausted (capacity {})", self.capacity);
        }
        *outstanding += 1;
        drop(outstanding);
        match self.build_client() {
            Ok(client) => Ok(client),
            Err(e) => {
                let mut outstanding = self.outstanding.lock().unwrap_or_else(|e| e.into_inner());
                *outstanding = outstanding.saturating_sub(1);
                Err(e)
            }
        }
    }

    /// Return a client to the idle pool.
    pub fn put(&self, client: PooledClient) {
        self.idle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(client);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// RAII guard that returns its client to the pool on drop, covering every exit path
/// (early return, `?`, panic-unwind) without requiring callers to remember to call `put`.
pub struct LeasedClient<'a> {
    pool: &'a ClientPool,
    client: Option<PooledClient>,
}

impl<'a> LeasedClient<'a> {
    pub fn acquire(pool: &'a ClientPool) -> anyhow::Result<Self> {
        Ok(Self {
            pool,
            client: Some(pool.get()?),
        })
    }

    pub fn client(&self) -> &reqwest::blocking::Client {
        &self.client.as_ref().expect("client present until drop").0
    }
}

impl Drop for LeasedClient<'_> {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.pool.put(client);
        }
    }
}

/// Shared handle to a [`ClientPool`].
pub type SharedClientPool = Arc<ClientPool>;
