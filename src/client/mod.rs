//! Platform manager client.
//!
//! ```text
//!  pltfm_mgr_try ──▶ thrift_try ──▶ Connector::open ──▶ Connection
//!   (ouch → code)    (retry/backoff)   (per attempt)     (closed on drop)
//! ```
//!
//! [`PlatformClient`] bundles a connector, a retry policy and a sleeper
//! so callers only supply the operation.

pub mod adapter;
pub mod connection;
pub mod pltfm_mgr;
pub mod retry;

use log::info;

use crate::config::{ClientConfig, ConfigError};
use crate::error::Result;

use connection::{Connection, Connector, ManagerClient, ThriftConnector};
use pltfm_mgr::PltfmMgrClient;
use retry::{RetryPolicy, Sleeper, ThreadSleeper};

pub use adapter::pltfm_mgr_try;
pub use connection::pltfm_mgr_ready;
pub use retry::thrift_try;

/// Connector + retry policy + sleeper.
pub struct PlatformClient<K = ThriftConnector<PltfmMgrClient>, S = ThreadSleeper> {
    connector: K,
    policy: RetryPolicy,
    sleeper: S,
}

impl PlatformClient {
    /// Socket client for `pltfm_mgr_rpc` with the default endpoint and policy.
    pub fn local() -> Self {
        Self::from_parts(
            ThriftConnector::new(ClientConfig::default()),
            RetryPolicy::default(),
            ThreadSleeper,
        )
    }
}

impl<C: ManagerClient> PlatformClient<ThriftConnector<C>, ThreadSleeper> {
    /// Socket client built from a validated configuration.
    pub fn from_config(config: ClientConfig) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        let policy = RetryPolicy::from_config(&config);
        info!(
            "CLIENT | {}:{} service={} attempts={} backoff={}ms",
            config.host,
            config.port,
            config.service_name,
            config.attempts,
            config.backoff_ms
        );
        Ok(Self::from_parts(ThriftConnector::new(config), policy, ThreadSleeper))
    }
}

impl<K: Connector, S: Sleeper> PlatformClient<K, S> {
    pub fn from_parts(connector: K, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            connector,
            policy,
            sleeper,
        }
    }

    pub fn connector(&self) -> &K {
        &self.connector
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Single open/close check, no retries.
    pub fn ready(&self) -> bool {
        pltfm_mgr_ready(&self.connector)
    }

    /// Run `op` on a fresh connection, retrying transport failures.
    pub fn thrift_try<F, T>(&mut self, op: F) -> Result<T>
    where
        F: FnMut(&mut Connection<K::Client>) -> Result<T>,
    {
        thrift_try(&self.connector, &self.policy, &mut self.sleeper, op)
    }

    /// Run `op` on the manager client, mapping manager errors to `(code, default)`.
    pub fn pltfm_mgr_try<F, T>(&mut self, op: F, default: T) -> Result<(Option<i32>, T)>
    where
        F: FnMut(&mut K::Client) -> Result<T>,
        T: Clone,
    {
        pltfm_mgr_try(&self.connector, &self.policy, &mut self.sleeper, op, default)
    }
}
