//! Operation adapter.
//!
//! Turns the manager's invalid-operation error into a `(code, default)`
//! pair so callers can branch on the code instead of matching errors.
//! Transport retries stay with [`thrift_try`].

use crate::error::{Error, Result};

use super::connection::Connector;
use super::retry::{RetryPolicy, Sleeper, thrift_try};

/// Run `op` on the manager client.
///
/// - `Ok(v)` → `(None, v)`
/// - manager error with `code` → `(Some(code), default)`
/// - anything else propagates through the retry executor
pub fn pltfm_mgr_try<K, S, F, T>(
    connector: &K,
    policy: &RetryPolicy,
    sleeper: &mut S,
    mut op: F,
    default: T,
) -> Result<(Option<i32>, T)>
where
    K: Connector,
    S: Sleeper + ?Sized,
    F: FnMut(&mut K::Client) -> Result<T>,
    T: Clone,
{
    thrift_try(connector, policy, sleeper, |conn| match op(conn.pltfm_mgr()) {
        Ok(value) => Ok((None, value)),
        Err(Error::Manager(ouch)) => Ok((Some(ouch.code), default.clone())),
        Err(e) => Err(e),
    })
}
