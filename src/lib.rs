//! Platform manager client library.
//!
//! - [`client`]: connect-call-retry wrapper around the `pltfm_mgr_rpc`
//!   service on `localhost:9090`, speaking Thrift binary over a buffered,
//!   multiplexed socket session.
//! - [`platform`]: chassis capability traits and thermal policy.
//! - [`mock`]: in-memory chassis fixtures for tests.

#![deny(unused_must_use)]

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod platform;

pub use client::PlatformClient;
pub use error::{Error, Result};
