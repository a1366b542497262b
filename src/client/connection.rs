//! Connection manager.
//!
//! [`Connector::open`] hands out a fully opened [`Connection`]; dropping
//! it closes the socket, so every exit path (normal return, `?`,
//! panic unwind) releases it.
//!
//! ```text
//!  TcpStream ─┬─ read half  ─▶ TBufferedReadTransport  ─▶ TBinaryInputProtocol
//!             ├─ write half ─▶ TBufferedWriteTransport ─▶ TBinaryOutputProtocol
//!             │                                            ─▶ TMultiplexedOutputProtocol
//!             └─ link (closed by Connection)
//! ```
//!
//! The manager client is injected as a type implementing
//! [`ManagerClient`] rather than looked up at runtime.

use core::marker::PhantomData;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};

use log::debug;
use thrift::protocol::{
    TBinaryInputProtocol, TBinaryOutputProtocol, TInputProtocol, TMultiplexedOutputProtocol,
    TOutputProtocol,
};
use thrift::transport::{TBufferedReadTransport, TBufferedWriteTransport, TIoChannel, TTcpChannel};

use crate::config::ClientConfig;
use crate::error::{BindingError, Result, TransportError};

// ───────────────────────────────────────────────────────────────
// Manager client binding
// ───────────────────────────────────────────────────────────────

/// A client stub for one multiplexed service.
pub trait ManagerClient: Sized {
    /// Service name the stub was generated for.
    const SERVICE: &'static str;

    /// Bind the stub to a connected protocol pair.
    fn bind(
        input: Box<dyn TInputProtocol>,
        output: Box<dyn TOutputProtocol>,
    ) -> core::result::Result<Self, BindingError>;
}

// ───────────────────────────────────────────────────────────────
// Connection
// ───────────────────────────────────────────────────────────────

/// The socket under a session. Closing it ends both protocol halves.
pub trait Link {
    fn close(&mut self);
}

impl Link for TTcpChannel {
    fn close(&mut self) {
        if let Err(e) = TTcpChannel::close(self) {
            debug!("CONN | close: {}", e);
        }
    }
}

/// An open connection holding the manager client.
pub struct Connection<C> {
    client: C,
    link: Box<dyn Link>,
    open: bool,
}

impl<C> Connection<C> {
    /// Wrap a client whose session is already connected through `link`.
    pub fn new(client: C, link: impl Link + 'static) -> Self {
        Self {
            client,
            link: Box::new(link),
            open: true,
        }
    }

    /// The manager client.
    pub fn pltfm_mgr(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close now instead of at end of scope.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.open {
            self.open = false;
            self.link.close();
        }
    }
}

impl<C> Drop for Connection<C> {
    fn drop(&mut self) {
        self.release();
    }
}

// ───────────────────────────────────────────────────────────────
// Connector
// ───────────────────────────────────────────────────────────────

/// Opens connections for the retry loop.
pub trait Connector {
    type Client;

    fn open(&self) -> Result<Connection<Self::Client>>;
}

/// Socket connector: TCP → buffered → binary → multiplexed → client.
pub struct ThriftConnector<C> {
    config: ClientConfig,
    _client: PhantomData<fn() -> C>,
}

impl<C: ManagerClient> ThriftConnector<C> {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            _client: PhantomData,
        }
    }

    /// Connect to the first resolved address that accepts.
    fn connect(&self) -> core::result::Result<TcpStream, TransportError> {
        let addrs = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()
            .map_err(|e| TransportError::ConnectFailed(e.kind()))?;

        let mut last = io::ErrorKind::AddrNotAvailable;
        for addr in addrs {
            let attempt = match self.config.connect_timeout() {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    stream
                        .set_read_timeout(self.config.read_timeout())
                        .and_then(|()| stream.set_nodelay(true))
                        .map_err(|e| TransportError::ConnectFailed(e.kind()))?;
                    return Ok(stream);
                }
                Err(e) => last = e.kind(),
            }
        }
        Err(TransportError::ConnectFailed(last))
    }
}

impl<C: ManagerClient> Connector for ThriftConnector<C> {
    type Client = C;

    fn open(&self) -> Result<Connection<C>> {
        let service = self.config.service_name.as_str();
        if service != C::SERVICE {
            return Err(BindingError::ServiceMismatch {
                expected: C::SERVICE,
                configured: service.into(),
            }
            .into());
        }

        let stream = self.connect()?;
        let link = TTcpChannel::with_stream(
            stream
                .try_clone()
                .map_err(|e| TransportError::ConnectFailed(e.kind()))?,
        );
        let (read, write) = TTcpChannel::with_stream(stream).split()?;

        let input = TBinaryInputProtocol::new(TBufferedReadTransport::new(read), true);
        let output = TMultiplexedOutputProtocol::new(
            service,
            TBinaryOutputProtocol::new(TBufferedWriteTransport::new(write), true),
        );
        let client = C::bind(Box::new(input), Box::new(output))?;

        debug!(
            "CONN | opened {}:{} ({})",
            self.config.host, self.config.port, C::SERVICE
        );
        Ok(Connection::new(client, link))
    }
}

// ───────────────────────────────────────────────────────────────
// Readiness
// ───────────────────────────────────────────────────────────────

/// Whether the daemon accepts a connection right now.
///
/// One open/close cycle; every failure, whatever its kind, reads as `false`.
pub fn pltfm_mgr_ready<K: Connector>(connector: &K) -> bool {
    match connector.open() {
        Ok(conn) => {
            conn.close();
            true
        }
        Err(e) => {
            debug!("READY | platform manager not reachable: {}", e);
            false
        }
    }
}
