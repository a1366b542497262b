//! Unified error types for the platform manager client.
//!
//! Every fallible call in the client funnels into [`Error`]. The variants
//! split failures by how the retry loop treats them:
//!
//! | Variant     | Meaning                                    | Retried |
//! |-------------|--------------------------------------------|---------|
//! | `Transport` | socket, decoding or application exception  | yes     |
//! | `Binding`   | manager client cannot bind to the session  | no      |
//! | `Manager`   | daemon rejected the operation with a code  | no      |
//! | `Fatal`     | anything else                              | no      |

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level client error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Error {
    /// Transport-level failure. The only retryable class.
    Transport(TransportError),
    /// The injected manager client could not be bound to the session.
    Binding(BindingError),
    /// The platform manager reported an invalid operation.
    Manager(ManagerError),
    /// Unclassified failure raised by caller code.
    Fatal(anyhow::Error),
}

impl Error {
    /// Whether the retry loop may try again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Binding(e) => write!(f, "binding: {e}"),
            Self::Manager(e) => write!(f, "manager: {e}"),
            Self::Fatal(e) => write!(f, "fatal: {e:#}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Binding(e) => Some(e),
            Self::Manager(e) => Some(e),
            Self::Fatal(e) => Some(e.as_ref()),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Self::Fatal(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// TCP connect failed (daemon not listening, host unresolvable).
    ConnectFailed(io::ErrorKind),
    /// Socket or buffering failure on an established session.
    Channel {
        kind: thrift::TransportErrorKind,
        message: String,
    },
    /// Bytes on the wire did not decode, or the reply did not match the call.
    Protocol {
        kind: thrift::ProtocolErrorKind,
        message: String,
    },
    /// The daemon answered with an application exception.
    Application { kind: i32, message: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed(kind) => write!(f, "connect failed ({kind})"),
            Self::Channel { kind, message } => write!(f, "channel {kind:?}: {message}"),
            Self::Protocol { kind, message } => write!(f, "protocol {kind:?}: {message}"),
            Self::Application { kind, message } => {
                write!(f, "application exception {kind}: {message}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Thrift transport, protocol and application failures are all
/// transport-level; user exceptions the stub did not claim are fatal.
impl From<thrift::Error> for Error {
    fn from(e: thrift::Error) -> Self {
        match e {
            thrift::Error::Transport(e) => Self::Transport(TransportError::Channel {
                kind: e.kind,
                message: e.message,
            }),
            thrift::Error::Protocol(e) => Self::Transport(TransportError::Protocol {
                kind: e.kind,
                message: e.message,
            }),
            thrift::Error::Application(e) => Self::Transport(TransportError::Application {
                kind: e.kind as i32,
                message: e.message,
            }),
            thrift::Error::User(e) => Self::Fatal(anyhow::anyhow!(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Binding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The session is multiplexed under a different service than the
    /// client was generated for.
    ServiceMismatch {
        expected: &'static str,
        configured: String,
    },
    /// The client refused the session for a client-specific reason.
    Rejected(&'static str),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceMismatch {
                expected,
                configured,
            } => write!(
                f,
                "client serves '{expected}' but session is multiplexed as '{configured}'"
            ),
            Self::Rejected(why) => write!(f, "client rejected session: {why}"),
        }
    }
}

impl std::error::Error for BindingError {}

impl From<BindingError> for Error {
    fn from(e: BindingError) -> Self {
        Self::Binding(e)
    }
}

// ---------------------------------------------------------------------------
// Manager errors
// ---------------------------------------------------------------------------

/// The daemon's `InvalidPltfmMgrOperation` signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerError {
    pub code: i32,
}

impl ManagerError {
    pub const fn new(code: i32) -> Self {
        Self { code }
    }
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid platform manager operation (code {})", self.code)
    }
}

impl std::error::Error for ManagerError {}

impl From<ManagerError> for Error {
    fn from(e: ManagerError) -> Self {
        Self::Manager(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Client-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
