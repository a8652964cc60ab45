use std::fmt::Display;

use thiserror::Error;

use crate::protocols::ws::WsError;

/*----- */
// WebSocketError
/*----- */
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("WebSocket error: {0}")]
    WebSocketError(#[from] WsError),

    #[error("Deserialising JSON error: {error} for payload: {payload}")]
    Deserialise {
        error: serde_json::Error,
        payload: String,
    },

    #[error("Serialising JSON error: {0}")]
    Serialise(serde_json::Error),

    // Peer ended the connection. Every receive loop expects this, callers
    // match on it instead of treating it as a fault.
    #[error("{0}")]
    ConnectionClosed(ConnectionClosed),

    #[error("failed to write feed output: {0}")]
    Output(#[from] std::io::Error),
}

impl SocketError {
    pub fn is_expected_closure(&self) -> bool {
        matches!(self, SocketError::ConnectionClosed(_))
    }
}

impl From<ConnectionClosed> for SocketError {
    fn from(closed: ConnectionClosed) -> Self {
        SocketError::ConnectionClosed(closed)
    }
}

/*----- */
// Connection closed
/*----- */
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConnectionClosed {
    pub clean: bool,
    pub reason: String,
}

impl ConnectionClosed {
    pub fn cleanly<S: Into<String>>(reason: S) -> Self {
        Self {
            clean: true,
            reason: reason.into(),
        }
    }

    pub fn with_error<S: Into<String>>(reason: S) -> Self {
        Self {
            clean: false,
            reason: reason.into(),
        }
    }
}

impl Display for ConnectionClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.clean {
            true => write!(f, "connection closed cleanly: {}", self.reason),
            false => write!(f, "connection closed with error: {}", self.reason),
        }
    }
}

/*----- */
// Config Errors
/*----- */
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("product list must contain at least one product id")]
    EmptyProducts,

    #[error("product id at position {position} is blank")]
    BlankProduct { position: usize },

    #[error("at least one channel is required")]
    EmptyChannels,

    #[error("invalid feed url {url}: {error}")]
    InvalidUrl { url: String, error: url::ParseError },

    #[error("feed url {url} must use the ws or wss scheme, got {scheme}")]
    UnsupportedScheme { url: String, scheme: String },
}
