use std::time::Duration;
use thiserror::Error;

/// The socket to the server could not be established.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("could not connect to {addr}: {source}")]
    Io {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("connecting to {addr} timed out after {timeout:?}")]
    TimedOut { addr: String, timeout: Duration },
}

/// A snapshot could not be read from the stream.
///
/// Always fatal for the receive loop.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("io error while reading snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stream closed with {remaining} bytes of an unfinished snapshot")]
    Truncated { remaining: usize },
    #[error("pending snapshot is {size} bytes, larger than the {max} bytes limit")]
    SnapshotTooLarge { size: usize, max: usize },
}

/// A packet could not be queued for the server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("client is not connected")]
    NotConnected,
    #[error("connection to the server is closed")]
    Disconnected,
}
