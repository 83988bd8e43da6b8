use std::net::SocketAddr;

use thiserror::Error;

/// Socket-level failures.
///
/// Bind errors are fatal to the process. Send failures are reported to the
/// caller, who decides whether to abort; the server logs them and keeps
/// serving. Filesystem errors never show up here, the executor converts
/// them into status replies on the wire.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot bind datagram socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("cannot send datagram to {dest}: {source}")]
    Send {
        dest: SocketAddr,
        source: std::io::Error,
    },
    #[error("cannot receive datagram: {0}")]
    Recv(#[source] std::io::Error),
}
