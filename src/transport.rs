use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;

use crate::error::TransportError;
use crate::protocol::BUFFER_SIZE;

/// One connectionless datagram endpoint.
///
/// Sends go to an explicit destination address; receives accept a datagram
/// from anyone and report the sender. A receive blocks the calling task
/// until something arrives. There is no timeout and no retry.
#[derive(Debug, Clone)]
pub struct DatagramChannel {
    socket: Arc<UdpSocket>,
}

impl DatagramChannel {
    pub async fn bind(addr: SocketAddr) -> Result<DatagramChannel, TransportError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| TransportError::Bind { addr, source })?;
        Ok(DatagramChannel {
            socket: Arc::new(socket),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn send(&self, bytes: &[u8], dest: SocketAddr) -> Result<usize, TransportError> {
        self.socket
            .send_to(bytes, dest)
            .await
            .map_err(|source| TransportError::Send { dest, source })
    }

    /// Receive one datagram of at most `BUFFER_SIZE` bytes.
    ///
    /// Every call allocates its own zeroed buffer and returns only the
    /// received prefix. No buffer is ever reused across receives, so a
    /// short datagram cannot pick up stale bytes from an earlier one.
    pub async fn recv(&self) -> Result<(Vec<u8>, SocketAddr), TransportError> {
        let mut buf = vec![0u8; BUFFER_SIZE];
        let (len, from) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(TransportError::Recv)?;
        buf.truncate(len);
        Ok((buf, from))
    }
}
