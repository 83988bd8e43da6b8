use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::error::TransportError;
use crate::executor::Executor;
use crate::protocol::{self, Command, Reply};
use crate::shutdown::ShutdownManager;
use crate::transport::DatagramChannel;

/// Whether the session loop keeps running after a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Datagram server: one socket, commands served strictly one at a time.
///
/// A datagram is processed completely, including the nested payload
/// receive a `put` requires, before the next one is accepted; concurrent
/// clients simply queue in the OS socket buffer. The only shared state is
/// the filesystem itself.
pub struct UdpServer {
    channel: DatagramChannel,
    executor: Executor,
    shutdown: ShutdownManager,
}

impl UdpServer {
    pub async fn bind(
        addr: SocketAddr,
        root: impl Into<PathBuf>,
        shutdown: ShutdownManager,
    ) -> Result<UdpServer, TransportError> {
        let channel = DatagramChannel::bind(addr).await?;
        Ok(UdpServer {
            channel,
            executor: Executor::new(root),
            shutdown,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.channel.local_addr()
    }

    /// Serve until an `exit` command arrives or the shutdown signal fires.
    ///
    /// Receive failures are fatal (the socket is gone); a failed reply
    /// send only loses that one response and the loop keeps serving.
    pub async fn listen(&mut self) -> Result<(), TransportError> {
        info!("server is now listening");
        loop {
            let (datagram, peer) = tokio::select! {
                received = self.channel.recv() => received?,
                _ = self.shutdown.recv() => {
                    info!("terminating server");
                    return Ok(());
                }
            };
            if self.handle(&datagram, peer).await == LoopControl::Stop {
                self.shutdown.send();
                return Ok(());
            }
        }
    }

    /// Dispatch one datagram: classify, execute, send the replies.
    /// Total over all inputs; even an unrecognized line gets an answer.
    async fn handle(&mut self, datagram: &[u8], peer: SocketAddr) -> LoopControl {
        let command = Command::parse(datagram);
        info!(%peer, ?command, "received datagram");

        let mut control = LoopControl::Continue;
        let replies = match &command {
            Command::Get(name) => vec![self.executor.get(name).await],
            Command::Put(name) => {
                // the payload travels in the datagram after the command line
                match self.channel.recv().await {
                    Ok((payload, _)) => self.executor.put(name, &payload).await,
                    Err(err) => error!(%err, "put: receiving payload failed"),
                }
                Vec::new()
            }
            Command::Delete(name) => vec![self.executor.delete(name).await],
            Command::List => self.executor.list().await,
            Command::Exit => {
                info!(%peer, "exit received, stopping command loop");
                control = LoopControl::Stop;
                vec![Reply::Echo(datagram.to_vec())]
            }
            Command::Unrecognized(line) => {
                warn!(%peer, line = line.trim_end(), "command not understood");
                vec![Reply::Status(protocol::NOT_UNDERSTOOD.to_string())]
            }
        };

        for reply in &replies {
            if let Err(err) = self.channel.send(&reply.to_bytes(), peer).await {
                error!(%err, "sending reply failed");
                break;
            }
        }
        control
    }
}
