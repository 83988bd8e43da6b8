use std::io::Write as _;
use std::net::SocketAddr;

use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::warn;

use crate::error::TransportError;
use crate::protocol::{self, Command, BUFFER_SIZE};
use crate::transport::DatagramChannel;

/// Interactive client: one command per entered line, with a
/// command-specific receive phase after the send.
///
/// The socket stays unconnected; the server address is fixed at startup
/// and every round trip is independent.
pub struct UdpClient {
    channel: DatagramChannel,
    server: SocketAddr,
}

impl UdpClient {
    /// Bind an ephemeral local port. The server learns our address from
    /// the datagrams we send.
    pub async fn open(server: SocketAddr) -> Result<UdpClient, TransportError> {
        let local = SocketAddr::from(([0, 0, 0, 0], 0));
        let channel = DatagramChannel::bind(local).await?;
        Ok(UdpClient { channel, server })
    }

    /// Drive the session from stdin until `exit` or end of input.
    ///
    /// Every entered line goes on the wire as typed (newline restored);
    /// classification only decides what to do afterwards. A line the
    /// server will not recognize still gets sent, and its status reply
    /// printed. The one exception is `put` with an unreadable local file,
    /// where nothing is sent at all: sending the command line without a
    /// payload would leave the server consuming the next command as the
    /// upload.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("Please enter msg: ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let command = Command::parse(format!("{line}\n").as_bytes());

            if let Command::Put(name) = &command {
                let Some(payload) = read_local_chunk(name).await else {
                    continue;
                };
                self.channel.send(&command.encode(), self.server).await?;
                self.channel.send(&payload, self.server).await?;
                println!("sent {} bytes", payload.len());
                continue;
            }

            self.channel.send(&command.encode(), self.server).await?;
            match &command {
                Command::Get(name) => self.finish_get(name).await?,
                Command::List => self.finish_list().await?,
                Command::Exit => {
                    let (reply, _) = self.channel.recv().await?;
                    print!("Echo from server: {}", String::from_utf8_lossy(&reply));
                    break;
                }
                // delete and anything unrecognized get one status line back
                _ => {
                    let (reply, _) = self.channel.recv().await?;
                    print!("{}", String::from_utf8_lossy(&reply));
                }
            }
        }
        Ok(())
    }

    /// Second phase of `get`: one datagram, either the file chunk or the
    /// server's failure status. The wire format cannot distinguish a file
    /// whose content equals the status line from an actual failure.
    async fn finish_get(&mut self, name: &str) -> Result<(), TransportError> {
        let (reply, _) = self.channel.recv().await?;
        if reply == protocol::GET_FAILED.as_bytes() {
            print!("{}", String::from_utf8_lossy(&reply));
            return Ok(());
        }
        match fs::write(name, &reply).await {
            Ok(()) => println!("received {} bytes into {name}", reply.len()),
            Err(err) => warn!(%name, %err, "cannot write received file"),
        }
        Ok(())
    }

    /// Receive listing lines until the end-of-list sentinel.
    async fn finish_list(&mut self) -> Result<(), TransportError> {
        loop {
            let (reply, _) = self.channel.recv().await?;
            if reply == protocol::END_OF_LIST.as_bytes() {
                return Ok(());
            }
            print!("{}", String::from_utf8_lossy(&reply));
        }
    }
}

/// Read at most one buffer of the local file for an upload.
async fn read_local_chunk(name: &str) -> Option<Vec<u8>> {
    let mut file = match fs::File::open(name).await {
        Ok(file) => file,
        Err(err) => {
            warn!(%name, %err, "cannot open local file, upload abandoned");
            return None;
        }
    };
    let mut payload = vec![0u8; BUFFER_SIZE];
    match file.read(&mut payload).await {
        Ok(read_bytes) => {
            payload.truncate(read_bytes);
            Some(payload)
        }
        Err(err) => {
            warn!(%name, %err, "cannot read local file, upload abandoned");
            None
        }
    }
}
