use std::net::{SocketAddr, ToSocketAddrs};

use anyhow::Context;
use clap::{Arg, Command};
use tracing::info;

use udpfs::client::UdpClient;
use udpfs::logging;
use udpfs::server::UdpServer;
use udpfs::shutdown::ShutdownManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let matches = Command::new("udpfs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Minimal remote file access over UDP datagrams")
        .subcommand_required(true)
        .subcommand(
            Command::new("serve")
                .about("Serve the current directory on a UDP port")
                .arg(
                    Arg::new("port")
                        .required(true)
                        .value_parser(clap::value_parser!(u16)),
                ),
        )
        .subcommand(
            Command::new("client")
                .about("Talk to a server interactively")
                .arg(Arg::new("host").required(true))
                .arg(
                    Arg::new("port")
                        .required(true)
                        .value_parser(clap::value_parser!(u16)),
                ),
        )
        .get_matches();

    if let Some(sub) = matches.subcommand_matches("serve") {
        let port = *sub.get_one::<u16>("port").context("port argument required")?;
        return serve(port).await;
    } else if let Some(sub) = matches.subcommand_matches("client") {
        let host = sub.get_one::<String>("host").context("host argument required")?;
        let port = *sub.get_one::<u16>("port").context("port argument required")?;
        return run_client(host, port).await;
    }
    Ok(())
}

async fn serve(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let mut shutdown = ShutdownManager::new();
    let mut server = UdpServer::bind(addr, ".", shutdown.clone()).await?;
    info!(addr = %server.local_addr()?, "bound server socket");

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.send();
        }
    });

    server.listen().await?;
    Ok(())
}

async fn run_client(host: &str, port: u16) -> anyhow::Result<()> {
    let server = resolve(host, port)?;
    info!(%server, "targeting server");
    let mut client = UdpClient::open(server).await?;
    client.run().await
}

/// Resolve the server endpoint once at startup, preferring IPv4 since the
/// server binds an IPv4 wildcard address.
fn resolve(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .with_context(|| format!("cannot resolve {host}:{port}"))?;
    addrs
        .find(|addr| addr.is_ipv4())
        .with_context(|| format!("no IPv4 address for {host}:{port}"))
}
