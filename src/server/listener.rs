use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerBlock;
use crate::http::connection::Connection;

/// Binds every distinct configured port and serves connections until the
/// process is shut down.
pub async fn run(servers: Arc<Vec<ServerBlock>>) -> anyhow::Result<()> {
    let mut ports: Vec<u16> = servers.iter().flat_map(|s| s.ports.iter().copied()).collect();
    ports.sort_unstable();
    ports.dedup();

    let mut accept_loops = Vec::new();
    for port in ports {
        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        info!("Listening on 0.0.0.0:{}", port);

        let servers = servers.clone();
        accept_loops.push(tokio::spawn(accept_loop(listener, port, servers)));
    }

    for accept in accept_loops {
        accept.await??;
    }
    Ok(())
}

async fn accept_loop(
    listener: TcpListener,
    port: u16,
    servers: Arc<Vec<ServerBlock>>,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let servers = servers.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, servers, port);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
