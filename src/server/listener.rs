use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket, lookup_host};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::{Config, Limits, ServerConfig};
use crate::http::connection::Connection;
use crate::http::resolver::StaticRoot;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = bind(&cfg.server).await?;
    info!("Listening on {}", listener.local_addr()?);

    let root = Arc::new(StaticRoot::new(cfg.static_files.root.clone(), &cfg.limits));
    info!(root = %root.path().display(), "Serving static files");

    serve(listener, root, cfg.limits).await
}

/// Binds the first address `listen_addr` resolves to that accepts a bind.
pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let addrs = lookup_host(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to resolve {}", cfg.listen_addr))?;

    let mut last_err = None;
    for addr in addrs {
        match bind_addr(addr, cfg.backlog) {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                warn!(%addr, error = %e, "Failed to bind");
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(e) => Err(e).with_context(|| format!("failed to bind {}", cfg.listen_addr)),
        None => anyhow::bail!("{} resolved to no addresses", cfg.listen_addr),
    }
}

fn bind_addr(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}

/// Accepts connections forever, one task per connection.
///
/// Finished tasks are reaped as they complete so the set never holds more
/// than the live connections. Dropping the returned future aborts every
/// connection still running.
pub async fn serve(
    listener: TcpListener,
    root: Arc<StaticRoot>,
    limits: Limits,
) -> anyhow::Result<()> {
    let mut workers = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };
                info!("Accepted connection from {}", peer);

                let root = Arc::clone(&root);
                workers.spawn(async move {
                    let mut conn = Connection::new(socket, peer.to_string(), root, limits);
                    if let Err(e) = conn.run().await {
                        error!("Connection error from {}: {}", peer, e);
                    }
                });
            }

            Some(finished) = workers.join_next() => {
                if let Err(e) = finished {
                    error!(error = %e, "Connection task failed");
                }
            }
        }
    }
}
