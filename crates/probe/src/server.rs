use axum::{Extension, Router};
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use std::net::SocketAddr;
use std::sync;
use tokio::net::{self, TcpStream};
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::ListenConfig;
use crate::connection::{ConnectionContext, ConnectionIdGenerator, ConnectionInfo};
use crate::errors::{JoinHandle, Result, ServerError};
use crate::routes;
use crate::Operator;

/// `ProbeServer` owns the bound listener and serves every accepted
/// connection over http1 on its own task.
pub struct ProbeServer {
    listener: net::TcpListener,
    router: Router,
    connection_ids: ConnectionIdGenerator,
}

// -- Constructors

impl ProbeServer {
    pub async fn bind(config: &ListenConfig) -> Result<Self> {
        let listener = net::TcpListener::bind(config.to_string())
            .await
            .map_err(ServerError::BindFailed)?;

        let server = Self::from_listener(listener);
        let local_addr = server.local_addr()?;
        mini_trace::info!("Created TCPListener for {} on {}", config, local_addr);
        Ok(server)
    }

    #[must_use]
    pub fn from_listener(listener: net::TcpListener) -> Self {
        Self {
            listener,
            router: routes::router(),
            connection_ids: ConnectionIdGenerator::new(),
        }
    }

    #[must_use]
    pub fn shared(self) -> sync::Arc<Self> {
        sync::Arc::new(self)
    }
}

// -- Getters

impl ProbeServer {
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

// -- Operator trait implementation

impl Operator for sync::Arc<ProbeServer> {
    fn run(&self, signal: broadcast::Receiver<()>) -> JoinHandle<()> {
        let handler = self.clone();
        tokio::spawn(async move { handler.serve(signal).await })
    }
}

// -- Implementation details

impl ProbeServer {
    /// Accepts connections until `sig` fires. Connections already being
    /// served keep running on their own tasks.
    pub async fn serve(&self, mut sig: broadcast::Receiver<()>) -> Result<()> {
        loop {
            tokio::select! {
                // switch select behaviour to check the signal first
                biased;

                _ = sig.recv() => {
                    mini_trace::info!("Stopped accepting connections");
                    return Ok(());
                }

                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((client, client_addr)) => self.serve_client(client, client_addr),
                        Err(err) => {
                            use std::io::ErrorKind::{ConnectionAborted, ConnectionReset, Interrupted};
                            // clients dropping out of the handshake are not listener failures
                            if matches!(err.kind(), ConnectionAborted | ConnectionReset | Interrupted) {
                                mini_trace::warn!("Dropped incoming connection: {:?}", err);
                                continue;
                            }

                            mini_trace::error!("Failed to get new client connection {:?}", err);
                            return Err(Box::new(ServerError::AcceptFailed(err)));
                        }
                    }
                }
            }
        }
    }

    fn serve_client(&self, client: TcpStream, client_addr: SocketAddr) {
        let connection_id = self.connection_ids.next_id();
        let local_addr = client.local_addr().ok();

        let context = ConnectionContext::new(ConnectionInfo::from_socket_addrs(
            Some(connection_id.clone()),
            Some(client_addr),
            local_addr,
        ));
        let service = TowerToHyperService::new(self.router.clone().layer(Extension(context)));

        let span = tracing::info_span!("connection", id = %connection_id, remote = %client_addr);
        tokio::spawn(
            async move {
                mini_trace::debug!("Accepted client connection");

                match http1::Builder::new()
                    .title_case_headers(true)
                    .serve_connection(TokioIo::new(client), service)
                    .await
                {
                    Ok(()) => mini_trace::debug!("Finished serving client connection"),
                    Err(err) => mini_trace::error!(
                        "Failed to serve http1 connection: {:?}",
                        ServerError::ServingFailed(err)
                    ),
                }
            }
            .instrument(span),
        );
    }
}
