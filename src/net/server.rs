//! Server lifecycle and accept loop.
//!
//! A [`Server`] owns the registered handler, its configuration and, while
//! listening, the accept loop task. The accept loop only accepts and
//! dispatches: every connection is served by its own task (see
//! [`Connection`]), so a slow handler never blocks new connections.
//!
//! Stopping closes a shutdown channel shared by the accept loop and every
//! connection task. The accept loop exits and drops the listener; each
//! connection task holds a clone of a drain sender, so the drain receiver
//! reports "closed" once the last one finishes.

use std::fmt;
use std::net::SocketAddr;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use async_std::channel::{self, Receiver, Sender};
use async_std::net::TcpListener;
use async_std::task::{self, JoinHandle};
use futures::future::{Either, select};
use tracing::Instrument;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handler::{Handler, Invoker};
use crate::net::connection::Connection;

/// Pause after a failed `accept`, e.g. when out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Constructed; the handler may still be replaced.
    Created,
    Listening,
    /// Terminal.
    Stopped,
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServerState::Created => "created",
            ServerState::Listening => "listening",
            ServerState::Stopped => "stopped",
        })
    }
}

struct Listening {
    local_addr: SocketAddr,
    shutdown: Sender<()>,
    drained: Receiver<()>,
    accept_loop: JoinHandle<()>,
}

pub struct Server {
    handler: Arc<dyn Handler>,
    config: Arc<ServerConfig>,
    state: ServerState,
    listening: Option<Listening>,
}

impl Server {
    pub fn new(handler: impl Handler) -> Self {
        Self::with_config(handler, ServerConfig::default())
    }

    pub fn with_config(handler: impl Handler, config: ServerConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            config: Arc::new(config),
            state: ServerState::Created,
            listening: None,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Address of the listening socket, while listening.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listening.as_ref().map(|listening| listening.local_addr)
    }

    /// Replaces the handler. Only allowed before the server starts.
    pub fn set_handler(&mut self, handler: impl Handler) -> Result<(), ServerError> {
        self.expect_state(ServerState::Created, "replace the handler of")?;
        self.handler = Arc::new(handler);
        Ok(())
    }

    /// Binds `port` on the configured address and starts accepting.
    ///
    /// On [`ServerError::BindFailure`] the server stays `Created` and
    /// `start` may be retried with another port.
    pub async fn start(&mut self, port: u16) -> Result<(), ServerError> {
        self.expect_state(ServerState::Created, "start")?;
        if port == 0 {
            return Err(ServerError::InvalidPort(port));
        }

        let addr = SocketAddr::new(self.config.address, port);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::BindFailure { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::BindFailure { addr, source })?;

        let (shutdown_tx, shutdown_rx) = channel::bounded(1);
        let (drain_tx, drain_rx) = channel::bounded(1);
        let accept_loop = task::spawn(accept_loop(
            listener,
            Invoker::new(Arc::clone(&self.handler)),
            Arc::clone(&self.config),
            shutdown_rx,
            drain_tx,
        ));

        tracing::info!(address = %local_addr, "server listening");
        self.listening = Some(Listening {
            local_addr,
            shutdown: shutdown_tx,
            drained: drain_rx,
            accept_loop,
        });
        self.state = ServerState::Listening;
        Ok(())
    }

    /// Stops accepting and releases the listening socket before returning.
    ///
    /// Connections that already read their request are given up to
    /// `shutdown_timeout` to finish; idle ones are abandoned. Calling `stop`
    /// again, or on a server that never started, only marks it `Stopped`.
    pub async fn stop(&mut self) {
        if self.state == ServerState::Stopped {
            return;
        }
        self.state = ServerState::Stopped;

        let Some(listening) = self.listening.take() else {
            tracing::debug!("server stopped before it was started");
            return;
        };

        listening.shutdown.close();
        listening.accept_loop.await;

        let timeout = self.config.shutdown_timeout;
        match async_std::future::timeout(timeout, listening.drained.recv()).await {
            Ok(_) => tracing::info!(address = %listening.local_addr, "server stopped"),
            Err(_) => tracing::warn!(
                address = %listening.local_addr,
                timeout = ?timeout,
                "server stopped with connections still in flight"
            ),
        }
    }

    fn expect_state(&self, expected: ServerState, operation: &'static str) -> Result<(), ServerError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ServerError::InvalidStateTransition {
                operation,
                state: self.state,
            })
        }
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("state", &self.state)
            .field("local_addr", &self.local_addr())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Drop for Server {
    /// Dropping a listening server signals shutdown without waiting for it;
    /// use [`Server::stop`] to know when the socket is released.
    fn drop(&mut self) {
        if let Some(listening) = &self.listening {
            listening.shutdown.close();
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    invoker: Invoker,
    config: Arc<ServerConfig>,
    shutdown: Receiver<()>,
    drain: Sender<()>,
) {
    loop {
        let accepted = {
            let accept = pin!(listener.accept());
            let stop = pin!(shutdown.recv());
            match select(accept, stop).await {
                Either::Left((accepted, _)) => accepted,
                Either::Right(_) => break,
            }
        };

        let (stream, peer) = match accepted {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(error = %err, "failed to accept connection");
                task::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        tracing::debug!(peer = %peer, "accepted connection");
        let connection = Connection::new(stream, peer, Arc::clone(&config));
        let invoker = invoker.clone();
        let shutdown = shutdown.clone();
        let guard = drain.clone();

        task::spawn(
            async move {
                connection.serve(invoker, shutdown).await;
                drop(guard);
            }
            .instrument(tracing::debug_span!("connection", peer = %peer)),
        );
    }

    tracing::debug!("accept loop stopped");
}
