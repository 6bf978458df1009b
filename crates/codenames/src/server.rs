//! `CodenamesServer` builder and server loop.
//!
//! This is the entry point for running a Codenames server. It ties
//! together all the layers: HTTP routes → session → room.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use codenames_protocol::{Codec, JsonCodec};
use codenames_room::{Lobby, RoomConfig, WordList, WordSource};
use codenames_session::SessionConfig;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::handler::{create_room, join_room, root};
use crate::CodenamesError;

/// Shared server state passed to each request handler.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. Interior
/// mutability via `Mutex` where needed.
pub(crate) struct ServerState<W: WordSource, C: Codec> {
    pub(crate) lobby: Arc<Mutex<Lobby>>,
    pub(crate) words: W,
    pub(crate) codec: Arc<C>,
    pub(crate) session_config: SessionConfig,
}

/// Builder for configuring and starting a Codenames server.
///
/// # Example
///
/// ```rust,no_run
/// use codenames::prelude::*;
///
/// # async fn start() -> Result<(), CodenamesError> {
/// let server = CodenamesServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(WordList::builtin())
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct CodenamesServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    session_config: SessionConfig,
}

impl CodenamesServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
            session_config: SessionConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every new room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Binds the listener. New boards draw from `words`.
    ///
    /// Uses `JsonCodec`, which is what browser clients speak.
    pub async fn build<W: WordSource>(
        self,
        words: W,
    ) -> Result<CodenamesServer<W, JsonCodec>, CodenamesError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            lobby: Arc::new(Mutex::new(Lobby::new(self.room_config))),
            words,
            codec: Arc::new(JsonCodec),
            session_config: self.session_config.validated(),
        });

        Ok(CodenamesServer { listener, state })
    }
}

impl Default for CodenamesServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Codenames server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct CodenamesServer<W: WordSource, C: Codec> {
    listener: TcpListener,
    state: Arc<ServerState<W, C>>,
}

impl CodenamesServer<WordList, JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> CodenamesServerBuilder {
        CodenamesServerBuilder::new()
    }
}

impl<W, C> CodenamesServer<W, C>
where
    W: WordSource,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns the room registry, shared with the running server.
    pub fn lobby(&self) -> Arc<Mutex<Lobby>> {
        Arc::clone(&self.state.lobby)
    }

    /// Serves HTTP and WebSocket traffic until the process is terminated.
    pub async fn run(self) -> Result<(), CodenamesError> {
        let addr = self.listener.local_addr()?;
        tracing::info!(%addr, "Codenames server listening");

        let app = router(self.state);
        axum::serve(self.listener, app).await.map_err(|e| {
            tracing::error!(error = %e, "server stopped");
            CodenamesError::Io(e)
        })
    }
}

/// The HTTP routes.
pub(crate) fn router<W, C>(state: Arc<ServerState<W, C>>) -> Router
where
    W: WordSource,
    C: Codec,
{
    Router::new()
        .route("/", get(root))
        .route("/room/create", get(create_room::<W, C>))
        .route("/room/join", get(join_room::<W, C>))
        .with_state(state)
}
