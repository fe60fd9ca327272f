//! Console connection and event loop.
//!
//! This module owns the transport, exposes the console's command vocabulary,
//! and implements the globals correlation protocol.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Inbound payloads from the transport (console output, globals dumps)
//! - Outbound commands from the API side
//! - Globals-dump routing to the internal signal
//! - Caller event callbacks (`on_connect`, `on_data`, `on_close`)
//!
//! # Correlation
//!
//! The wire protocol is an unframed broadcast stream with no request ids: a
//! reply to `globals` is recognized only by its `_G` prefix. Each
//! [`get_globals`](Connection::get_globals) call registers a once-waiter on
//! the internal globals signal; the next `_G`-prefixed payload resolves every
//! waiter registered at that point (and only those). There is no timeout and
//! no retry; with no matching reply the request stays pending forever.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::config::ConsoleConfig;
use crate::console::globals::{GlobalsRequest, GlobalsState};
use crate::error::Result;
use crate::protocol::{self, Command, GlobalsDecoder, Payload};
use crate::signal::{Signal, SubscriptionId};
use crate::transport::{TcpTransport, Transport, TransportStream};

// ============================================================================
// ConsoleCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConsoleCommand {
    /// Establish the socket.
    Connect,
    /// Transmit text verbatim.
    Send(String),
    /// Shut the connection down.
    Close,
}

// ============================================================================
// Shared State
// ============================================================================

/// State shared between the API side and the event loop.
struct Shared {
    /// Latest globals slot.
    globals: Mutex<GlobalsState>,
    /// Internal signal fed with `_G`-prefixed payloads.
    on_globals: Arc<Mutex<Signal<String>>>,
    /// Caller data handlers, fed with every normalized payload.
    on_data: Mutex<Signal<String>>,
    /// Caller connect handlers.
    on_connect: Mutex<Signal<()>>,
    /// Caller close handlers.
    on_close: Mutex<Signal<()>>,
    /// Set once the event loop has terminated or the transport closed.
    closed: AtomicBool,
    /// External Lua-table deserializer.
    decoder: Arc<dyn GlobalsDecoder>,
}

impl Shared {
    fn new(decoder: Arc<dyn GlobalsDecoder>) -> Self {
        Self {
            globals: Mutex::new(GlobalsState::Unset),
            on_globals: Arc::new(Mutex::new(Signal::new())),
            on_data: Mutex::new(Signal::new()),
            on_connect: Mutex::new(Signal::new()),
            on_close: Mutex::new(Signal::new()),
            closed: AtomicBool::new(false),
            decoder,
        }
    }

    /// Routes one inbound payload.
    ///
    /// Globals dumps reach the internal signal strictly before the caller's
    /// data handlers see the same payload.
    fn handle_payload(&self, payload: Payload) {
        let text = payload.into_text();
        if protocol::is_globals_dump(&text) {
            trace!(len = text.len(), "Globals dump received");
            self.on_globals.lock().emit(&text);
        }
        self.on_data.lock().emit(&text);
    }

    /// Marks the connection closed and notifies close handlers.
    ///
    /// Pending globals waiters are dropped first so their requests resolve
    /// with `ConnectionClosed`.
    fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let pending = {
            let mut signal = self.on_globals.lock();
            let pending = signal.len();
            signal.clear();
            pending
        };
        if pending > 0 {
            debug!(pending, "Failed pending globals requests on shutdown");
        }
        self.on_close.lock().emit(&());
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Client connection to a Lua-scriptable console server.
///
/// Owns exactly one transport, moved into an internal event-loop task at
/// construction. All operations are non-blocking; completion of connect,
/// send and receive is observed through registered callbacks or the
/// [`GlobalsRequest`] future.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and cheap to clone; clones share the same
/// transport and state.
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConsoleCommand>,
    /// State shared with the event loop.
    shared: Arc<Shared>,
}

impl Clone for Connection {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Connection {
    /// Creates a connection to `config` over TCP.
    ///
    /// The socket is not dialed until [`connect`](Self::connect) is called.
    ///
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) if the host is empty or the
    /// port is zero.
    pub fn new(config: ConsoleConfig, decoder: Arc<dyn GlobalsDecoder>) -> Result<Self> {
        let transport = TcpTransport::new(config)?;
        Ok(Self::with_transport(transport, decoder))
    }

    /// Creates a connection over an arbitrary transport.
    ///
    /// Spawns the event loop task internally.
    pub fn with_transport(transport: impl Transport, decoder: Arc<dyn GlobalsDecoder>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared::new(decoder));

        tokio::spawn(Self::run_event_loop(
            transport,
            command_rx,
            Arc::clone(&shared),
        ));

        Self { command_tx, shared }
    }

    /// Begins establishing the socket.
    ///
    /// Completion is observed via [`on_connect`](Self::on_connect); a connect
    /// failure is surfaced through [`on_close`](Self::on_close). A second
    /// connect on a live connection is rejected by the transport and logged.
    pub fn connect(&self) {
        let _ = self.command_tx.send(ConsoleCommand::Connect);
    }

    /// Registers a callback fired when the socket is established.
    pub fn on_connect(&self, mut f: impl FnMut() + Send + 'static) -> SubscriptionId {
        self.shared.on_connect.lock().subscribe(move |_: &()| f())
    }

    /// Registers a callback fired when the connection closes.
    pub fn on_close(&self, mut f: impl FnMut() + Send + 'static) -> SubscriptionId {
        self.shared.on_close.lock().subscribe(move |_: &()| f())
    }

    /// Registers a hook for incoming data. Binary payloads are normalized to
    /// text before delivery.
    ///
    /// Every registered hook sees every inbound payload, globals dumps
    /// included; for a dump, the internal correlation signal has already run
    /// by the time the hook is invoked.
    pub fn on_data(&self, mut f: impl FnMut(&str) + Send + 'static) -> SubscriptionId {
        self.shared
            .on_data
            .lock()
            .subscribe(move |text: &String| f(text))
    }

    /// Removes a previously registered data hook.
    pub fn remove_data_handler(&self, id: SubscriptionId) -> bool {
        self.shared.on_data.lock().unsubscribe(id)
    }

    /// Sends `text` verbatim.
    ///
    /// Silently dropped if the connection reports closed; no error is raised
    /// to the caller.
    pub fn send(&self, text: impl Into<String>) {
        let text = text.into();
        if self.is_closed() {
            trace!(len = text.len(), "Dropping send on closed connection");
            return;
        }
        let _ = self.command_tx.send(ConsoleCommand::Send(text));
    }

    /// Runs Lua source on the console server.
    pub fn run_lua(&self, code: impl Into<String>) {
        self.send(Command::Run(code.into()).encode());
    }

    /// Asks the server to print one global variable.
    pub fn print_variable(&self, variable: impl Into<String>) {
        self.send(Command::Print(variable.into()).encode());
    }

    /// Requests a dump of all globals.
    ///
    /// Sets the globals slot to [`GlobalsState::Pending`], registers a
    /// waiter for the next `_G`-prefixed payload, and sends `globals`. The
    /// returned future resolves with the decoded dump (or the decode error);
    /// dropping it cancels the wait and removes the waiter.
    ///
    /// Concurrent calls all resolve from the same next matching payload.
    pub fn get_globals(&self) -> GlobalsRequest {
        *self.shared.globals.lock() = GlobalsState::Pending;

        let (tx, rx) = oneshot::channel();

        let subscription = if self.is_closed() {
            // No reply can ever arrive; let the request resolve closed.
            debug!("Globals requested on closed connection");
            drop(tx);
            None
        } else {
            // Register the waiter before sending so a fast reply cannot
            // slip past the registration.
            let shared = Arc::clone(&self.shared);
            let mut tx = Some(tx);
            let id = self
                .shared
                .on_globals
                .lock()
                .subscribe_once(move |dump: &String| {
                    let result = shared.decoder.decode(dump);
                    match &result {
                        Ok(value) => {
                            debug!("Globals dump decoded");
                            *shared.globals.lock() = GlobalsState::Ready(value.clone());
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to decode globals dump");
                        }
                    }
                    if let Some(tx) = tx.take() {
                        let _ = tx.send(result);
                    }
                });
            Some(id)
        };

        self.send(Command::Globals.encode());

        GlobalsRequest::new(rx, Arc::clone(&self.shared.on_globals), subscription)
    }

    /// Returns the current globals slot.
    #[must_use]
    pub fn globals(&self) -> GlobalsState {
        self.shared.globals.lock().clone()
    }

    /// Returns `true` once the connection has closed (or never connected).
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Closes the connection.
    ///
    /// Close handlers fire once the transport has shut down.
    pub fn disconnect(&self) {
        let _ = self.command_tx.send(ConsoleCommand::Close);
    }

    /// Event loop that owns the transport.
    async fn run_event_loop(
        mut transport: impl Transport,
        mut command_rx: mpsc::UnboundedReceiver<ConsoleCommand>,
        shared: Arc<Shared>,
    ) {
        // Nothing to read until the socket exists.
        let mut stream = match Self::await_connect(&mut transport, &mut command_rx, &shared).await {
            Some(stream) => stream,
            None => return,
        };

        loop {
            tokio::select! {
                payload = stream.recv() => match payload {
                    Some(payload) => shared.handle_payload(payload),
                    None => {
                        debug!("Transport stream ended");
                        break;
                    }
                },

                command = command_rx.recv() => match command {
                    Some(ConsoleCommand::Send(text)) => {
                        if transport.is_closed() {
                            trace!(len = text.len(), "Dropping send on closed transport");
                        } else if let Err(e) = transport.send(&text).await {
                            warn!(error = %e, "Send failed");
                        }
                    }

                    Some(ConsoleCommand::Connect) => {
                        // One socket per transport; rejection is logged,
                        // not silently ignored.
                        if let Err(e) = transport.connect().await {
                            warn!(error = %e, "Connect rejected");
                        }
                    }

                    Some(ConsoleCommand::Close) | None => {
                        debug!("Close requested");
                        break;
                    }
                },
            }
        }

        transport.close().await;
        shared.shutdown();
        debug!("Event loop terminated");
    }

    /// First phase: waits for the connect command.
    ///
    /// Returns `None` if the connection closed (or failed to connect) before
    /// the socket existed; close handlers have fired in that case.
    async fn await_connect(
        transport: &mut impl Transport,
        command_rx: &mut mpsc::UnboundedReceiver<ConsoleCommand>,
        shared: &Arc<Shared>,
    ) -> Option<TransportStream> {
        loop {
            match command_rx.recv().await {
                Some(ConsoleCommand::Connect) => match transport.connect().await {
                    Ok(stream) => {
                        debug!("Transport connected");
                        shared.on_connect.lock().emit(&());
                        return Some(stream);
                    }
                    Err(e) => {
                        warn!(error = %e, "Connect failed");
                        shared.shutdown();
                        return None;
                    }
                },

                Some(ConsoleCommand::Send(text)) => {
                    trace!(len = text.len(), "Dropping send before connect");
                }

                Some(ConsoleCommand::Close) | None => {
                    transport.close().await;
                    shared.shutdown();
                    return None;
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
