//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The worker thread owns the API client (and through it the token store);
//! the UI only ever sees the events below.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::domain::{Event, EventPage, EventQuery, NewEvent};
use crate::infrastructure::api::{ApiError, EventsApi};
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Authenticate with the configured client credentials
    Login,
    /// Clear the stored token
    Logout,
    /// Fetch one page of events
    FetchEvents { query: EventQuery },
    /// Create an event
    CreateEvent { event: NewEvent },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Current session state; sent at startup and whenever it flips
    Session { authenticated: bool },
    /// Login call failed; the app continues unauthenticated
    AuthenticationFailed { message: String },
    /// A page arrived for `query`
    EventsLoaded { query: EventQuery, page: EventPage },
    /// Listing for `query` failed
    EventsFailed { query: EventQuery, error: ApiError },
    /// Event created
    EventCreated { event: Event },
    /// Create failed
    CreateFailed { error: ApiError },
    /// Worker-level error
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime. With `auto_login`
    /// the worker authenticates at startup unless a valid token is stored.
    pub fn new(api: Arc<dyn EventsApi>, auto_login: bool) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("evcal-runtime".to_string())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) =
                        run_async_worker(api, auto_login, cmd_rx, evt_tx.clone()).await
                    {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
