//! Async worker - runs in Tokio runtime and handles API operations

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::infrastructure::api::EventsApi;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// How often the stored token is re-checked for expiry
const SESSION_CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// Run the async worker loop
pub async fn run_async_worker(
    api: Arc<dyn EventsApi>,
    auto_login: bool,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let mut authenticated = api.is_authenticated();
    if authenticated {
        info!("already authenticated");
    } else if auto_login {
        authenticated = login(api.as_ref(), &evt_tx).await;
    }
    let _ = evt_tx.send(RuntimeEvent::Session { authenticated });

    let mut poll_interval = interval(Duration::from_millis(50));
    let mut last_session_check = Instant::now();

    loop {
        // Process commands (non-blocking)
        loop {
            let cmd = match cmd_rx.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            };
            match cmd {
                RuntimeCommand::Shutdown => return Ok(()),

                RuntimeCommand::Login => {
                    login(api.as_ref(), &evt_tx).await;
                }

                RuntimeCommand::Logout => {
                    if let Err(err) = api.logout() {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Logout failed: {err}"),
                        });
                    }
                }

                RuntimeCommand::FetchEvents { query } => {
                    let api = Arc::clone(&api);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let event = match api.list_events(&query).await {
                            Ok(page) => RuntimeEvent::EventsLoaded { query, page },
                            Err(error) => RuntimeEvent::EventsFailed { query, error },
                        };
                        let _ = evt_tx.send(event);
                    });
                }

                RuntimeCommand::CreateEvent { event } => {
                    let api = Arc::clone(&api);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let event = match api.create_event(&event).await {
                            Ok(event) => RuntimeEvent::EventCreated { event },
                            Err(error) => RuntimeEvent::CreateFailed { error },
                        };
                        let _ = evt_tx.send(event);
                    });
                }
            }
            // Commands can change the session (login, logout)
            report_session(api.as_ref(), &mut authenticated, &evt_tx);
        }

        if last_session_check.elapsed() >= SESSION_CHECK_INTERVAL {
            report_session(api.as_ref(), &mut authenticated, &evt_tx);
            last_session_check = Instant::now();
        }

        poll_interval.tick().await;
    }
}

async fn login(api: &dyn EventsApi, evt_tx: &Sender<RuntimeEvent>) -> bool {
    match api.authenticate().await {
        Ok(()) => true,
        Err(err) => {
            warn!("authentication failed: {err}");
            let _ = evt_tx.send(RuntimeEvent::AuthenticationFailed {
                message: err.to_string(),
            });
            false
        }
    }
}

/// Emit `Session` when the stored token's validity changed since last time
fn report_session(api: &dyn EventsApi, last: &mut bool, evt_tx: &Sender<RuntimeEvent>) {
    let now = api.is_authenticated();
    if now != *last {
        debug!(authenticated = now, "session changed");
        *last = now;
        let _ = evt_tx.send(RuntimeEvent::Session { authenticated: now });
    }
}
