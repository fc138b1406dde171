use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use updates_core::SessionId;
use updates_logging::{updates_debug, updates_error};

use crate::fetch::{FeedSource, FetchSettings, ReqwestFeedSource};
use crate::{EngineEvent, FailureKind, FetchError};

enum EngineCommand {
    Fetch {
        session: SessionId,
        page: u32,
        limit: u32,
    },
    Cancel {
        session: SessionId,
    },
}

/// Runs page requests on a background tokio runtime and reports completions
/// through a channel the UI thread polls.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let source = ReqwestFeedSource::new(settings)?;
        Self::with_source(Arc::new(source))
    }

    pub fn with_source(source: Arc<dyn FeedSource>) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|err| {
            updates_error!("Failed to start engine runtime: {}", err);
            FetchError::new(FailureKind::Network, format!("engine runtime: {err}"))
        })?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let worker_event_tx = event_tx.clone();

        thread::spawn(move || {
            let event_tx = worker_event_tx;
            let mut sessions: HashMap<SessionId, CancellationToken> = HashMap::new();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Fetch {
                        session,
                        page,
                        limit,
                    } => {
                        // Session ids only grow; tokens of older sessions are no longer needed.
                        sessions.retain(|id, _| *id >= session);
                        let token = sessions
                            .entry(session)
                            .or_insert_with(CancellationToken::new)
                            .clone();
                        let source = source.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = tokio::select! {
                                _ = token.cancelled() => Err(FetchError::new(
                                    FailureKind::Cancelled,
                                    format!("session {session} closed"),
                                )),
                                result = source.fetch_page(page, limit) => result,
                            };
                            let _ = event_tx.send(EngineEvent::PageFetched {
                                session,
                                page,
                                result,
                            });
                        });
                    }
                    EngineCommand::Cancel { session } => {
                        if let Some(token) = sessions.remove(&session) {
                            updates_debug!("Cancelling requests of session {}", session);
                            token.cancel();
                        }
                    }
                }
            }
        });

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx,
        })
    }

    /// Queues a page request. If the worker is gone the request completes
    /// at once as a failure, so the caller is never left waiting.
    pub fn fetch_page(&self, session: SessionId, page: u32, limit: u32) {
        let command = EngineCommand::Fetch {
            session,
            page,
            limit,
        };
        if self.cmd_tx.send(command).is_err() {
            updates_error!(
                "Engine worker stopped; failing page {} of session {}",
                page,
                session
            );
            let _ = self.event_tx.send(EngineEvent::PageFetched {
                session,
                page,
                result: Err(FetchError::new(
                    FailureKind::Network,
                    "feed engine is not running",
                )),
            });
        }
    }

    pub fn cancel(&self, session: SessionId) {
        if self.cmd_tx.send(EngineCommand::Cancel { session }).is_err() {
            updates_debug!(
                "Engine worker stopped; nothing to cancel for session {}",
                session
            );
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
