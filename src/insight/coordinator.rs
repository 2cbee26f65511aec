//! Insight fetch coordinator - debounced, epoch-guarded explanation fetches.
//!
//! ## Per-epoch lifecycle
//!
//! ```text
//!   stage change ──► new epoch, state reset
//!        │
//!        ▼
//!   Debouncing ──(stage changes again)──► abandoned, request never issued
//!        │ timer fires, epoch still current
//!        ▼
//!    Fetching ──(stage changes again)──► abandoned, result dropped on arrival
//!        │
//!        ├──► Settled  (service text)
//!        └──► Fallback (any service failure)
//! ```
//!
//! Timers and requests run on spawned tasks and report back over a channel.
//! The owner drains the channel with [`InsightCoordinator::next_event`] and
//! commits with [`InsightCoordinator::apply`], so all state mutation stays
//! on the owner's task.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use super::service::ExplanationService;
use crate::config::InsightConfig;
use crate::navigation::StageObserver;
use crate::stage::{Stage, StageId};

/// Identifier of one stage activation.
pub type Epoch = u64;

/// Visible insight panel state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightState {
    /// Explanation or fallback text, once settled.
    pub text: Option<String>,
    /// A request for the current epoch is in flight.
    pub loading: bool,
}

/// Where the current epoch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsightPhase {
    /// No stage has been activated yet.
    #[default]
    Idle,
    /// Waiting out the debounce window.
    Debouncing,
    /// Request issued, awaiting the service.
    Fetching,
    /// Service text committed.
    Settled,
    /// Fallback text committed.
    Fallback,
}

impl InsightPhase {
    /// Terminal for the current epoch.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InsightPhase::Settled | InsightPhase::Fallback)
    }
}

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightOutcome {
    /// The service returned text.
    Explained(String),
    /// The service failed; show the fallback copy.
    Unavailable,
}

/// Message from a fetch task back to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightEvent {
    /// The debounce timer fired and a request was issued.
    Fetching { epoch: Epoch },
    /// The request finished.
    Settled { epoch: Epoch, outcome: InsightOutcome },
}

impl InsightEvent {
    /// Epoch that produced this event.
    pub fn epoch(&self) -> Epoch {
        match self {
            InsightEvent::Fetching { epoch } | InsightEvent::Settled { epoch, .. } => *epoch,
        }
    }
}

/// Debounces stage changes into explanation requests and commits only the
/// newest result.
pub struct InsightCoordinator<S> {
    service: Arc<S>,
    debounce: Duration,
    fallback_text: String,
    epoch: Arc<AtomicU64>,
    stage: Option<StageId>,
    state: InsightState,
    phase: InsightPhase,
    tx: mpsc::UnboundedSender<InsightEvent>,
    rx: mpsc::UnboundedReceiver<InsightEvent>,
}

impl<S: ExplanationService> InsightCoordinator<S> {
    /// Create a coordinator. No request is made until a stage is activated.
    pub fn new(service: Arc<S>, config: &InsightConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            debounce: config.debounce(),
            fallback_text: config.fallback_text.clone(),
            epoch: Arc::new(AtomicU64::new(0)),
            stage: None,
            state: InsightState::default(),
            phase: InsightPhase::Idle,
            tx,
            rx,
        }
    }

    /// Current visible state.
    pub fn state(&self) -> &InsightState {
        &self.state
    }

    /// Lifecycle phase of the current epoch.
    pub fn phase(&self) -> InsightPhase {
        self.phase
    }

    /// Current epoch.
    pub fn epoch(&self) -> Epoch {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Stage the current epoch belongs to.
    pub fn stage(&self) -> Option<StageId> {
        self.stage
    }

    /// Start a new epoch for `stage`: reset state and arm the debounce timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(&mut self, stage: &Stage) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.stage = Some(stage.id);
        self.state = InsightState::default();
        self.phase = InsightPhase::Debouncing;

        let concept = stage.concept().to_string();
        tracing::debug!(epoch, stage = %stage.id, concept = %concept, "debounce armed");

        let service = Arc::clone(&self.service);
        let current = Arc::clone(&self.epoch);
        let tx = self.tx.clone();
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if current.load(Ordering::SeqCst) != epoch {
                tracing::debug!(epoch, "superseded before request was issued");
                return;
            }

            tracing::info!(epoch, concept = %concept, "requesting explanation");
            if tx.send(InsightEvent::Fetching { epoch }).is_err() {
                return;
            }

            let outcome = match service.explain(&concept).await {
                Ok(text) if !text.trim().is_empty() => InsightOutcome::Explained(text),
                Ok(_) => {
                    tracing::warn!(epoch, "explanation service returned empty text");
                    InsightOutcome::Unavailable
                }
                Err(e) => {
                    tracing::warn!(epoch, error = %e, "explanation service failed");
                    InsightOutcome::Unavailable
                }
            };
            let _ = tx.send(InsightEvent::Settled { epoch, outcome });
        });
    }

    /// Commit an event if it belongs to the current epoch.
    ///
    /// Returns true when visible state changed.
    pub fn apply(&mut self, event: InsightEvent) -> bool {
        let current = self.epoch();
        if event.epoch() != current {
            tracing::debug!(
                stale = event.epoch(),
                current,
                "dropping event from superseded epoch"
            );
            return false;
        }

        match event {
            InsightEvent::Fetching { .. } => {
                self.phase = InsightPhase::Fetching;
                self.state = InsightState {
                    text: None,
                    loading: true,
                };
            }
            InsightEvent::Settled { outcome, .. } => {
                let (phase, text) = match outcome {
                    InsightOutcome::Explained(text) => (InsightPhase::Settled, text),
                    InsightOutcome::Unavailable => {
                        (InsightPhase::Fallback, self.fallback_text.clone())
                    }
                };
                self.phase = phase;
                self.state = InsightState {
                    text: Some(text),
                    loading: false,
                };
            }
        }
        true
    }

    /// Wait for the next event from any fetch task, current or stale.
    pub async fn next_event(&mut self) -> Option<InsightEvent> {
        self.rx.recv().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_next_event(&mut self) -> Option<InsightEvent> {
        self.rx.try_recv().ok()
    }

    /// Drive events until the current epoch reaches a terminal phase.
    ///
    /// Returns immediately if nothing was ever activated.
    pub async fn settle(&mut self) -> &InsightState {
        while !self.phase.is_terminal() && self.phase != InsightPhase::Idle {
            match self.rx.recv().await {
                Some(event) => {
                    self.apply(event);
                }
                None => break,
            }
        }
        &self.state
    }
}

impl<S: ExplanationService> StageObserver for InsightCoordinator<S> {
    fn on_stage_changed(&mut self, stage: &Stage) {
        self.activate(stage);
    }
}
