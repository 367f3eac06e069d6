//! Runs signup actions as background tasks, one in flight per kind.
//!
//! Triggering an action whose kind already has a task running aborts that
//! task; the newer call supersedes it. Each dispatch gets a generation number
//! and only reports carrying the latest generation of their kind are ever
//! handed out by [`ActionReports`], so a late answer to a superseded call can
//! never overwrite the newer one.

use crate::actions::{self, ActionKind, ActionOutcome, ActionRequest};
use crate::api::SignupApi;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub kind: ActionKind,
    pub generation: u64,
    pub outcome: ActionOutcome,
}

#[derive(Debug, Default)]
struct Generations([AtomicU64; 4]);

impl Generations {
    fn current(&self, kind: ActionKind) -> u64 {
        self.0[kind.index()].load(Ordering::SeqCst)
    }

    fn bump(&self, kind: ActionKind) -> u64 {
        self.0[kind.index()].fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub struct ActionDispatcher {
    api: Arc<dyn SignupApi>,
    tasks: HashMap<ActionKind, JoinHandle<()>>,
    generations: Arc<Generations>,
    report_tx: mpsc::UnboundedSender<ActionReport>,
}

impl ActionDispatcher {
    /// Creates a dispatcher and the receiving end for its reports.
    pub fn new(api: Arc<dyn SignupApi>) -> (Self, ActionReports) {
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let generations = Arc::new(Generations::default());
        let dispatcher = Self {
            api,
            tasks: HashMap::new(),
            generations: generations.clone(),
            report_tx,
        };
        let reports = ActionReports {
            report_rx,
            generations,
        };
        (dispatcher, reports)
    }

    /// Spawns `request`, superseding any in-flight task of the same kind.
    ///
    /// Must be called from within a tokio runtime. Returns the generation
    /// assigned to this dispatch.
    pub fn dispatch(&mut self, request: ActionRequest) -> u64 {
        let kind = request.kind();
        let generation = self.generations.bump(kind);
        self.abort_task(kind);

        let api = self.api.clone();
        let generations = self.generations.clone();
        let report_tx = self.report_tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = actions::run(api.as_ref(), &request).await;
            if generations.current(kind) != generation {
                trace!(?kind, generation, "Dropping outcome of superseded action");
                return;
            }
            // The receiver is gone once the page shuts down.
            let _ = report_tx.send(ActionReport {
                kind,
                generation,
                outcome,
            });
        });
        self.tasks.insert(kind, handle);
        debug!(?kind, generation, "Action dispatched");
        generation
    }

    /// Aborts the in-flight task of `kind`. Returns whether one was running.
    pub fn cancel(&mut self, kind: ActionKind) -> bool {
        self.generations.bump(kind);
        self.abort_task(kind)
    }

    pub fn cancel_all(&mut self) {
        for kind in ActionKind::ALL {
            self.cancel(kind);
        }
    }

    pub fn in_flight(&self, kind: ActionKind) -> bool {
        self.tasks
            .get(&kind)
            .is_some_and(|handle| !handle.is_finished())
    }

    fn abort_task(&mut self, kind: ActionKind) -> bool {
        match self.tasks.remove(&kind) {
            Some(handle) if !handle.is_finished() => {
                debug!(?kind, "Superseding in-flight action");
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for ActionDispatcher {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}

/// Receiving side of an [`ActionDispatcher`]. Filters out stale reports.
pub struct ActionReports {
    report_rx: mpsc::UnboundedReceiver<ActionReport>,
    generations: Arc<Generations>,
}

impl ActionReports {
    pub async fn recv(&mut self) -> Option<ActionReport> {
        loop {
            let report = self.report_rx.recv().await?;
            if self.is_current(&report) {
                return Some(report);
            }
        }
    }

    /// Non-blocking variant of [`ActionReports::recv`].
    pub fn try_recv(&mut self) -> Option<ActionReport> {
        while let Ok(report) = self.report_rx.try_recv() {
            if self.is_current(&report) {
                return Some(report);
            }
        }
        None
    }

    fn is_current(&self, report: &ActionReport) -> bool {
        let current = self.generations.current(report.kind) == report.generation;
        if !current {
            trace!(kind = ?report.kind, generation = report.generation, "Stale report skipped");
        }
        current
    }
}
