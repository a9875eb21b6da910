//! Per-object periodic processes.
//!
//! A process is attached to an owner entity and evaluated once per tick with
//! the number of ticks it has run so far. Processes run in descending priority,
//! ties in attach order. An owner runs at most one process of each kind.
//!
//! Processes attached while commands are handled join the same tick's pass.
//! Processes attached during a pass join from the next tick on.
//!
//! A process may claim an evaluation as urgent (`preempts`); such evaluations
//! run in `run_urgent`, before the tick's commands, and are skipped by `run`.

use std::cmp::Reverse;
use std::fmt;

use hecs::Entity;
use tracing::debug;

use grenade_core::constants::HELPER_PRIORITY;
use grenade_core::enums::ProcessKind;

use crate::context::SimContext;

/// Result of one process evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Continue,
    /// Detach after this evaluation.
    Finished,
}

/// Why a process was stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The process reported `Finished`.
    Completed,
    /// Removed on request.
    Removed,
    /// The owner is gone or being removed.
    OwnerGone,
}

pub trait Process: fmt::Debug {
    fn kind(&self) -> ProcessKind;

    fn priority(&self) -> i32 {
        HELPER_PRIORITY
    }

    /// Called once when the process is attached.
    fn start(&mut self, _owner: Entity, _ctx: &mut SimContext<'_>) {}

    /// Called once per tick. `elapsed` counts evaluations, starting at 1.
    fn tick(&mut self, owner: Entity, elapsed: u32, ctx: &mut SimContext<'_>) -> ProcessStatus;

    /// Whether evaluation number `elapsed` runs ahead of the tick's commands.
    fn preempts(&self, _elapsed: u32) -> bool {
        false
    }

    /// Called exactly once when the process ends, for whatever reason.
    fn stop(&mut self, _owner: Entity, _reason: StopReason, _ctx: &mut SimContext<'_>) {}
}

pub(crate) enum ProcessRequest {
    Attach {
        owner: Entity,
        process: Box<dyn Process>,
    },
    Detach {
        owner: Entity,
        kind: ProcessKind,
    },
    DetachAll {
        owner: Entity,
    },
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    owner: Entity,
    kind: ProcessKind,
    priority: i32,
    elapsed: u32,
    live: bool,
    ran_early: bool,
    process: Box<dyn Process>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    incoming: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .chain(self.incoming.iter())
            .filter(|e| e.live)
    }

    /// Whether `owner` currently runs a process of `kind`.
    pub fn has(&self, owner: Entity, kind: ProcessKind) -> bool {
        self.live_entries()
            .any(|e| e.owner == owner && e.kind == kind)
    }

    /// Evaluations so far of `owner`'s process of `kind`.
    pub fn elapsed(&self, owner: Entity, kind: ProcessKind) -> Option<u32> {
        self.live_entries()
            .find(|e| e.owner == owner && e.kind == kind)
            .map(|e| e.elapsed)
    }

    pub fn len(&self) -> usize {
        self.live_entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every buffered attach/detach request, including requests issued
    /// by the `start`/`stop` hooks they trigger.
    pub fn apply(&mut self, ctx: &mut SimContext<'_>) {
        loop {
            let requests = ctx.take_requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                match request {
                    ProcessRequest::Attach { owner, mut process } => {
                        let kind = process.kind();
                        if !ctx.world.contains(owner) {
                            debug!(?kind, "attach to missing owner ignored");
                            continue;
                        }
                        if self.has(owner, kind) {
                            debug!(?kind, "process already attached");
                            continue;
                        }
                        process.start(owner, ctx);
                        let seq = self.next_seq;
                        self.next_seq += 1;
                        self.incoming.push(Entry {
                            seq,
                            owner,
                            kind,
                            priority: process.priority(),
                            elapsed: 0,
                            live: true,
                            ran_early: false,
                            process,
                        });
                    }
                    ProcessRequest::Detach { owner, kind } => {
                        self.stop_where(ctx, StopReason::Removed, |e| {
                            e.owner == owner && e.kind == kind
                        });
                    }
                    ProcessRequest::DetachAll { owner } => {
                        self.stop_where(ctx, StopReason::OwnerGone, |e| e.owner == owner);
                    }
                }
            }
        }
    }

    fn stop_where(
        &mut self,
        ctx: &mut SimContext<'_>,
        reason: StopReason,
        matches: impl Fn(&Entry) -> bool,
    ) {
        for entry in self.entries.iter_mut().chain(self.incoming.iter_mut()) {
            if entry.live && matches(entry) {
                entry.live = false;
                entry.process.stop(entry.owner, reason, ctx);
            }
        }
    }

    /// Evaluate, ahead of the tick's commands, every running process whose
    /// next evaluation is urgent. `run` skips them for the rest of the tick.
    pub fn run_urgent(&mut self, ctx: &mut SimContext<'_>) {
        for i in 0..self.entries.len() {
            let entry = &self.entries[i];
            if !entry.live || !entry.process.preempts(entry.elapsed + 1) {
                continue;
            }
            self.entries[i].ran_early = true;
            self.evaluate(i, ctx);
        }
    }

    /// One scheduler pass: evaluate every live process once.
    pub fn run(&mut self, ctx: &mut SimContext<'_>) {
        self.entries.extend(self.incoming.drain(..).filter(|e| e.live));
        self.entries
            .sort_by_key(|e| (Reverse(e.priority), e.seq));

        for i in 0..self.entries.len() {
            if std::mem::take(&mut self.entries[i].ran_early) || !self.entries[i].live {
                continue;
            }
            self.evaluate(i, ctx);
        }

        self.entries.retain(|e| e.live);
    }

    fn evaluate(&mut self, i: usize, ctx: &mut SimContext<'_>) {
        let entry = &mut self.entries[i];
        let owner = entry.owner;

        if !ctx.world.contains(owner) {
            entry.live = false;
            entry.process.stop(owner, StopReason::OwnerGone, ctx);
            self.apply(ctx);
            return;
        }

        entry.elapsed += 1;
        let status = entry.process.tick(owner, entry.elapsed, ctx);
        if status == ProcessStatus::Finished && entry.live {
            entry.live = false;
            entry.process.stop(owner, StopReason::Completed, ctx);
        }
        self.apply(ctx);
    }
}
