//! The assembled action sequence and its cooperative execution state.
//!
//! # Execution model
//!
//! The compiler produces an immutable [`ActionSequence`].  The execution
//! engine calls [`ActionSequence::begin`] once, receiving a
//! [`RunningSequence`]: a flattened list of steps, each a
//! Standby→Started→Finished state machine.  Transitions are driven by the
//! engine's external ticks — the sequence itself never blocks or spawns.
//!
//! Ordering guarantee: steps run strictly in assembled order, and a
//! composite group's members run strictly in bundled order (flattening
//! preserves both).  The progress callback fires on every transition; the
//! completion callback fires exactly once, when the final step finishes.

use fp_core::EventStateId;

use crate::pending::PendingAction;

// ── StepStatus ────────────────────────────────────────────────────────────────

/// Lifecycle of one sequenced step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Standby,
    Started,
    Finished,
}

// ── SequencedStep ─────────────────────────────────────────────────────────────

/// One flattened step of a running sequence: the pending action plus the
/// composite group it came from, if any.
#[derive(Clone, Debug)]
pub struct SequencedStep {
    pub action: PendingAction,

    /// `Some` when this step was bundled inside a composite group;
    /// observers use the id to attribute progress to the group's label.
    pub group: Option<EventStateId>,
}

// ── ActionSequence ────────────────────────────────────────────────────────────

/// The ordered, immutable output of sequence assembly.
#[derive(Clone, Debug, Default)]
pub struct ActionSequence {
    steps: Vec<PendingAction>,
}

impl ActionSequence {
    pub fn new(steps: Vec<PendingAction>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of top-level steps (composite groups count as one).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Read-only view of the top-level steps.
    pub fn steps(&self) -> &[PendingAction] {
        &self.steps
    }

    /// Hand the sequence to the execution engine.
    ///
    /// `on_progress` fires after every step transition; `on_finished` fires
    /// once, when the last step completes.  This is the sequence's single
    /// entry point.
    pub fn begin(
        self,
        on_progress: impl FnMut(&SequencedStep, StepStatus) + 'static,
        on_finished: impl FnOnce() + 'static,
    ) -> RunningSequence {
        let mut flat = Vec::new();
        for step in self.steps {
            flatten_into(step, None, &mut flat);
        }
        RunningSequence {
            status: vec![StepStatus::Standby; flat.len()],
            steps: flat,
            cursor: 0,
            on_progress: Box::new(on_progress),
            on_finished: Some(Box::new(on_finished)),
        }
    }
}

/// Expand composite groups depth-first so members keep their bundled order.
fn flatten_into(step: PendingAction, group: Option<EventStateId>, out: &mut Vec<SequencedStep>) {
    match step {
        PendingAction::Group(g) => {
            let id = g.state_id;
            for member in g.steps {
                flatten_into(member, Some(id), out);
            }
        }
        action => out.push(SequencedStep { action, group }),
    }
}

// ── RunningSequence ───────────────────────────────────────────────────────────

/// A sequence in execution.  The engine drives it with
/// [`notify_started`](Self::notify_started) and
/// [`notify_finished`](Self::notify_finished); the sequence only tracks
/// state and order.
pub struct RunningSequence {
    steps: Vec<SequencedStep>,
    status: Vec<StepStatus>,
    cursor: usize,
    on_progress: Box<dyn FnMut(&SequencedStep, StepStatus)>,
    on_finished: Option<Box<dyn FnOnce()>>,
}

impl RunningSequence {
    /// The step the engine should be executing now, or `None` when the
    /// sequence has run to completion.
    pub fn current(&self) -> Option<&SequencedStep> {
        self.steps.get(self.cursor)
    }

    pub fn current_status(&self) -> Option<StepStatus> {
        self.status.get(self.cursor).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Total flattened step count.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Mark the current step Started.  No-op if it already started or the
    /// sequence is finished.
    pub fn notify_started(&mut self) {
        if self.is_finished() || self.status[self.cursor] != StepStatus::Standby {
            return;
        }
        self.status[self.cursor] = StepStatus::Started;
        (self.on_progress)(&self.steps[self.cursor], StepStatus::Started);
    }

    /// Mark the current step Finished and advance to the next.
    ///
    /// A step finished straight from Standby counts as started first — some
    /// actions (an already-held mutex lock, an empty traffic wait) complete
    /// within the engine's dispatch tick.
    pub fn notify_finished(&mut self) {
        if self.is_finished() {
            return;
        }
        if self.status[self.cursor] == StepStatus::Standby {
            self.notify_started();
        }
        self.status[self.cursor] = StepStatus::Finished;
        (self.on_progress)(&self.steps[self.cursor], StepStatus::Finished);
        self.cursor += 1;
        if self.is_finished() {
            if let Some(finished) = self.on_finished.take() {
                finished();
            }
        }
    }
}
