//! `fp-actions` — the executable vocabulary produced by the fleetplan
//! compiler and consumed by the execution engine.
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`descriptor`] | `ActionKind`, `ActionDescriptor`, `MutexGroupLock` —   |
//! |                | the unit the compiler passes operate on                |
//! | [`pending`]    | `PendingAction` builder values, `CompositeGroup`,      |
//! |                | `IdAssigner`                                           |
//! | [`sequence`]   | `ActionSequence` / `RunningSequence` — the cooperative |
//! |                | Standby→Started→Finished state machine                 |
//! | [`event_log`]  | User-visible warning/error entries for a compiled plan |
//! | [`context`]    | `RobotContext` — identity, clock sample, schedule      |
//!
//! # Ownership
//!
//! Everything here is plain owned data.  The compiling call owns all
//! descriptors and itinerary snapshots for its lifetime; the execution
//! engine receives the finished, immutable sequence.  There is no shared
//! ownership and no deferred-construction closure anywhere in the
//! vocabulary — a [`PendingAction`] is a value describing how to construct
//! the runtime action, consumed by the engine's own scheduling step.

pub mod context;
pub mod descriptor;
pub mod event_log;
pub mod pending;
pub mod sequence;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use context::RobotContext;
pub use descriptor::{ActionDescriptor, ActionKind, LiftLocated, MutexGroupLock};
pub use event_log::{EventLog, LogEntry, Severity};
pub use pending::{CompositeGroup, IdAssigner, PendingAction};
pub use sequence::{ActionSequence, RunningSequence, SequencedStep, StepStatus};
