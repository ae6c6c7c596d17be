//! Itinerary commit — pass 6.
//!
//! Registers the finalized reservation in the shared schedule under the
//! working plan version.  The version acts as an optimistic-concurrency
//! token: a rejection means some other planning activity registered a newer
//! reservation meanwhile.  The committer logs the conflict with full
//! context, substitutes a freshly assigned version, and tries again, up to
//! the configured bound.  No lock is held across retries.
//!
//! The root cause of *repeated* rejections under freshly assigned versions
//! has never been pinned down — it may be a legitimate storm of concurrent
//! replans or a latent versioning fault upstream.  Only the defensive
//! bounded retry is preserved here; once the budget is exhausted the caller
//! must replan from scratch.

use fp_actions::{EventLog, PendingAction, RobotContext};
use fp_core::PlanId;
use fp_traffic::{Itinerary, ScheduleStore};

use crate::CompileError;

// ── Commit loop ───────────────────────────────────────────────────────────────

pub(crate) fn commit_itinerary<S: ScheduleStore>(
    ctx: &mut RobotContext<S>,
    recommended: PlanId,
    itinerary: &Itinerary,
    retry_limit: u32,
    log: &mut EventLog,
) -> Result<PlanId, CompileError> {
    let mut plan_id = recommended;
    let mut attempts = 0u32;

    while !ctx.schedule.commit(plan_id, itinerary.clone()) {
        let current = ctx.schedule.current_plan_id();
        tracing::error!(
            attempted = plan_id.0,
            current = current.0,
            robot = %ctx.name,
            group = %ctx.group,
            task = %ctx.task_id_or_none(),
            "schedule rejected plan version; retrying under a fresh one"
        );
        log.error(format!(
            "Invalid plan version [{}] when the current version is [{}] for [{}] in group \
             [{}] while performing task [{}].",
            plan_id.0,
            current.0,
            ctx.name,
            ctx.group,
            ctx.task_id_or_none()
        ));

        plan_id = ctx.schedule.assign_plan_id();
        attempts += 1;
        if attempts > retry_limit {
            tracing::error!(
                robot = %ctx.name,
                group = %ctx.group,
                task = %ctx.task_id_or_none(),
                "plan repeatedly rejected by the schedule; requesting a replan"
            );
            return Err(CompileError::CommitRejected { attempts });
        }
    }

    Ok(plan_id)
}

// ── Version rebinding ─────────────────────────────────────────────────────────

/// Point every lock action at the version the reservation actually
/// committed under.
///
/// Locks are minted during partitioning with the recommended version; when
/// the committer had to substitute a fresh one, the locks' resume step
/// would otherwise re-register the itinerary under a stale token.
pub(crate) fn rebind_plan_version(steps: &mut [PendingAction], plan_id: PlanId) {
    for step in steps {
        match step {
            PendingAction::LockMutexGroup(lock) => lock.plan_id = plan_id,
            PendingAction::Group(group) => rebind_plan_version(&mut group.steps, plan_id),
            _ => {}
        }
    }
}
