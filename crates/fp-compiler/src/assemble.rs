//! Sequence assembly — pass 5.
//!
//! The folded step list is already ordered; assembly only appends the
//! optional tail wait.  When a tail hold period was requested the sequence
//! must not finish before the final plan time, even if the robot arrives
//! at its destination early — so a `WaitUntil` anchored at the last
//! descriptor's time closes the list.

use fp_actions::{ActionDescriptor, PendingAction};
use fp_core::Duration;

pub(crate) fn assemble_steps(
    mut steps: Vec<PendingAction>,
    descriptors: &[ActionDescriptor],
    tail_period: Option<Duration>,
) -> Vec<PendingAction> {
    if tail_period.is_some() {
        if let Some(last) = descriptors.last() {
            steps.push(PendingAction::WaitUntil(last.time));
        }
    }
    steps
}
