//! Group compaction — pass 4.
//!
//! Scans the descriptor list left-to-right and folds recognizable
//! sub-sequences into labeled composite groups so observers see "Pass
//! through [door:x]" instead of open/move/close noise.  Two matchers run at
//! each unconsumed position, door first, lift second; when neither matches
//! the head descriptor is emitted standalone.
//!
//! Matching is strictly best-effort: any ambiguity (a different door
//! closing, a second lift mid-session, a session that never ends) falls
//! back to ungrouped emission.  Lift ambiguities additionally log a
//! warning, since they usually mean the navigation graph is broken.

use fp_actions::{
    ActionDescriptor, ActionKind, CompositeGroup, EventLog, IdAssigner, PendingAction,
};
use fp_core::Duration;

use crate::CompileConfig;

// ── Entry point ───────────────────────────────────────────────────────────────

pub(crate) fn compact_descriptors(
    descriptors: &[ActionDescriptor],
    ids: &mut IdAssigner,
    config: &CompileConfig,
    log: &mut EventLog,
) -> Vec<PendingAction> {
    let mut steps: Vec<PendingAction> = Vec::new();
    let mut head = 0usize;

    while head < descriptors.len() {
        if let Some((group, consumed)) = fold_door_passage(&descriptors[head..], ids, config) {
            steps.push(PendingAction::Group(group));
            head += consumed;
        } else if let Some((group, consumed)) = fold_lift_ride(&descriptors[head..], ids, log) {
            steps.push(PendingAction::Group(group));
            head += consumed;
        } else {
            emit_ungrouped(&descriptors[head], &mut steps);
            head += 1;
        }
    }

    steps
}

// ── Door passage ──────────────────────────────────────────────────────────────

/// Fold `window[0] = door-open … door-close` (same door) into one group.
///
/// Only intervening moves are tolerated, and only while their cumulative
/// duration stays under the configured budget; anything else aborts the
/// match.  Returns the group plus how many descriptors it consumed.
fn fold_door_passage(
    window: &[ActionDescriptor],
    ids: &mut IdAssigner,
    config: &CompileConfig,
) -> Option<(CompositeGroup, usize)> {
    let door_name = match &window[0].action {
        Some(ActionKind::DoorOpen { door_name, .. }) => door_name,
        _ => return None,
    };

    let mut moving_duration = Duration::ZERO;
    for (offset, candidate) in window.iter().enumerate().skip(1) {
        match &candidate.action {
            Some(ActionKind::DoorClose {
                door_name: closing, ..
            }) => {
                if closing != door_name {
                    // A different door is being closed; folding would hide
                    // a real device interaction.
                    return None;
                }

                let label = format!("Pass through [door:{door_name}]");
                let group = bundle(&window[..=offset], label, ids);
                return Some((group, offset + 1));
            }
            Some(action @ ActionKind::Move { .. }) => {
                moving_duration += action.estimated_duration();
                if moving_duration >= config.door_fold_travel_budget {
                    // Too much driving between open and close for this to
                    // read as one pass-through.
                    return None;
                }
            }
            _ => return None,
        }
    }

    None
}

// ── Lift ride ─────────────────────────────────────────────────────────────────

/// Fold `window[0] = lift-request … lift-release` (same lift) into one
/// group labeled with the release's destination floor.
fn fold_lift_ride(
    window: &[ActionDescriptor],
    ids: &mut IdAssigner,
    log: &mut EventLog,
) -> Option<(CompositeGroup, usize)> {
    let lift_name = match &window[0].action {
        Some(ActionKind::RequestLift { lift_name, .. }) => lift_name,
        _ => return None,
    };

    for (offset, candidate) in window.iter().enumerate().skip(1) {
        match &candidate.action {
            Some(ActionKind::RequestLift {
                lift_name: other, ..
            }) if other != lift_name => {
                log.warn(format!(
                    "Plan involves using [lift:{other}] while the robot is already in a \
                     session with [lift:{lift_name}]. This may indicate a broken navigation \
                     graph. Please report this to the system integrator."
                ));
                return None;
            }
            Some(ActionKind::EndLiftSession {
                lift_name: other,
                floor_name,
            }) => {
                if other != lift_name {
                    log.warn(format!(
                        "Plan involves ending a session with [lift:{other}] while \
                         [lift:{lift_name}] is in use. This may indicate a broken \
                         navigation graph. Please report this to the system integrator."
                    ));
                    return None;
                }

                let label = format!("Take [lift:{lift_name}] to [floor:{floor_name}]");
                let group = bundle(&window[..=offset], label, ids);
                return Some((group, offset + 1));
            }
            // Anything else rides along inside the session.
            _ => {}
        }
    }

    log.warn(format!(
        "Plan neglects to end a session with [lift:{lift_name}]. This may indicate a \
         broken navigation graph. Please report this to the system integrator."
    ));
    None
}

// ── Shared emission helpers ───────────────────────────────────────────────────

/// Bundle a descriptor window into a composite, keeping each member's
/// dependency wait as an extra step right after it.
fn bundle(window: &[ActionDescriptor], label: String, ids: &mut IdAssigner) -> CompositeGroup {
    let mut steps = Vec::new();
    for descriptor in window {
        if let Some(action) = &descriptor.action {
            steps.push(PendingAction::Execute(action.clone()));
        }
        if !descriptor.dependencies.is_empty() {
            steps.push(PendingAction::WaitForTraffic {
                dependencies: descriptor.dependencies.clone(),
                time: descriptor.time,
            });
        }
    }
    CompositeGroup::new(label, ids.assign(), steps)
}

/// Emit one descriptor without folding: pending lock first, then the
/// action, then its dependency wait.
fn emit_ungrouped(descriptor: &ActionDescriptor, steps: &mut Vec<PendingAction>) {
    if let Some(lock) = &descriptor.mutex_lock {
        steps.push(PendingAction::LockMutexGroup(lock.clone()));
    }
    if let Some(action) = &descriptor.action {
        steps.push(PendingAction::Execute(action.clone()));
    }
    if !descriptor.dependencies.is_empty() {
        steps.push(PendingAction::WaitForTraffic {
            dependencies: descriptor.dependencies.clone(),
            time: descriptor.time,
        });
    }
}
