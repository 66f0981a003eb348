//! Plan narration: annotate pickups with what is being moved.
//!
//! Every pickup is preceded by "Moving the <description>", where the
//! description is the minimal attribute combination unique among all labels
//! of the starting state — narration happens before the action, so the
//! held label counts too. An empty plan becomes "That is already true!".

use crate::describe;
use crate::types::{Action, PlanItem};
use crate::world::WorldState;

/// The canonical empty-plan narration.
pub const ALREADY_TRUE: &str = "That is already true!";

/// Interleave narration lines into an action sequence.
pub fn narrate(actions: &[Action], start: &WorldState) -> Vec<PlanItem> {
    if actions.is_empty() {
        return vec![PlanItem::Say(ALREADY_TRUE.to_string())];
    }

    let pool = start.labels();
    let mut replay = start.clone();
    let mut plan = Vec::with_capacity(actions.len() + 2);

    for &action in actions {
        if action == Action::Pick {
            if let Some(label) = replay.top(replay.arm).cloned() {
                let desc = describe::minimal_description(start, &label, &pool);
                plan.push(PlanItem::Say(format!("Moving the {}", desc)));
            }
        }
        replay.apply(action);
        plan.push(PlanItem::Act(action));
    }

    plan
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
