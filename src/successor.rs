//! Legal-move enumeration: the edges of the implicit world-state graph.
//!
//! Every edge costs one primitive action. Drops consult the physics oracle:
//! the held object must be permitted on top of the column's top (or the
//! floor), or inside it when the top is a box.

use crate::physics;
use crate::types::{Action, Form, Relation, FLOOR};
use crate::world::WorldState;

/// Enumerate the legal actions from a state, paired with the resulting
/// states. Stacks are deep-copied per successor; the object map is shared.
pub fn successors(state: &WorldState) -> Vec<(Action, WorldState)> {
    let mut out = Vec::with_capacity(4);

    if state.arm > 0 {
        let mut next = state.clone();
        next.apply(Action::Left);
        out.push((Action::Left, next));
    }
    if state.arm + 1 < state.width() {
        let mut next = state.clone();
        next.apply(Action::Right);
        out.push((Action::Right, next));
    }
    if state.holding.is_none() && state.top(state.arm).is_some() {
        let mut next = state.clone();
        next.apply(Action::Pick);
        out.push((Action::Pick, next));
    }
    if let Some(held) = &state.holding {
        if drop_is_legal(state, held) {
            let mut next = state.clone();
            next.apply(Action::Drop);
            out.push((Action::Drop, next));
        }
    }

    out
}

/// A drop is legal when the held object may rest on the column top (or the
/// floor for an empty column), or go inside the top when the top is a box.
fn drop_is_legal(state: &WorldState, held: &str) -> bool {
    let held = held.to_string();
    match state.top(state.arm) {
        None => physics::permits(state, &held, &FLOOR.to_string(), Relation::OnTop),
        Some(top) => {
            let top = top.clone();
            physics::permits(state, &held, &top, Relation::OnTop)
                || (state.definition(&top).form == Form::Box
                    && physics::permits(state, &held, &top, Relation::Inside))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
