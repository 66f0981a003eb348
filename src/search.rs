//! A* search over the implicit world-state graph.
//!
//! The frontier is keyed by g + h with insertion order breaking ties, so runs
//! are reproducible. The closed set and best-g map key on structural state
//! equality (stacks + arm + holding). The heuristic is admissible, so the
//! first goal popped is optimal.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use crate::heuristic;
use crate::successor;
use crate::types::{Action, DnfGoal, EngineError, Result};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Frontier entries
// ---------------------------------------------------------------------------

/// Min-heap entry: smallest f first, then earliest insertion.
#[derive(Debug, PartialEq, Eq)]
struct Open {
    f: usize,
    seq: u64,
    node: usize,
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for BinaryHeap's max-heap semantics.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A reached state with its incoming edge, for path reconstruction.
struct Node {
    state: WorldState,
    parent: Option<usize>,
    action: Option<Action>,
    g: usize,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Find a shortest action sequence from `start` to any state satisfying the
/// goal. Returns an empty plan when the goal already holds. Fails with
/// `OutOfTime` when the budget elapses or the whole reachable graph is
/// exhausted.
pub fn plan(start: &WorldState, goal: &DnfGoal, budget: Duration) -> Result<Vec<Action>> {
    let deadline = Instant::now() + budget;

    let mut nodes: Vec<Node> = vec![Node {
        state: start.clone(),
        parent: None,
        action: None,
        g: 0,
    }];
    let mut best_g: HashMap<WorldState, usize> = HashMap::new();
    best_g.insert(start.clone(), 0);

    let mut open = BinaryHeap::new();
    let mut seq: u64 = 0;
    open.push(Open {
        f: heuristic::goal_cost(&goal.conjunctions, start),
        seq,
        node: 0,
    });

    while let Some(Open { node, .. }) = open.pop() {
        if Instant::now() >= deadline {
            return Err(EngineError::OutOfTime);
        }

        let g = nodes[node].g;
        // A stale entry: this state was re-queued with a better g.
        if best_g
            .get(&nodes[node].state)
            .map_or(false, |&best| g > best)
        {
            continue;
        }

        if is_goal(&nodes[node].state, goal) {
            return Ok(reconstruct(&nodes, node));
        }

        for (action, next_state) in successor::successors(&nodes[node].state) {
            let tentative = g + 1;
            let improved = best_g
                .get(&next_state)
                .map_or(true, |&best| tentative < best);
            if !improved {
                continue;
            }
            best_g.insert(next_state.clone(), tentative);
            let h = heuristic::goal_cost(&goal.conjunctions, &next_state);
            nodes.push(Node {
                state: next_state,
                parent: Some(node),
                action: Some(action),
                g: tentative,
            });
            seq += 1;
            open.push(Open {
                f: tentative + h,
                seq,
                node: nodes.len() - 1,
            });
        }
    }

    Err(EngineError::OutOfTime)
}

fn is_goal(state: &WorldState, goal: &DnfGoal) -> bool {
    goal.conjunctions
        .iter()
        .any(|conj| state.satisfies_all(conj))
}

/// Walk parent pointers back to the start, collecting incoming actions.
fn reconstruct(nodes: &[Node], mut idx: usize) -> Vec<Action> {
    let mut actions = Vec::new();
    while let (Some(parent), Some(action)) = (nodes[idx].parent, nodes[idx].action) {
        actions.push(action);
        idx = parent;
    }
    actions.reverse();
    actions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
