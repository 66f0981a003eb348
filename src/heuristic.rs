//! Admissible cost estimation for the planner.
//!
//! Per literal: a lower bound on the primitive actions still needed. A
//! conjunction takes the maximum over its literals (each is a lower bound on
//! a plan satisfying all of them); the DNF goal takes the minimum over its
//! conjunctions (the planner will satisfy the cheapest).
//!
//! Clearing one covering object costs at most pick + move + drop + move, so
//! exposure is estimated at 4 per cover, minus the final return trip.

use crate::types::{Label, Literal, Relation, FLOOR};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Goal-level estimators
// ---------------------------------------------------------------------------

/// Estimated cost to satisfy the cheapest conjunction of the goal.
pub fn goal_cost(conjunctions: &[Vec<Literal>], state: &WorldState) -> usize {
    conjunctions
        .iter()
        .map(|conj| conjunction_cost(conj, state))
        .min()
        .unwrap_or(0)
}

/// Estimated cost to satisfy every literal of a conjunction.
pub fn conjunction_cost(conjunction: &[Literal], state: &WorldState) -> usize {
    conjunction
        .iter()
        .map(|lit| literal_cost(lit, state))
        .max()
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Per-literal estimator
// ---------------------------------------------------------------------------

/// Estimated cost to satisfy one literal; zero when it already holds.
pub fn literal_cost(lit: &Literal, state: &WorldState) -> usize {
    if state.satisfies(lit) {
        return 0;
    }

    let x = lit.first();
    if lit.rel == Relation::Holding {
        return expose(state, x) + move_to(state, x) + 1;
    }
    match lit.second() {
        Some(y) => binary_cost(lit.rel, x, y, state),
        None => 0,
    }
}

fn binary_cost(rel: Relation, x: &Label, y: &Label, state: &WorldState) -> usize {
    let steps = steps_between(state, x, y);
    match rel {
        Relation::LeftOf | Relation::RightOf => {
            let free_x = expose(state, x) + move_to(state, x);
            let free_y = expose(state, y) + move_to(state, y);
            steps + 1 + free_x.min(free_y)
        }
        Relation::Inside | Relation::OnTop => {
            let reach = move_to(state, x).min(move_to(state, y));
            let clearing = if col_of(state, x) == col_of(state, y) {
                expose(state, x).max(expose(state, y))
            } else {
                expose(state, x) + expose(state, y)
            };
            reach + steps + 1 + clearing
        }
        Relation::Beside => {
            let free_x = move_to(state, x) + expose(state, x);
            let free_y = move_to(state, y) + expose(state, y);
            (free_x.min(free_y) + steps).saturating_sub(1)
        }
        Relation::Under => move_to(state, y) + expose(state, y) + steps,
        Relation::Above => move_to(state, x) + expose(state, x) + steps,
        Relation::Holding => unreachable!("holding is unary"),
    }
}

// ---------------------------------------------------------------------------
// Primitive sub-costs
// ---------------------------------------------------------------------------

/// The easiest column to clear down to floor: minimizes distance plus
/// clearing effort.
pub fn floor_col(state: &WorldState) -> usize {
    (0..state.width())
        .min_by_key(|&i| {
            state.arm.abs_diff(i) as isize + 4 * state.stacks[i].len() as isize - 1
        })
        .unwrap_or(0)
}

/// Column a label occupies for distance purposes: the arm column when held,
/// the cheapest clearable column for the floor.
fn col_of(state: &WorldState, label: &Label) -> usize {
    if state.holding.as_deref() == Some(label.as_str()) {
        return state.arm;
    }
    if label == FLOOR {
        return floor_col(state);
    }
    state.position(label).map(|(c, _)| c).unwrap_or(state.arm)
}

/// Arm travel to reach a label; zero when it is already in hand.
fn move_to(state: &WorldState, label: &Label) -> usize {
    if state.holding.as_deref() == Some(label.as_str()) {
        return 0;
    }
    state.arm.abs_diff(col_of(state, label))
}

/// Column distance between two labels.
fn steps_between(state: &WorldState, x: &Label, y: &Label) -> usize {
    col_of(state, x).abs_diff(col_of(state, y))
}

/// Cost to uncover a label: 4 per covering object (pick, move, drop, move),
/// minus the final return trip, plus one to free the hand first when the arm
/// is loaded. A held label needs no uncovering; the floor is uncovered by
/// clearing the cheapest column.
fn expose(state: &WorldState, label: &Label) -> usize {
    if state.holding.as_deref() == Some(label.as_str()) {
        return 0;
    }
    let covers = if label == FLOOR {
        state.stacks[floor_col(state)].len()
    } else {
        match state.position(label) {
            Some((col, height)) => state.stacks[col].len() - height - 1,
            None => 0,
        }
    };
    if covers == 0 {
        0
    } else {
        4 * covers - 1 + usize::from(state.holding.is_some())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
