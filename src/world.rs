//! World state: a row of stacks, one gantry arm, at most one held object.
//!
//! States are cloned per search node during planning; the live session state
//! is only mutated by executing a finished plan. The `objects` map is shared
//! by reference across every clone — it never changes within a session.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::types::{Action, Label, Literal, ObjectDef, Relation, FLOOR};

// ---------------------------------------------------------------------------
// WorldState
// ---------------------------------------------------------------------------

/// A complete snapshot of the blocks world.
#[derive(Debug, Clone)]
pub struct WorldState {
    /// Columns of labels, bottom to top. Length is fixed for the session.
    pub stacks: Vec<Vec<Label>>,
    /// Arm column index, always in `[0, stacks.len())`.
    pub arm: usize,
    /// The label currently held, if any.
    pub holding: Option<Label>,
    /// Label → attribute record, shared across all clones of this state.
    pub objects: Arc<HashMap<Label, ObjectDef>>,
}

/// Structural equality ignores the shared `objects` map: two states are the
/// same search node exactly when stacks, arm and holding agree.
impl PartialEq for WorldState {
    fn eq(&self, other: &Self) -> bool {
        self.arm == other.arm && self.holding == other.holding && self.stacks == other.stacks
    }
}

impl Eq for WorldState {}

impl Hash for WorldState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stacks.hash(state);
        self.arm.hash(state);
        self.holding.hash(state);
    }
}

impl WorldState {
    pub fn new(
        stacks: Vec<Vec<Label>>,
        arm: usize,
        holding: Option<Label>,
        objects: Arc<HashMap<Label, ObjectDef>>,
    ) -> Self {
        Self {
            stacks,
            arm,
            holding,
            objects,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.stacks.len()
    }

    /// Attribute record for a label. The floor has a fixed definition and is
    /// not stored in the map.
    pub fn definition(&self, label: &str) -> &ObjectDef {
        if label == FLOOR {
            &ObjectDef::FLOOR_DEF
        } else {
            self.objects
                .get(label)
                .unwrap_or(&ObjectDef::FLOOR_DEF)
        }
    }

    /// (column, height) of a stacked label. Held objects and the floor have
    /// no position.
    pub fn position(&self, label: &str) -> Option<(usize, usize)> {
        for (col, stack) in self.stacks.iter().enumerate() {
            if let Some(height) = stack.iter().position(|l| l == label) {
                return Some((col, height));
            }
        }
        None
    }

    /// Top label of a column, if the column is non-empty.
    pub fn top(&self, col: usize) -> Option<&Label> {
        self.stacks[col].last()
    }

    /// All labels present in the world: every stack plus the held object.
    /// The floor sentinel is not included.
    pub fn labels(&self) -> Vec<Label> {
        let mut all: Vec<Label> = self.stacks.iter().flatten().cloned().collect();
        if let Some(h) = &self.holding {
            all.push(h.clone());
        }
        all
    }

    // -----------------------------------------------------------------------
    // Literal satisfaction
    // -----------------------------------------------------------------------

    /// Does the given literal hold in this state? Positional semantics only;
    /// the physics oracle is not consulted here.
    pub fn satisfies(&self, lit: &Literal) -> bool {
        let truth = self.positive_holds(lit);
        if lit.polarity {
            truth
        } else {
            !truth
        }
    }

    fn positive_holds(&self, lit: &Literal) -> bool {
        if lit.rel == Relation::Holding {
            return self.holding.as_deref() == Some(lit.first().as_str());
        }
        let a = lit.first();
        let b = match lit.second() {
            Some(b) => b,
            None => return false,
        };

        // ontop(a, floor) means a rests at height 0 of some column.
        if lit.rel == Relation::OnTop && b == FLOOR {
            return matches!(self.position(a), Some((_, 0)));
        }

        let (ca, ha) = match self.position(a) {
            Some(p) => p,
            None => return false,
        };
        let (cb, hb) = match self.position(b) {
            Some(p) => p,
            None => return false,
        };

        match lit.rel {
            Relation::LeftOf => ca < cb,
            Relation::RightOf => ca > cb,
            Relation::Beside => ca.abs_diff(cb) == 1,
            Relation::Inside | Relation::OnTop => ca == cb && ha == hb + 1,
            Relation::Above => ca == cb && ha > hb,
            Relation::Under => ca == cb && ha < hb,
            Relation::Holding => unreachable!("handled above"),
        }
    }

    /// Does any conjunction of the goal hold entirely?
    pub fn satisfies_all(&self, conjunction: &[Literal]) -> bool {
        conjunction.iter().all(|lit| self.satisfies(lit))
    }

    // -----------------------------------------------------------------------
    // Action application
    // -----------------------------------------------------------------------

    /// Apply a primitive action in place. Returns false (leaving the state
    /// untouched) when the action is structurally impossible: moving off the
    /// row, picking with a full hand or from an empty column, dropping with
    /// an empty hand. Physics legality of drops is the successor's concern.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Left => {
                if self.arm == 0 {
                    return false;
                }
                self.arm -= 1;
                true
            }
            Action::Right => {
                if self.arm + 1 >= self.width() {
                    return false;
                }
                self.arm += 1;
                true
            }
            Action::Pick => {
                if self.holding.is_some() {
                    return false;
                }
                match self.stacks[self.arm].pop() {
                    Some(label) => {
                        self.holding = Some(label);
                        true
                    }
                    None => false,
                }
            }
            Action::Drop => match self.holding.take() {
                Some(label) => {
                    self.stacks[self.arm].push(label);
                    true
                }
                None => false,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Invariants (used by tests and the fixture loader)
    // -----------------------------------------------------------------------

    /// Verify the structural invariants: arm in range, no duplicate labels,
    /// no floor label stored anywhere, held label absent from every stack.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        if self.arm >= self.width() {
            return Err(format!(
                "arm at column {} but world has {} columns",
                self.arm,
                self.width()
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for label in self.labels() {
            if label == FLOOR {
                return Err("floor stored as a movable label".to_string());
            }
            if !seen.insert(label.clone()) {
                return Err(format!("label '{}' appears in two locations", label));
            }
            if !self.objects.contains_key(&label) {
                return Err(format!("label '{}' has no definition", label));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
