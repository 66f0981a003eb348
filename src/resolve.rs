//! Reference resolution: noun-phrase trees → matching label sets.
//!
//! A leaf description filters by attributes; a relative clause keeps each
//! candidate whose spatial neighborhood (per relation) contains a label
//! matching the clause's referent. With an "all"-quantified referent the
//! whole referent set must lie inside the candidate's neighborhood.
//!
//! Results are sorted, so the outcome never depends on candidate ordering.

use crate::nl::command::{Entity, Object};
use crate::types::{EngineError, Form, Label, Quantifier, Relation, Result, FLOOR};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Every label a description may refer to: all objects in play plus the
/// floor sentinel.
pub fn all_candidates(state: &WorldState) -> Vec<Label> {
    let mut pool = state.labels();
    pool.push(FLOOR.to_string());
    pool
}

/// Resolve an entity's object description against the current world.
/// Raises `NoMatch` when nothing fits, naming the missing description.
pub fn resolve_entity(state: &WorldState, entity: &Entity) -> Result<Vec<Label>> {
    let pool = all_candidates(state);
    resolve_object(state, &entity.object, &pool)
}

/// Resolve an object description against a candidate pool.
pub fn resolve_object(state: &WorldState, object: &Object, pool: &[Label]) -> Result<Vec<Label>> {
    let matched = match object {
        Object::Leaf { size, color, form } => {
            let mut out: Vec<Label> = pool
                .iter()
                .filter(|label| leaf_matches(state, label, *size, *color, *form))
                .cloned()
                .collect();
            out.sort();
            out.dedup();
            out
        }
        Object::Clause { object, location } => {
            let base = resolve_object(state, object, pool)?;
            let referents = resolve_object(state, &location.entity.object, pool)?;
            let universal = location.entity.quantifier == Quantifier::All;
            let mut out: Vec<Label> = base
                .into_iter()
                .filter(|cand| {
                    let hood = neighborhood(state, cand, location.relation);
                    let overlaps = referents.iter().any(|r| hood.contains(r));
                    if universal {
                        overlaps && referents.iter().all(|r| hood.contains(r))
                    } else {
                        overlaps
                    }
                })
                .collect();
            out.sort();
            out.dedup();
            out
        }
    };

    if matched.is_empty() {
        return Err(EngineError::NoMatch(object.render()));
    }
    Ok(matched)
}

// ---------------------------------------------------------------------------
// Leaf matching
// ---------------------------------------------------------------------------

fn leaf_matches(
    state: &WorldState,
    label: &str,
    size: crate::types::Size,
    color: crate::types::Color,
    form: Form,
) -> bool {
    // The floor only answers to an explicit floor description.
    if label == FLOOR {
        return form == Form::Floor;
    }
    if form == Form::Floor {
        return false;
    }
    let def = state.definition(label);
    (form == Form::Any || def.form == form)
        && (size == crate::types::Size::Any || def.size == size)
        && (color == crate::types::Color::Any || def.color == color)
}

// ---------------------------------------------------------------------------
// Spatial neighborhoods
// ---------------------------------------------------------------------------

/// The labels a candidate can stand in `rel` to, given its current position.
/// Held objects have no position and therefore empty neighborhoods.
fn neighborhood(state: &WorldState, candidate: &str, rel: Relation) -> Vec<Label> {
    let (col, height) = match state.position(candidate) {
        Some(p) => p,
        None => return Vec::new(),
    };

    match rel {
        Relation::LeftOf => columns_where(state, |c| c > col),
        Relation::RightOf => columns_where(state, |c| c < col),
        Relation::Beside => columns_where(state, |c| c.abs_diff(col) == 1),
        Relation::Above => state.stacks[col][..height].to_vec(),
        Relation::Under => state.stacks[col][height + 1..].to_vec(),
        Relation::Inside => {
            if height == 0 {
                return Vec::new();
            }
            let below = &state.stacks[col][height - 1];
            if state.definition(below).form == Form::Box {
                vec![below.clone()]
            } else {
                Vec::new()
            }
        }
        Relation::OnTop => {
            if height == 0 {
                vec![FLOOR.to_string()]
            } else {
                vec![state.stacks[col][height - 1].clone()]
            }
        }
        Relation::Holding => Vec::new(),
    }
}

fn columns_where(state: &WorldState, keep: impl Fn(usize) -> bool) -> Vec<Label> {
    state
        .stacks
        .iter()
        .enumerate()
        .filter(|(c, _)| keep(*c))
        .flat_map(|(_, stack)| stack.iter().cloned())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nl::command::Location;
    use crate::types::{Color, ObjectDef, Size};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn leaf(size: Size, color: Color, form: Form) -> Object {
        Object::Leaf { size, color, form }
    }

    fn entity(q: Quantifier, o: Object) -> Entity {
        Entity {
            quantifier: q,
            object: o,
        }
    }

    fn clause(inner: Object, rel: Relation, q: Quantifier, referent: Object) -> Object {
        Object::Clause {
            object: Box::new(inner),
            location: Location {
                relation: rel,
                entity: Box::new(entity(q, referent)),
            },
        }
    }

    /// col0: [e(box)], col1: [], col2: [c(brick), a(small white ball)],
    /// col3: [b(large black ball)]
    fn world() -> WorldState {
        let mut m = HashMap::new();
        m.insert(
            "a".to_string(),
            ObjectDef::new(Form::Ball, Size::Small, Color::White),
        );
        m.insert(
            "b".to_string(),
            ObjectDef::new(Form::Ball, Size::Large, Color::Black),
        );
        m.insert(
            "c".to_string(),
            ObjectDef::new(Form::Brick, Size::Large, Color::Red),
        );
        m.insert(
            "e".to_string(),
            ObjectDef::new(Form::Box, Size::Large, Color::Yellow),
        );
        WorldState::new(
            vec![
                vec!["e".into()],
                vec![],
                vec!["c".into(), "a".into()],
                vec!["b".into()],
            ],
            0,
            None,
            Arc::new(m),
        )
    }

    fn resolve(state: &WorldState, obj: Object) -> Result<Vec<Label>> {
        resolve_entity(state, &entity(Quantifier::The, obj))
    }

    #[test]
    fn test_leaf_by_form() {
        let w = world();
        assert_eq!(
            resolve(&w, leaf(Size::Any, Color::Any, Form::Ball)).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_leaf_by_attributes() {
        let w = world();
        assert_eq!(
            resolve(&w, leaf(Size::Any, Color::White, Form::Ball)).unwrap(),
            vec!["a".to_string()]
        );
        assert_eq!(
            resolve(&w, leaf(Size::Large, Color::Any, Form::Any)).unwrap(),
            vec!["b".to_string(), "c".to_string(), "e".to_string()]
        );
    }

    #[test]
    fn test_floor_needs_explicit_form() {
        let w = world();
        assert_eq!(
            resolve(&w, leaf(Size::Any, Color::Any, Form::Floor)).unwrap(),
            vec![FLOOR.to_string()]
        );
        // The anyform wildcard never picks up the floor.
        let anything = resolve(&w, leaf(Size::Any, Color::Any, Form::Any)).unwrap();
        assert!(!anything.contains(&FLOOR.to_string()));
    }

    #[test]
    fn test_no_match_raises_description() {
        let w = world();
        let err = resolve(&w, leaf(Size::Any, Color::Green, Form::Ball)).unwrap_err();
        assert_eq!(err.to_string(), "There is no green ball.");
    }

    #[test]
    fn test_clause_ontop() {
        let w = world();
        // "the ball that is on top of a brick" → a
        let obj = clause(
            leaf(Size::Any, Color::Any, Form::Ball),
            Relation::OnTop,
            Quantifier::Any,
            leaf(Size::Any, Color::Any, Form::Brick),
        );
        assert_eq!(resolve(&w, obj).unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn test_clause_ontop_floor() {
        let w = world();
        // "the ball that is on the floor" → b (a sits on the brick)
        let obj = clause(
            leaf(Size::Any, Color::Any, Form::Ball),
            Relation::OnTop,
            Quantifier::The,
            leaf(Size::Any, Color::Any, Form::Floor),
        );
        assert_eq!(resolve(&w, obj).unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_clause_leftof() {
        let w = world();
        // "the object left of the brick" → e (column 0, brick in column 2)
        let obj = clause(
            leaf(Size::Any, Color::Any, Form::Any),
            Relation::LeftOf,
            Quantifier::The,
            leaf(Size::Any, Color::Any, Form::Brick),
        );
        assert_eq!(resolve(&w, obj).unwrap(), vec!["e".to_string()]);
    }

    #[test]
    fn test_clause_above_and_under() {
        let w = world();
        // "the ball above a brick" → a
        let above = clause(
            leaf(Size::Any, Color::Any, Form::Ball),
            Relation::Above,
            Quantifier::Any,
            leaf(Size::Any, Color::Any, Form::Brick),
        );
        assert_eq!(resolve(&w, above).unwrap(), vec!["a".to_string()]);
        // "the brick under a ball" → c
        let under = clause(
            leaf(Size::Any, Color::Any, Form::Brick),
            Relation::Under,
            Quantifier::Any,
            leaf(Size::Any, Color::Any, Form::Ball),
        );
        assert_eq!(resolve(&w, under).unwrap(), vec!["c".to_string()]);
    }

    #[test]
    fn test_clause_all_universal() {
        let w = world();
        // "the object left of all balls" → e only: the brick is left of one
        // ball but sits under the other.
        let obj = clause(
            leaf(Size::Any, Color::Any, Form::Any),
            Relation::LeftOf,
            Quantifier::All,
            leaf(Size::Any, Color::Any, Form::Ball),
        );
        assert_eq!(resolve(&w, obj).unwrap(), vec!["e".to_string()]);
    }

    #[test]
    fn test_clause_empty_sub_resolution_names_clause() {
        let w = world();
        let obj = clause(
            leaf(Size::Any, Color::Any, Form::Ball),
            Relation::Inside,
            Quantifier::Any,
            leaf(Size::Any, Color::Any, Form::Box),
        );
        let err = resolve(&w, obj).unwrap_err();
        assert_eq!(
            err.to_string(),
            "There is no ball that is inside any box."
        );
    }

    #[test]
    fn test_held_object_matches_leaf_but_not_clauses() {
        let mut w = world();
        w.arm = 2;
        w.apply(crate::types::Action::Pick); // holding a
        let balls = resolve(&w, leaf(Size::Any, Color::Any, Form::Ball)).unwrap();
        assert_eq!(balls, vec!["a".to_string(), "b".to_string()]);
        // But "the ball on top of a brick" no longer matches a.
        let obj = clause(
            leaf(Size::Any, Color::Any, Form::Ball),
            Relation::OnTop,
            Quantifier::Any,
            leaf(Size::Any, Color::Any, Form::Brick),
        );
        assert!(resolve(&w, obj).is_err());
    }

    #[test]
    fn test_result_is_order_independent() {
        let w = world();
        let obj = leaf(Size::Any, Color::Any, Form::Ball);
        let pool = all_candidates(&w);
        let mut reversed = pool.clone();
        reversed.reverse();
        let forward = resolve_object(&w, &obj, &pool).unwrap();
        let backward = resolve_object(&w, &obj, &reversed).unwrap();
        assert_eq!(forward, backward);
    }
}
