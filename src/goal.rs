//! Goal compilation: resolved label sets + quantifiers → a DNF goal formula.
//!
//! The pre-filters reject infeasible quantifier combinations up front with
//! their own messages; construction then branches on the quantifier pair and
//! keeps only physics-permitted literals. When filtering leaves nothing, the
//! broken physics rule (if one was seen) names the error.

use crate::physics;
use crate::types::{
    Color, Conjunction, DnfGoal, EngineError, Form, Label, Literal, Quantifier, Relation, Result,
    Size,
};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Compiler input
// ---------------------------------------------------------------------------

/// Everything the compiler needs about one utterance, after resolution and
/// after any clarification dialogue has narrowed the "the" sides.
#[derive(Debug, Clone)]
pub struct GoalSpec {
    /// Candidate movable labels.
    pub movables: Vec<Label>,
    pub movable_quant: Quantifier,
    /// Head attributes of the movable description (for the self-relation
    /// pre-filter).
    pub movable_head: (Size, Color, Form),
    /// The target relation; `None` means a pickup goal (`holding`).
    pub relation: Option<Relation>,
    /// Candidate destination labels; empty for pickups.
    pub relatables: Vec<Label>,
    pub relatable_quant: Quantifier,
    pub relatable_head: (Size, Color, Form),
}

impl GoalSpec {
    /// A pickup goal: no relation, no destinations.
    pub fn pickup(movables: Vec<Label>, quant: Quantifier, head: (Size, Color, Form)) -> Self {
        Self {
            movables,
            movable_quant: quant,
            movable_head: head,
            relation: None,
            relatables: Vec::new(),
            relatable_quant: Quantifier::Any,
            relatable_head: (Size::Any, Color::Any, Form::Any),
        }
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile a goal specification into DNF, or fail with the message for the
/// first violated rule.
pub fn compile(spec: &GoalSpec, state: &WorldState) -> Result<DnfGoal> {
    let mut spec = spec.clone();
    prefilter(&mut spec)?;

    match spec.relation {
        None => compile_pickup(&spec),
        Some(rel) => compile_placement(&spec, rel, state),
    }
}

// ---------------------------------------------------------------------------
// Pre-filters
// ---------------------------------------------------------------------------

fn prefilter(spec: &mut GoalSpec) -> Result<()> {
    let qm = spec.movable_quant;
    let qr = spec.relatable_quant;

    // Holding goals only ever involve one object.
    let Some(rel) = spec.relation else {
        if qm == Quantifier::All && spec.movables.len() > 1 {
            return Err(EngineError::BadGoal(
                "I can only hold one object at a time.".to_string(),
            ));
        }
        return Ok(());
    };

    // A destination described as anything but a box can never contain.
    if rel == Relation::Inside && !matches!(spec.relatable_head.2, Form::Box | Form::Any) {
        return Err(EngineError::BadGoal(
            "Objects can only be inside of boxes.".to_string(),
        ));
    }

    // Universal pairings whose descriptions overlap would relate an object
    // to itself.
    let universal_pair = matches!(
        (qm, qr),
        (Quantifier::All, Quantifier::All)
            | (Quantifier::All, Quantifier::The)
            | (Quantifier::The, Quantifier::All)
    );
    if universal_pair && heads_share_attribute(spec.movable_head, spec.relatable_head) {
        return Err(EngineError::BadGoal(
            "I cannot relate an object to itself.".to_string(),
        ));
    }

    // Moving everything onto/into a single carrier.
    let exclusive = matches!(rel, Relation::OnTop | Relation::Inside);
    let floor_dest = spec.relatables.iter().all(|r| r == crate::types::FLOOR);
    if qm == Quantifier::All && exclusive && !floor_dest {
        let one_target_msg = if rel == Relation::Inside {
            "A box can only fit one object."
        } else {
            "Only one object can be directly on top of another."
        };
        if qr == Quantifier::All && spec.movables.len() > 1 {
            return Err(EngineError::BadGoal(one_target_msg.to_string()));
        }
        if qr == Quantifier::The && spec.movables.len() > 1 {
            return Err(EngineError::BadGoal(one_target_msg.to_string()));
        }
        if spec.relatables.len() < spec.movables.len() {
            return Err(EngineError::BadGoal(
                "There are not enough targets for all the objects.".to_string(),
            ));
        }
    }
    if qr == Quantifier::All && exclusive && spec.movables.len() < spec.relatables.len() {
        return Err(EngineError::BadGoal(
            "There are not enough objects to fill every target.".to_string(),
        ));
    }

    // A label on both sides of an all/any pairing drops off the "any" side.
    let mixed = matches!(
        (qm, qr),
        (Quantifier::All, Quantifier::Any) | (Quantifier::Any, Quantifier::All)
    );
    if mixed {
        let overlap: Vec<Label> = spec
            .movables
            .iter()
            .filter(|m| spec.relatables.contains(m))
            .cloned()
            .collect();
        if !overlap.is_empty() {
            let any_side = if qm == Quantifier::Any {
                &mut spec.movables
            } else {
                &mut spec.relatables
            };
            any_side.retain(|l| !overlap.contains(l));
            if any_side.is_empty() {
                return Err(EngineError::BadGoal(
                    "I cannot relate an object to itself.".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// True when both descriptions pin the same value for any attribute.
fn heads_share_attribute(a: (Size, Color, Form), b: (Size, Color, Form)) -> bool {
    (a.0 != Size::Any && a.0 == b.0)
        || (a.1 != Color::Any && a.1 == b.1)
        || (a.2 != Form::Any && a.2 != Form::Floor && a.2 == b.2)
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

fn compile_pickup(spec: &GoalSpec) -> Result<DnfGoal> {
    if spec.movables.is_empty() {
        return Err(EngineError::NothingToDo);
    }
    let conjunctions: Vec<Conjunction> = spec
        .movables
        .iter()
        .map(|m| vec![Literal::holding(m.clone())])
        .collect();
    Ok(DnfGoal::new(conjunctions))
}

fn compile_placement(spec: &GoalSpec, rel: Relation, state: &WorldState) -> Result<DnfGoal> {
    let qm = spec.movable_quant;
    let qr = spec.relatable_quant;
    let exclusive = matches!(rel, Relation::OnTop | Relation::Inside);

    // Remember the first physics rule that fired, to name the error if
    // nothing survives.
    let mut broken_rule: Option<&'static str> = None;
    let mut permitted = |m: &Label, r: &Label| -> Option<Literal> {
        match physics::deny(state, m, r, rel) {
            None => Some(Literal::binary(rel, m.clone(), r.clone())),
            Some(rule) => {
                broken_rule.get_or_insert(rule);
                None
            }
        }
    };

    let conjunctions: Vec<Conjunction> = match (qm, qr) {
        // Each movable somewhere: conjunction of disjunctions, expanded.
        (Quantifier::All, Quantifier::Any) => {
            let per_movable: Vec<Vec<Literal>> = spec
                .movables
                .iter()
                .map(|m| {
                    spec.relatables
                        .iter()
                        .filter_map(|r| permitted(m, r))
                        .collect()
                })
                .collect();
            if per_movable.iter().any(|d| d.is_empty()) {
                Vec::new()
            } else {
                expand(&per_movable, exclusive)
            }
        }
        // Everything against the fixed target set: one big conjunction.
        (Quantifier::All, _) => {
            let conj: Conjunction = spec
                .movables
                .iter()
                .flat_map(|m| {
                    spec.relatables
                        .iter()
                        .filter_map(|r| permitted(m, r))
                        .collect::<Vec<_>>()
                })
                .collect();
            if conj.is_empty() {
                Vec::new()
            } else {
                vec![conj]
            }
        }
        // Every target covered by some movable: the dual expansion.
        (_, Quantifier::All) => {
            let per_target: Vec<Vec<Literal>> = spec
                .relatables
                .iter()
                .map(|r| {
                    spec.movables
                        .iter()
                        .filter_map(|m| permitted(m, r))
                        .collect()
                })
                .collect();
            if per_target.iter().any(|d| d.is_empty()) {
                Vec::new()
            } else {
                expand(&per_target, exclusive)
            }
        }
        // Existential pairings: a flat disjunction of single-literal goals.
        _ => spec
            .movables
            .iter()
            .flat_map(|m| {
                spec.relatables
                    .iter()
                    .filter_map(|r| permitted(m, r))
                    .map(|lit| vec![lit])
                    .collect::<Vec<_>>()
            })
            .collect(),
    };

    if conjunctions.is_empty() {
        return match broken_rule {
            Some(rule) => Err(EngineError::BadGoal(rule.to_string())),
            None => Err(EngineError::NothingToDo),
        };
    }
    Ok(DnfGoal::new(conjunctions))
}

// ---------------------------------------------------------------------------
// DNF expansion
// ---------------------------------------------------------------------------

/// Expand a conjunction of disjunctions into DNF by depth-first enumeration.
/// For exclusive relations (ontop/inside) an assignment is discarded when two
/// chosen literals share an argument: nothing rests on two supports, and no
/// support carries two objects.
fn expand(disjunctions: &[Vec<Literal>], exclusive: bool) -> Vec<Conjunction> {
    let mut out = Vec::new();
    let mut chosen: Conjunction = Vec::with_capacity(disjunctions.len());
    expand_rec(disjunctions, exclusive, &mut chosen, &mut out);
    out
}

fn expand_rec(
    rest: &[Vec<Literal>],
    exclusive: bool,
    chosen: &mut Conjunction,
    out: &mut Vec<Conjunction>,
) {
    let Some((first, tail)) = rest.split_first() else {
        out.push(chosen.clone());
        return;
    };
    for lit in first {
        if exclusive && conflicts(chosen, lit) {
            continue;
        }
        chosen.push(lit.clone());
        expand_rec(tail, exclusive, chosen, out);
        chosen.pop();
    }
}

fn conflicts(chosen: &[Literal], lit: &Literal) -> bool {
    chosen.iter().any(|prev| {
        prev.first() == lit.first() || prev.second() == lit.second()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectDef, FLOOR};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn state() -> WorldState {
        let mut m = HashMap::new();
        m.insert(
            "a".to_string(),
            ObjectDef::new(Form::Ball, Size::Small, Color::White),
        );
        m.insert(
            "b".to_string(),
            ObjectDef::new(Form::Ball, Size::Small, Color::Black),
        );
        m.insert(
            "e".to_string(),
            ObjectDef::new(Form::Box, Size::Large, Color::Yellow),
        );
        m.insert(
            "f".to_string(),
            ObjectDef::new(Form::Box, Size::Large, Color::Red),
        );
        m.insert(
            "t".to_string(),
            ObjectDef::new(Form::Table, Size::Large, Color::Blue),
        );
        WorldState::new(
            vec![
                vec!["e".into()],
                vec!["f".into()],
                vec!["t".into()],
                vec!["a".into()],
                vec!["b".into()],
            ],
            0,
            None,
            Arc::new(m),
        )
    }

    fn labels(names: &[&str]) -> Vec<Label> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn ball_head() -> (Size, Color, Form) {
        (Size::Any, Color::Any, Form::Ball)
    }

    fn box_head() -> (Size, Color, Form) {
        (Size::Any, Color::Any, Form::Box)
    }

    fn spec(
        movables: &[&str],
        qm: Quantifier,
        rel: Relation,
        relatables: &[&str],
        qr: Quantifier,
    ) -> GoalSpec {
        GoalSpec {
            movables: labels(movables),
            movable_quant: qm,
            movable_head: ball_head(),
            relation: Some(rel),
            relatables: labels(relatables),
            relatable_quant: qr,
            relatable_head: box_head(),
        }
    }

    #[test]
    fn test_pickup_any_is_flat_disjunction() {
        let s = state();
        let goal = compile(
            &GoalSpec::pickup(labels(&["a", "b"]), Quantifier::Any, ball_head()),
            &s,
        )
        .unwrap();
        assert_eq!(goal.conjunctions.len(), 2);
        assert_eq!(goal.to_string(), "(holding(a)) | (holding(b))");
    }

    #[test]
    fn test_pickup_all_of_two_rejected() {
        let s = state();
        let err = compile(
            &GoalSpec::pickup(labels(&["a", "b"]), Quantifier::All, ball_head()),
            &s,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "I can only hold one object at a time.");
    }

    #[test]
    fn test_all_balls_into_the_box_rejected() {
        let s = state();
        let err = compile(
            &spec(&["a", "b"], Quantifier::All, Relation::Inside, &["e"], Quantifier::The),
            &s,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "A box can only fit one object.");
    }

    #[test]
    fn test_all_balls_into_all_boxes_rejected() {
        let s = state();
        let err = compile(
            &spec(&["a", "b"], Quantifier::All, Relation::Inside, &["e", "f"], Quantifier::All),
            &s,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "A box can only fit one object.");
    }

    #[test]
    fn test_all_onto_floor_is_single_conjunction() {
        let s = state();
        let mut gs = spec(
            &["a", "b"],
            Quantifier::All,
            Relation::OnTop,
            &[FLOOR],
            Quantifier::The,
        );
        gs.relatable_head = (Size::Any, Color::Any, Form::Floor);
        let goal = compile(&gs, &s).unwrap();
        assert_eq!(goal.conjunctions.len(), 1);
        assert_eq!(goal.conjunctions[0].len(), 2);
        assert_eq!(
            goal.to_string(),
            "(ontop(a,floor) & ontop(b,floor))"
        );
    }

    #[test]
    fn test_all_any_expansion_avoids_shared_targets() {
        let s = state();
        let goal = compile(
            &spec(&["a", "b"], Quantifier::All, Relation::Inside, &["e", "f"], Quantifier::Any),
            &s,
        )
        .unwrap();
        // Each ball into a different box: 2 valid assignments out of 4.
        assert_eq!(goal.conjunctions.len(), 2);
        for conj in &goal.conjunctions {
            let targets: Vec<&Label> = conj.iter().filter_map(|l| l.second()).collect();
            assert_ne!(targets[0], targets[1], "shared target slipped through");
        }
    }

    #[test]
    fn test_dual_expansion_every_box_filled() {
        let s = state();
        let goal = compile(
            &spec(&["a", "b"], Quantifier::Any, Relation::Inside, &["e", "f"], Quantifier::All),
            &s,
        )
        .unwrap();
        // One conjunct per box, no ball in two boxes at once.
        assert_eq!(goal.conjunctions.len(), 2);
        for conj in &goal.conjunctions {
            let movers: Vec<&Label> = conj.iter().map(|l| l.first()).collect();
            assert_ne!(movers[0], movers[1]);
        }
    }

    #[test]
    fn test_any_any_flat_disjunction() {
        let s = state();
        let goal = compile(
            &spec(&["a", "b"], Quantifier::Any, Relation::Inside, &["e", "f"], Quantifier::Any),
            &s,
        )
        .unwrap();
        assert_eq!(goal.conjunctions.len(), 4);
        assert!(goal.conjunctions.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_inside_non_box_destination_rejected_statically() {
        let s = state();
        let mut gs = spec(&["a"], Quantifier::Any, Relation::Inside, &["t"], Quantifier::The);
        gs.relatable_head = (Size::Any, Color::Any, Form::Table);
        let err = compile(&gs, &s).unwrap_err();
        assert_eq!(err.to_string(), "Objects can only be inside of boxes.");
    }

    #[test]
    fn test_physics_rule_named_when_nothing_survives() {
        let s = state();
        // A ball on top of a ball: the oracle rejects every pair.
        let mut gs = spec(&["a"], Quantifier::Any, Relation::OnTop, &["b"], Quantifier::The);
        gs.relatable_head = ball_head();
        // Shared head attributes only matter for universal pairings.
        let err = compile(&gs, &s).unwrap_err();
        assert_eq!(err.to_string(), "Balls cannot support other objects.");
    }

    #[test]
    fn test_universal_self_relation_rejected() {
        let s = state();
        let mut gs = spec(
            &["a", "b"],
            Quantifier::All,
            Relation::LeftOf,
            &["a", "b"],
            Quantifier::All,
        );
        gs.relatable_head = ball_head();
        let err = compile(&gs, &s).unwrap_err();
        assert_eq!(err.to_string(), "I cannot relate an object to itself.");
    }

    #[test]
    fn test_overlap_drops_off_any_side() {
        let s = state();
        // "put all balls beside a ball": the any-side loses both balls and
        // becomes empty.
        let mut gs = spec(
            &["a", "b"],
            Quantifier::All,
            Relation::Beside,
            &["a", "b"],
            Quantifier::Any,
        );
        gs.relatable_head = ball_head();
        // Heads share the ball form, but beside with all/any is not a
        // universal pairing, so the overlap filter is what fires.
        let err = compile(&gs, &s).unwrap_err();
        assert_eq!(err.to_string(), "I cannot relate an object to itself.");
    }

    #[test]
    fn test_not_enough_targets() {
        let s = state();
        let err = compile(
            &spec(&["a", "b"], Quantifier::All, Relation::Inside, &["e"], Quantifier::Any),
            &s,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "There are not enough targets for all the objects."
        );
    }

    #[test]
    fn test_not_enough_movables_for_universal_targets() {
        let s = state();
        let err = compile(
            &spec(&["a"], Quantifier::Any, Relation::Inside, &["e", "f"], Quantifier::All),
            &s,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "There are not enough objects to fill every target."
        );
    }
}
