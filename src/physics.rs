//! The physics rulebook: a pure permission predicate over object pairs.
//!
//! Consulted by the goal compiler (to filter impossible goal literals, and to
//! name the broken rule when nothing survives) and by the world successor
//! (a drop is legal only if the resulting support relation is permitted).

use crate::types::{Form, Label, Relation, Size};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Permission predicate
// ---------------------------------------------------------------------------

/// True when `upper` may stand in `rel` to `lower`.
pub fn permits(state: &WorldState, upper: &Label, lower: &Label, rel: Relation) -> bool {
    deny(state, upper, lower, rel).is_none()
}

/// The rule that forbids `rel(upper, lower)`, if any. The returned string is
/// the user-visible message for that rule.
pub fn deny(
    state: &WorldState,
    upper: &Label,
    lower: &Label,
    rel: Relation,
) -> Option<&'static str> {
    if upper == lower {
        return Some("An object cannot be related to itself.");
    }
    let u = state.definition(upper);
    let l = state.definition(lower);

    match rel {
        Relation::Inside => {
            if l.form != Form::Box {
                return Some("Objects can only be inside of boxes.");
            }
            if l.size == Size::Small && u.size == Size::Large {
                return Some("A large object cannot fit inside a small box.");
            }
            if u.size == l.size
                && matches!(u.form, Form::Box | Form::Pyramid | Form::Plank)
            {
                return Some(
                    "Boxes, pyramids and planks cannot fit inside a box of the same size.",
                );
            }
            None
        }
        Relation::OnTop => {
            if l.form == Form::Box {
                return Some("Objects go inside a box, not on top of it.");
            }
            if l.form == Form::Ball {
                return Some("Balls cannot support other objects.");
            }
            if u.form == Form::Ball && !matches!(l.form, Form::Floor | Form::Box) {
                return Some("A ball can only rest on the floor or inside a box.");
            }
            if l.size == Size::Small && u.size == Size::Large {
                return Some("A small object cannot support a large one.");
            }
            if u.form == Form::Box && u.size == Size::Small {
                if l.size == Size::Small && matches!(l.form, Form::Brick | Form::Pyramid) {
                    return Some("A small box cannot rest on a small brick or pyramid.");
                }
            }
            if u.form == Form::Box
                && u.size == Size::Large
                && l.form == Form::Pyramid
                && l.size == Size::Large
            {
                return Some("A large box cannot rest on a large pyramid.");
            }
            None
        }
        Relation::Above => {
            if l.form == Form::Ball {
                return Some("Balls cannot support other objects.");
            }
            if u.size == Size::Large && l.size == Size::Small {
                return Some("A small object cannot support a large one.");
            }
            None
        }
        Relation::Under => {
            if u.form == Form::Ball {
                return Some("Balls cannot be under other objects.");
            }
            None
        }
        // Satisfaction of these is positional, not physical.
        Relation::LeftOf | Relation::RightOf | Relation::Beside => None,
        Relation::Holding => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
