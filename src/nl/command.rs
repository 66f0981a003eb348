//! The command tree delivered by the grammar front-end.
//!
//! Three node kinds: a Command pairs a verb with an optional entity and an
//! optional location; an Entity pairs a quantifier with an object; an Object
//! is either an attribute leaf or a relative clause wrapping a sub-object.
//! The canonical rendering inserts "that is" before every relative clause,
//! which keeps distinct attachments distinguishable when listed to the user.

use std::fmt;

use crate::types::{Color, Form, Quantifier, Relation, Size};

// ---------------------------------------------------------------------------
// Tree node kinds
// ---------------------------------------------------------------------------

/// Top-level verb class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// "take the ball" — entity only.
    Take,
    /// "put it on the floor" — location only; the movable is the held object.
    Put,
    /// "put the ball in the box" — entity and location.
    Move,
}

/// An imperative command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub entity: Option<Entity>,
    pub location: Option<Location>,
}

/// A quantified noun phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub quantifier: Quantifier,
    pub object: Object,
}

/// A description of objects: a bare attribute leaf, or a sub-description
/// narrowed by a relative clause ("the ball that is inside a box").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Leaf {
        size: Size,
        color: Color,
        form: Form,
    },
    Clause {
        object: Box<Object>,
        location: Location,
    },
}

/// A spatial constraint: a relation to some entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub relation: Relation,
    pub entity: Box<Entity>,
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Object {
    /// The attribute triple at the head of this description, descending
    /// through relative clauses to the underlying leaf.
    pub fn head(&self) -> (Size, Color, Form) {
        match self {
            Object::Leaf { size, color, form } => (*size, *color, *form),
            Object::Clause { object, .. } => object.head(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonical rendering
// ---------------------------------------------------------------------------

impl Command {
    /// Canonical English rendering, used verbatim when listing ambiguous
    /// parses back to the user.
    pub fn render(&self) -> String {
        match self.verb {
            Verb::Take => match &self.entity {
                Some(e) => format!("take {}", e.render()),
                None => "take".to_string(),
            },
            Verb::Put => match &self.location {
                Some(l) => format!("put it {}", l.render()),
                None => "put it".to_string(),
            },
            Verb::Move => {
                let entity = self
                    .entity
                    .as_ref()
                    .map(|e| e.render())
                    .unwrap_or_default();
                let location = self
                    .location
                    .as_ref()
                    .map(|l| l.render())
                    .unwrap_or_default();
                format!("move {} {}", entity, location)
            }
        }
    }
}

impl Entity {
    pub fn render(&self) -> String {
        let quant = match self.quantifier {
            Quantifier::The => "the",
            Quantifier::Any => "any",
            Quantifier::All => "all",
        };
        format!("{} {}", quant, self.object.render())
    }
}

impl Object {
    pub fn render(&self) -> String {
        match self {
            Object::Leaf { size, color, form } => {
                crate::describe::pattern_description(*size, *color, *form)
            }
            Object::Clause { object, location } => {
                format!("{} that is {}", object.render(), location.render())
            }
        }
    }
}

impl Location {
    pub fn render(&self) -> String {
        format!("{} {}", self.relation.phrase(), self.entity.render())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(size: Size, color: Color, form: Form) -> Object {
        Object::Leaf { size, color, form }
    }

    fn entity(q: Quantifier, o: Object) -> Entity {
        Entity {
            quantifier: q,
            object: o,
        }
    }

    #[test]
    fn test_take_render() {
        let cmd = Command {
            verb: Verb::Take,
            entity: Some(entity(
                Quantifier::The,
                leaf(Size::Any, Color::White, Form::Ball),
            )),
            location: None,
        };
        assert_eq!(cmd.render(), "take the white ball");
    }

    #[test]
    fn test_attachment_renders_differ() {
        // "put the white ball in a box on the floor" — both readings.
        let ball = leaf(Size::Any, Color::White, Form::Ball);
        let a_box = leaf(Size::Any, Color::Any, Form::Box);
        let floor = leaf(Size::Any, Color::Any, Form::Floor);
        let on_floor = Location {
            relation: Relation::OnTop,
            entity: Box::new(entity(Quantifier::The, floor)),
        };

        // Reading 1: the clause narrows the ball; destination is the floor.
        let reading1 = Command {
            verb: Verb::Move,
            entity: Some(entity(
                Quantifier::The,
                Object::Clause {
                    object: Box::new(ball.clone()),
                    location: Location {
                        relation: Relation::Inside,
                        entity: Box::new(entity(Quantifier::Any, a_box.clone())),
                    },
                },
            )),
            location: Some(on_floor.clone()),
        };

        // Reading 2: the clause narrows the box; destination is the box.
        let reading2 = Command {
            verb: Verb::Move,
            entity: Some(entity(Quantifier::The, ball)),
            location: Some(Location {
                relation: Relation::Inside,
                entity: Box::new(entity(
                    Quantifier::Any,
                    Object::Clause {
                        object: Box::new(a_box),
                        location: on_floor,
                    },
                )),
            }),
        };

        assert_eq!(
            reading1.render(),
            "move the white ball that is inside any box on top of the floor"
        );
        assert_eq!(
            reading2.render(),
            "move the white ball inside any box that is on top of the floor"
        );
        assert_ne!(reading1.render(), reading2.render());
    }

    #[test]
    fn test_head_descends_clauses() {
        let obj = Object::Clause {
            object: Box::new(leaf(Size::Small, Color::White, Form::Ball)),
            location: Location {
                relation: Relation::Inside,
                entity: Box::new(entity(
                    Quantifier::Any,
                    leaf(Size::Any, Color::Any, Form::Box),
                )),
            },
        };
        assert_eq!(obj.head(), (Size::Small, Color::White, Form::Ball));
    }
}
