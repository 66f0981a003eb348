//! The command grammar and parse-tree extraction.
//!
//! ```text
//! Command  → take_verb Entity              ("take the ball")
//! Command  → move_verb it Location         ("put it on the floor")
//! Command  → move_verb Entity Location     ("put the ball in a box")
//! Entity   → quant Object
//! Object   → size? color? form
//! Object   → Object ("that" "is")? Location   (relative clause)
//! Location → rel Entity
//! ```
//!
//! The Object left recursion makes relative-clause attachment ambiguous by
//! design; the parser returns every reading and the dialogue layer asks.

use crate::nl::command::{Command, Entity, Location, Object, Verb};
use crate::nl::earley::{Grammar, ParseNode, Rule, Symbol};
use crate::nl::lexicon;
use crate::types::{Color, Form, Quantifier, Relation, Size};

// ---------------------------------------------------------------------------
// Grammar construction
// ---------------------------------------------------------------------------

fn nt(name: &'static str) -> Symbol {
    Symbol::NonTerminal(name)
}

fn t(category: &'static str) -> Symbol {
    Symbol::Terminal(category)
}

fn base_rules() -> Vec<Rule> {
    vec![
        Rule::weighted("Command", vec![t(lexicon::TAKE_VERB), nt("Entity")], 2.0),
        Rule::weighted(
            "Command",
            vec![t(lexicon::MOVE_VERB), t(lexicon::IT), nt("Location")],
            2.0,
        ),
        Rule::weighted(
            "Command",
            vec![t(lexicon::MOVE_VERB), nt("Entity"), nt("Location")],
            2.0,
        ),
        Rule::new("Entity", vec![t(lexicon::QUANT), nt("Object")]),
        Rule::new("Object", vec![t(lexicon::FORM)]),
        Rule::weighted("Object", vec![t(lexicon::SIZE), t(lexicon::FORM)], 1.1),
        Rule::weighted("Object", vec![t(lexicon::COLOR), t(lexicon::FORM)], 1.1),
        Rule::weighted(
            "Object",
            vec![t(lexicon::SIZE), t(lexicon::COLOR), t(lexicon::FORM)],
            1.2,
        ),
        // Relative clauses, with and without the explicit "that is" marker.
        Rule::weighted("Object", vec![nt("Object"), nt("Location")], 0.9),
        Rule::new(
            "Object",
            vec![nt("Object"), t(lexicon::THAT), t(lexicon::IS), nt("Location")],
        ),
        Rule::new("Location", vec![t(lexicon::REL), nt("Entity")]),
    ]
}

/// Grammar for full commands.
pub fn command_grammar() -> Grammar {
    Grammar::new("Command", base_rules())
}

/// Grammar for bare entity fragments — clarification replies like
/// "the black one".
pub fn entity_grammar() -> Grammar {
    Grammar::new("Entity", base_rules())
}

// ---------------------------------------------------------------------------
// Token → vocabulary mapping
// ---------------------------------------------------------------------------

fn quantifier_of(token: &str) -> Option<Quantifier> {
    match token {
        "the" => Some(Quantifier::The),
        "any" => Some(Quantifier::Any),
        "all" => Some(Quantifier::All),
        _ => None,
    }
}

fn size_of(token: &str) -> Option<Size> {
    match token {
        "small" => Some(Size::Small),
        "large" => Some(Size::Large),
        _ => None,
    }
}

fn color_of(token: &str) -> Option<Color> {
    match token {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "yellow" => Some(Color::Yellow),
        _ => None,
    }
}

fn form_of(token: &str) -> Option<Form> {
    match token {
        "ball" => Some(Form::Ball),
        "box" => Some(Form::Box),
        "brick" => Some(Form::Brick),
        "pyramid" => Some(Form::Pyramid),
        "plank" => Some(Form::Plank),
        "table" => Some(Form::Table),
        "floor" => Some(Form::Floor),
        "object" => Some(Form::Any),
        _ => None,
    }
}

fn relation_of(token: &str) -> Option<Relation> {
    match token {
        "leftof" => Some(Relation::LeftOf),
        "rightof" => Some(Relation::RightOf),
        "inside" => Some(Relation::Inside),
        "ontop" => Some(Relation::OnTop),
        "under" => Some(Relation::Under),
        "beside" => Some(Relation::Beside),
        "above" => Some(Relation::Above),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parse-tree extraction
// ---------------------------------------------------------------------------

/// Lower a raw parse tree into a Command. Returns None on any shape the
/// grammar cannot actually produce — a defensive guard, not a code path.
pub fn extract_command(tree: &ParseNode) -> Option<Command> {
    if tree.label() != "Command" {
        return None;
    }
    let children = tree.children();
    match children {
        [verb, entity] if verb.label() == lexicon::TAKE_VERB => Some(Command {
            verb: Verb::Take,
            entity: Some(extract_entity(entity)?),
            location: None,
        }),
        [verb, it, location]
            if verb.label() == lexicon::MOVE_VERB && it.label() == lexicon::IT =>
        {
            Some(Command {
                verb: Verb::Put,
                entity: None,
                location: Some(extract_location(location)?),
            })
        }
        [verb, entity, location] if verb.label() == lexicon::MOVE_VERB => Some(Command {
            verb: Verb::Move,
            entity: Some(extract_entity(entity)?),
            location: Some(extract_location(location)?),
        }),
        _ => None,
    }
}

/// Lower an Entity parse tree (also the start symbol for clarification
/// fragments).
pub fn extract_entity(tree: &ParseNode) -> Option<Entity> {
    if tree.label() != "Entity" {
        return None;
    }
    let [quant, object] = tree.children() else {
        return None;
    };
    Some(Entity {
        quantifier: quantifier_of(quant.token()?)?,
        object: extract_object(object)?,
    })
}

fn extract_object(tree: &ParseNode) -> Option<Object> {
    if tree.label() != "Object" {
        return None;
    }
    let children = tree.children();
    match children {
        [form] => Some(Object::Leaf {
            size: Size::Any,
            color: Color::Any,
            form: form_of(form.token()?)?,
        }),
        [attr, form] if attr.label() == lexicon::SIZE => Some(Object::Leaf {
            size: size_of(attr.token()?)?,
            color: Color::Any,
            form: form_of(form.token()?)?,
        }),
        [attr, form] if attr.label() == lexicon::COLOR => Some(Object::Leaf {
            size: Size::Any,
            color: color_of(attr.token()?)?,
            form: form_of(form.token()?)?,
        }),
        [size, color, form] if size.label() == lexicon::SIZE => Some(Object::Leaf {
            size: size_of(size.token()?)?,
            color: color_of(color.token()?)?,
            form: form_of(form.token()?)?,
        }),
        [object, location] => Some(Object::Clause {
            object: Box::new(extract_object(object)?),
            location: extract_location(location)?,
        }),
        [object, _that, _is, location] => Some(Object::Clause {
            object: Box::new(extract_object(object)?),
            location: extract_location(location)?,
        }),
        _ => None,
    }
}

fn extract_location(tree: &ParseNode) -> Option<Location> {
    if tree.label() != "Location" {
        return None;
    }
    let [rel, entity] = tree.children() else {
        return None;
    };
    Some(Location {
        relation: relation_of(rel.token()?)?,
        entity: Box::new(extract_entity(entity)?),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
