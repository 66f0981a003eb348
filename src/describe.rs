//! Minimal distinguishing descriptions.
//!
//! Given a label and a pool of candidates, find the shortest attribute
//! combination — (form), (color, form), (size, form), (size, color, form) —
//! that picks the label out of the pool uniquely. Used by resolution error
//! messages, clarification prompts, and pickup narration.

use crate::types::{Color, Form, Label, Size, FLOOR};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Pattern rendering
// ---------------------------------------------------------------------------

/// Render a description pattern, listing only the attributes it specifies.
/// An unspecified form renders as "object": "small white ball", "white object".
pub fn pattern_description(size: Size, color: Color, form: Form) -> String {
    let mut parts = Vec::new();
    if size != Size::Any {
        parts.push(size.to_string());
    }
    if color != Color::Any {
        parts.push(color.to_string());
    }
    parts.push(form.to_string());
    parts.join(" ")
}

// ---------------------------------------------------------------------------
// Minimal distinguishing description
// ---------------------------------------------------------------------------

/// The attribute tuples tried, shortest first.
#[derive(Clone, Copy)]
struct AttrMask {
    size: bool,
    color: bool,
}

const MASKS: [AttrMask; 4] = [
    AttrMask { size: false, color: false },
    AttrMask { size: false, color: true },
    AttrMask { size: true, color: false },
    AttrMask { size: true, color: true },
];

fn render(state: &WorldState, label: &str, mask: AttrMask) -> String {
    let def = state.definition(label);
    let mut parts = Vec::new();
    if mask.size && def.size != Size::Any {
        parts.push(def.size.to_string());
    }
    if mask.color && def.color != Color::Any {
        parts.push(def.color.to_string());
    }
    parts.push(def.form.to_string());
    parts.join(" ")
}

/// The shortest description of `label` that no other label in `pool` shares.
/// Falls back to the full (size, color, form) rendering when even that is
/// not unique.
pub fn minimal_description(state: &WorldState, label: &str, pool: &[Label]) -> String {
    if label == FLOOR {
        return "floor".to_string();
    }
    for mask in MASKS {
        let candidate = render(state, label, mask);
        let unique = pool
            .iter()
            .filter(|other| other.as_str() != label)
            .all(|other| render(state, other, mask) != candidate);
        if unique {
            return candidate;
        }
    }
    render(state, label, MASKS[3])
}

/// The attributes shared by every label in the pool, rendered as a
/// description. Used for grouped clarification prompts ("there are 3 boxes").
pub fn shared_description(state: &WorldState, pool: &[Label]) -> String {
    let first = state.definition(pool[0].as_str());
    let mut size = first.size;
    let mut color = first.color;
    let mut form = first.form;
    for label in &pool[1..] {
        let def = state.definition(label.as_str());
        if def.size != size {
            size = Size::Any;
        }
        if def.color != color {
            color = Color::Any;
        }
        if def.form != form {
            form = Form::Any;
        }
    }
    pattern_description(size, color, form)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
