//! World fixtures: named starting worlds loaded from YAML.
//!
//! A fixture file carries the raw stacks, arm position, optional held label,
//! and the object definitions. Loading validates the result into a
//! `WorldState`: every stacked label must be defined, labels are unique, the
//! arm is in range, and the floor sentinel never appears as an object.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::types::{EngineError, Label, ObjectDef, Result, FLOOR};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// YAML-deserialisable fixture structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldFixture {
    /// Columns of labels, bottom to top.
    pub stacks: Vec<Vec<Label>>,
    /// Arm column index.
    #[serde(default)]
    pub arm: usize,
    /// Label currently in the gripper, if any.
    #[serde(default)]
    pub holding: Option<Label>,
    /// Label → attribute record.
    pub objects: HashMap<Label, ObjectDef>,
}

// ---------------------------------------------------------------------------
// Embedded fixtures
// ---------------------------------------------------------------------------

/// The two-object demonstration world.
pub const SMALL_WORLD: &str = include_str!("../data/worlds/small.yaml");

/// A richer world exercising every form and both sizes.
pub const MEDIUM_WORLD: &str = include_str!("../data/worlds/medium.yaml");

/// Look up an embedded fixture by name.
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "small" => Some(SMALL_WORLD),
        "medium" => Some(MEDIUM_WORLD),
        _ => None,
    }
}

pub fn builtin_names() -> &'static [&'static str] {
    &["small", "medium"]
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse and validate a fixture from YAML text.
pub fn load_str(yaml: &str) -> Result<WorldState> {
    let fixture: WorldFixture = serde_yaml::from_str(yaml)
        .map_err(|e| EngineError::Fixture(format!("cannot parse: {}", e)))?;
    validate(fixture)
}

/// Parse and validate a fixture from a file on disk.
pub fn load_file(path: &Path) -> Result<WorldState> {
    let yaml = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Fixture(format!("cannot read {}: {}", path.display(), e)))?;
    load_str(&yaml)
}

fn validate(fixture: WorldFixture) -> Result<WorldState> {
    if fixture.stacks.is_empty() {
        return Err(EngineError::Fixture("world needs at least one column".into()));
    }
    if fixture.arm >= fixture.stacks.len() {
        return Err(EngineError::Fixture(format!(
            "arm at column {} but world has {} columns",
            fixture.arm,
            fixture.stacks.len()
        )));
    }
    if fixture.objects.contains_key(FLOOR) {
        return Err(EngineError::Fixture(
            "the floor is built in and cannot be defined as an object".into(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    let placed = fixture
        .stacks
        .iter()
        .flatten()
        .chain(fixture.holding.iter());
    for label in placed {
        if label == FLOOR {
            return Err(EngineError::Fixture("the floor cannot be stacked".into()));
        }
        if !fixture.objects.contains_key(label) {
            return Err(EngineError::Fixture(format!("unknown label '{}'", label)));
        }
        if !seen.insert(label.clone()) {
            return Err(EngineError::Fixture(format!("duplicate label '{}'", label)));
        }
    }

    Ok(WorldState::new(
        fixture.stacks,
        fixture.arm,
        fixture.holding,
        Arc::new(fixture.objects),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
