//! Grammar front-end: English utterances → command trees.
//!
//! Operates in three stages:
//!
//! 1. **Normalization** — case fold, punctuation strip, multi-word relation
//!    phrases, plural folding, synonym mapping (`normalize`)
//! 2. **Chart parsing** — Earley parse over the closed command grammar
//!    (`earley`, `grammar`, `lexicon`)
//! 3. **Extraction** — parse trees lowered into Command/Entity/Object/
//!    Location nodes (`command`, `grammar`)
//!
//! An utterance may legitimately yield several command trees (relative-clause
//! attachment); callers surface the choice to the user.

pub mod command;
pub mod earley;
pub mod grammar;
pub mod lexicon;
pub mod normalize;

use command::{Command, Entity};

/// Parse an utterance into every distinct command reading, best-ranked first.
/// Readings that render identically are collapsed.
pub fn parse_commands(input: &str) -> Vec<Command> {
    let tokens = normalize::normalize(input);
    let parses = earley::parse(&grammar::command_grammar(), &tokens, lexicon::lexicon());

    let mut seen = std::collections::HashSet::new();
    let mut commands = Vec::new();
    for parse in &parses {
        if let Some(cmd) = grammar::extract_command(&parse.tree) {
            if seen.insert(cmd.render()) {
                commands.push(cmd);
            }
        }
    }
    commands
}

/// Parse a clarification reply as a bare entity fragment ("the black one").
/// Returns None when the reply is not an entity at all.
pub fn parse_entity_fragment(input: &str) -> Option<Entity> {
    let tokens = normalize::normalize(input);
    let parses = earley::parse(&grammar::entity_grammar(), &tokens, lexicon::lexicon());
    parses
        .first()
        .and_then(|p| grammar::extract_entity(&p.tree))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
