//! Clarification dialogue: pending state between utterances.
//!
//! Two regimes suspend the pipeline with a question:
//!
//! - **Parse-level** — the grammar returned several readings; they are listed
//!   numbered (canonical "that is" rendering) and the next utterance may pick
//!   one by number.
//! - **Referent** — a "the" phrase matched several labels; the candidates are
//!   described minimally and the next utterance may name one.
//!
//! Exactly three slots persist between utterances: pending parses, pending
//! resolution, and the last prompt. A successful plan clears all three; a
//! fresh command discards whatever was pending.

use std::time::Duration;

use crate::describe;
use crate::goal::GoalSpec;
use crate::nl;
use crate::nl::command::Command;
use crate::types::{Label, Quantifier};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Session and slots
// ---------------------------------------------------------------------------

/// Which side of a placement command needed clarification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguousSide {
    Movable,
    Relatable,
}

/// A suspended interpretation: the compiled-but-ambiguous goal spec plus
/// which side the question was about.
#[derive(Debug, Clone)]
pub struct PendingResolution {
    pub spec: GoalSpec,
    pub side: AmbiguousSide,
}

impl PendingResolution {
    /// The candidate set the question was asked about.
    pub fn ambiguous_set(&self) -> &[Label] {
        match self.side {
            AmbiguousSide::Movable => &self.spec.movables,
            AmbiguousSide::Relatable => &self.spec.relatables,
        }
    }

    fn narrow(&mut self, subset: Vec<Label>, quant: Quantifier) {
        match self.side {
            AmbiguousSide::Movable => {
                self.spec.movables = subset;
                self.spec.movable_quant = quant;
            }
            AmbiguousSide::Relatable => {
                self.spec.relatables = subset;
                self.spec.relatable_quant = quant;
            }
        }
    }
}

/// The three persistent slots of the ambiguity manager.
#[derive(Debug, Clone, Default)]
pub struct ClarifySlots {
    pub pending_parses: Vec<Command>,
    pub pending_resolution: Option<PendingResolution>,
    pub prompt_text: Option<String>,
}

impl ClarifySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.pending_parses.clear();
        self.pending_resolution = None;
        self.prompt_text = None;
    }

    pub fn is_idle(&self) -> bool {
        self.pending_parses.is_empty() && self.pending_resolution.is_none()
    }
}

/// Per-session context: the live world plus dialogue state. No module-level
/// globals anywhere.
#[derive(Debug, Clone)]
pub struct Session {
    pub world: WorldState,
    pub clarify: ClarifySlots,
    /// Wall-clock budget handed to the planner per utterance.
    pub search_budget: Duration,
}

impl Session {
    pub fn new(world: WorldState) -> Self {
        Self {
            world,
            clarify: ClarifySlots::new(),
            search_budget: Duration::from_secs(5),
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Question for an ambiguous "the" phrase. Two distinguishable candidates are
/// offered by their minimal descriptions; larger or indistinguishable sets
/// fall back to a grouped count of the shared attributes.
pub fn referent_question(state: &WorldState, candidates: &[Label]) -> String {
    if candidates.len() == 2 {
        let a = describe::minimal_description(state, &candidates[0], candidates);
        let b = describe::minimal_description(state, &candidates[1], candidates);
        if a != b {
            return format!("Do you mean the {} or the {}?", a, b);
        }
    }
    format!(
        "There are {} {}s, which one do you mean?",
        candidates.len(),
        describe::shared_description(state, candidates)
    )
}

/// Question listing ambiguous parse readings, numbered.
pub fn parse_question(commands: &[Command]) -> String {
    let mut lines = vec!["I can understand this in more than one way:".to_string()];
    for (i, cmd) in commands.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, cmd.render()));
    }
    lines.push("Which one do you mean? Answer with a number.".to_string());
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Reply consumption
// ---------------------------------------------------------------------------

/// Result of offering an utterance to the pending-parse slot.
pub enum ParseReply {
    /// The utterance selected reading N; the slot is cleared.
    Selected(Command),
    /// Not a selection: the slot is cleared and the utterance is a fresh
    /// command.
    Fresh,
}

/// Consume a numbered reply against pending parses. Any utterance that does
/// not start with a valid reading number discards the pending parses.
pub fn take_parse_selection(slots: &mut ClarifySlots, input: &str) -> ParseReply {
    let count = slots.pending_parses.len();
    let choice = input
        .split_whitespace()
        .next()
        .and_then(|tok| tok.parse::<usize>().ok())
        .filter(|n| (1..=count).contains(n));

    match choice {
        Some(n) => {
            let cmd = slots.pending_parses[n - 1].clone();
            slots.pending_parses.clear();
            slots.prompt_text = None;
            ParseReply::Selected(cmd)
        }
        None => {
            slots.pending_parses.clear();
            slots.prompt_text = None;
            ParseReply::Fresh
        }
    }
}

/// Result of offering an utterance to the pending-resolution slot.
pub enum ClarifyReply {
    /// The reply narrowed the ambiguous side; planning can resume.
    Resolved(PendingResolution),
    /// The reply narrowed the set but it is still ambiguous; ask again.
    AskAgain(String),
    /// The reply named none of the offered candidates; the slot is kept and
    /// the original prompt repeats.
    NotAnOption(String),
    /// The reply is a full command; the slot is discarded.
    Fresh,
}

/// Consume a clarification reply against the pending resolution.
pub fn consume_clarification(
    slots: &mut ClarifySlots,
    state: &WorldState,
    input: &str,
) -> ClarifyReply {
    let prompt = slots.prompt_text.clone().unwrap_or_default();

    // A reply that parses as a complete command supersedes the question.
    if !nl::parse_commands(input).is_empty() {
        slots.clear();
        return ClarifyReply::Fresh;
    }

    let Some(entity) = nl::parse_entity_fragment(input) else {
        return ClarifyReply::NotAnOption(prompt);
    };

    let Some(mut pending) = slots.pending_resolution.clone() else {
        slots.clear();
        return ClarifyReply::Fresh;
    };
    let pool = pending.ambiguous_set().to_vec();

    let subset = match crate::resolve::resolve_object(state, &entity.object, &pool) {
        Ok(subset) => subset,
        Err(_) => return ClarifyReply::NotAnOption(prompt),
    };

    if entity.quantifier == Quantifier::The && subset.len() > 1 {
        // Narrower, but still not unique: keep the narrowed set pending and
        // ask a tighter question.
        pending.narrow(subset.clone(), Quantifier::The);
        let question = referent_question(state, &subset);
        slots.pending_resolution = Some(pending);
        slots.prompt_text = Some(question.clone());
        return ClarifyReply::AskAgain(question);
    }

    pending.narrow(subset, entity.quantifier);
    slots.pending_resolution = None;
    slots.prompt_text = None;
    ClarifyReply::Resolved(pending)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
