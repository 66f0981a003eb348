//! The per-utterance pipeline: the single entry point for all planning.
//!
//! parse → resolve → goal-compile → search → narrate, with two suspension
//! points: parse-level ambiguity (several grammatical readings) and referent
//! ambiguity (a "the" phrase matching several objects). Suspension returns a
//! question to the host loop; the next utterance may answer it or supersede
//! it. Planning never mutates the live world — execution does, after the
//! plan comes back.

use crate::dialogue::{
    self, AmbiguousSide, ClarifyReply, ParseReply, PendingResolution, Session,
};
use crate::goal::{self, GoalSpec};
use crate::narrate;
use crate::nl::{self, command::Command, command::Verb};
use crate::resolve;
use crate::search;
use crate::types::{
    Color, EngineError, Form, PlanItem, Quantifier, Result, Size, FLOOR,
};
use crate::world::WorldState;

// ---------------------------------------------------------------------------
// Outcome — what one utterance produces
// ---------------------------------------------------------------------------

/// The host renders exactly one of these per utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A finished plan: action tokens interleaved with narration.
    Plan(Vec<PlanItem>),
    /// A clarification question; the pipeline is suspended.
    Clarify(String),
    /// A user-visible error message.
    Failure(String),
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Process one utterance against the session: consume pending clarifications
/// first, otherwise parse and plan a fresh command.
pub fn process_utterance(session: &mut Session, input: &str) -> Outcome {
    // 1. A pending parse choice swallows a leading number.
    if !session.clarify.pending_parses.is_empty() {
        match dialogue::take_parse_selection(&mut session.clarify, input) {
            ParseReply::Selected(cmd) => return run_command(session, cmd),
            ParseReply::Fresh => {} // discarded; fall through to fresh parse
        }
    }
    // 2. A pending referent question tries to consume the reply.
    else if session.clarify.pending_resolution.is_some() {
        match dialogue::consume_clarification(&mut session.clarify, &session.world, input) {
            ClarifyReply::Resolved(pending) => return plan_goal(session, pending.spec),
            ClarifyReply::AskAgain(question) => return Outcome::Clarify(question),
            ClarifyReply::NotAnOption(prompt) => {
                return Outcome::Failure(EngineError::NotAnOption(prompt).to_string())
            }
            ClarifyReply::Fresh => {} // superseded; fall through
        }
    }

    // 3. Fresh command.
    let mut commands = nl::parse_commands(input);
    if commands.is_empty() {
        return Outcome::Failure(EngineError::CannotUnderstand.to_string());
    }

    if commands.len() == 1 {
        return run_command(session, commands.remove(0));
    }

    // Several readings: if every one of them fails interpretation anyway,
    // surface the first failure; otherwise ask which reading was meant.
    let interpretations: Vec<Result<GoalSpec>> = commands
        .iter()
        .map(|cmd| interpret(&session.world, cmd))
        .collect();
    if interpretations.iter().all(|r| r.is_err()) {
        let first = interpretations
            .iter()
            .find_map(|r| r.as_ref().err())
            .map(|e| e.to_string())
            .unwrap_or_else(|| EngineError::CannotUnderstand.to_string());
        return Outcome::Failure(first);
    }

    let question = dialogue::parse_question(&commands);
    session.clarify.pending_parses = commands;
    session.clarify.prompt_text = Some(question.clone());
    Outcome::Clarify(question)
}

/// Apply a finished plan's actions to the live world. Narration items pass
/// through untouched. Returns false if an action was structurally illegal
/// (which a planner-produced plan never is).
pub fn execute(world: &mut WorldState, plan: &[PlanItem]) -> bool {
    for item in plan {
        if let PlanItem::Act(action) = item {
            if !world.apply(*action) {
                return false;
            }
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Interpretation: command tree → goal spec
// ---------------------------------------------------------------------------

fn run_command(session: &mut Session, cmd: Command) -> Outcome {
    match interpret(&session.world, &cmd) {
        Ok(spec) => plan_goal(session, spec),
        Err(e) => Outcome::Failure(e.to_string()),
    }
}

/// Resolve a command's noun phrases into a goal specification.
fn interpret(state: &WorldState, cmd: &Command) -> Result<GoalSpec> {
    match cmd.verb {
        Verb::Take => {
            let entity = cmd.entity.as_ref().ok_or(EngineError::CannotUnderstand)?;
            let movables = resolve_movables(state, entity)?;
            Ok(GoalSpec::pickup(
                movables,
                entity.quantifier,
                entity.object.head(),
            ))
        }
        Verb::Put => {
            let location = cmd.location.as_ref().ok_or(EngineError::CannotUnderstand)?;
            let held = state.holding.clone().ok_or_else(|| {
                EngineError::BadGoal("I am not holding anything.".to_string())
            })?;
            let relatables = resolve::resolve_entity(state, &location.entity)?;
            Ok(GoalSpec {
                movables: vec![held],
                movable_quant: Quantifier::The,
                movable_head: (Size::Any, Color::Any, Form::Any),
                relation: Some(location.relation),
                relatables,
                relatable_quant: location.entity.quantifier,
                relatable_head: location.entity.object.head(),
            })
        }
        Verb::Move => {
            let entity = cmd.entity.as_ref().ok_or(EngineError::CannotUnderstand)?;
            let location = cmd.location.as_ref().ok_or(EngineError::CannotUnderstand)?;
            let movables = resolve_movables(state, entity)?;
            let relatables = resolve::resolve_entity(state, &location.entity)?;
            Ok(GoalSpec {
                movables,
                movable_quant: entity.quantifier,
                movable_head: entity.object.head(),
                relation: Some(location.relation),
                relatables,
                relatable_quant: location.entity.quantifier,
                relatable_head: location.entity.object.head(),
            })
        }
    }
}

/// Resolve the movable side; the floor is never movable.
fn resolve_movables(
    state: &WorldState,
    entity: &nl::command::Entity,
) -> Result<Vec<String>> {
    let mut labels = resolve::resolve_entity(state, entity)?;
    labels.retain(|l| l != FLOOR);
    if labels.is_empty() {
        return Err(EngineError::BadGoal("I cannot move the floor.".to_string()));
    }
    Ok(labels)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Check for referent ambiguity, then compile, search, and narrate.
fn plan_goal(session: &mut Session, spec: GoalSpec) -> Outcome {
    if let Some(pending) = referent_ambiguity(&spec) {
        let question = dialogue::referent_question(&session.world, pending.ambiguous_set());
        session.clarify.pending_resolution = Some(pending);
        session.clarify.prompt_text = Some(question.clone());
        return Outcome::Clarify(question);
    }

    let goal = match goal::compile(&spec, &session.world) {
        Ok(goal) => goal,
        Err(e) => return Outcome::Failure(e.to_string()),
    };
    let actions = match search::plan(&session.world, &goal, session.search_budget) {
        Ok(actions) => actions,
        Err(e) => return Outcome::Failure(e.to_string()),
    };

    let plan = narrate::narrate(&actions, &session.world);
    session.clarify.clear();
    Outcome::Plan(plan)
}

/// A "the" side matching several labels suspends planning. The movable side
/// is asked about first.
fn referent_ambiguity(spec: &GoalSpec) -> Option<PendingResolution> {
    if spec.movable_quant == Quantifier::The && spec.movables.len() > 1 {
        return Some(PendingResolution {
            spec: spec.clone(),
            side: AmbiguousSide::Movable,
        });
    }
    if spec.relation.is_some()
        && spec.relatable_quant == Quantifier::The
        && spec.relatables.len() > 1
    {
        return Some(PendingResolution {
            spec: spec.clone(),
            side: AmbiguousSide::Relatable,
        });
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
