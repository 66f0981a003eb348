//! End-to-end utterance scenarios against the reference worlds.

use std::collections::HashMap;
use std::sync::Arc;

use gantry::dialogue::Session;
use gantry::fixtures;
use gantry::pipeline::{execute, process_utterance, Outcome};
use gantry::types::{Action, Color, Form, ObjectDef, PlanItem, Size};
use gantry::world::WorldState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// col0=[e: large yellow box], col1=[], col2=[a: small white ball].
fn small_session() -> Session {
    Session::new(fixtures::load_str(fixtures::SMALL_WORLD).unwrap())
}

/// col0=[e: large yellow box], col1=[a: small white ball],
/// col2=[b: small black ball].
fn two_ball_session() -> Session {
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
    Session::new(WorldState::new(
        vec![vec!["e".into()], vec!["a".into()], vec!["b".into()]],
        0,
        None,
        Arc::new(m),
    ))
}

fn plan_of(outcome: Outcome) -> Vec<PlanItem> {
    match outcome {
        Outcome::Plan(items) => items,
        other => panic!("expected a plan, got {:?}", other),
    }
}

fn question_of(outcome: Outcome) -> String {
    match outcome {
        Outcome::Clarify(q) => q,
        other => panic!("expected a question, got {:?}", other),
    }
}

fn failure_of(outcome: Outcome) -> String {
    match outcome {
        Outcome::Failure(m) => m,
        other => panic!("expected a failure, got {:?}", other),
    }
}

fn actions_of(plan: &[PlanItem]) -> Vec<Action> {
    plan.iter()
        .filter_map(|i| match i {
            PlanItem::Act(a) => Some(*a),
            PlanItem::Say(_) => None,
        })
        .collect()
}

fn sorted_labels(world: &WorldState) -> Vec<String> {
    let mut labels = world.labels();
    labels.sort();
    labels
}

/// Check the post-utterance invariants: physics of every adjacency, label
/// conservation, arm in range.
fn assert_invariants(world: &WorldState, before: &[String]) {
    world.check_invariants().unwrap();
    assert_eq!(sorted_labels(world), before, "labels not conserved");
    for (col, stack) in world.stacks.iter().enumerate() {
        for pair in stack.windows(2) {
            let lower = &pair[0];
            let upper = &pair[1];
            let ok = gantry::physics::permits(
                world,
                upper,
                lower,
                gantry::types::Relation::OnTop,
            ) || gantry::physics::permits(
                world,
                upper,
                lower,
                gantry::types::Relation::Inside,
            );
            assert!(ok, "illegal support {} on {} in column {}", upper, lower, col);
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario 1: take the ball
// ---------------------------------------------------------------------------

#[test]
fn scenario_take_the_ball() {
    let mut s = small_session();
    let plan = plan_of(process_utterance(&mut s, "take the ball"));
    assert_eq!(
        plan,
        vec![
            PlanItem::Act(Action::Right),
            PlanItem::Act(Action::Right),
            PlanItem::Say("Moving the ball".to_string()),
            PlanItem::Act(Action::Pick),
        ],
        "one ball in play, so the description omits the color"
    );
}

// ---------------------------------------------------------------------------
// Scenario 2: put the ball inside the yellow box
// ---------------------------------------------------------------------------

#[test]
fn scenario_ball_into_yellow_box() {
    let mut s = small_session();
    let before = sorted_labels(&s.world);
    let plan = plan_of(process_utterance(
        &mut s,
        "put the ball inside the yellow box",
    ));
    assert_eq!(
        actions_of(&plan),
        vec![
            Action::Right,
            Action::Right,
            Action::Pick,
            Action::Left,
            Action::Left,
            Action::Drop,
        ]
    );
    assert!(execute(&mut s.world, &plan));
    assert_invariants(&s.world, &before);
    assert_eq!(s.world.stacks[0], vec!["e".to_string(), "a".to_string()]);
}

// ---------------------------------------------------------------------------
// Scenario 3: already true
// ---------------------------------------------------------------------------

#[test]
fn scenario_already_on_the_floor() {
    let mut s = small_session();
    let plan = plan_of(process_utterance(&mut s, "put the ball on the floor"));
    assert_eq!(
        plan,
        vec![PlanItem::Say("That is already true!".to_string())]
    );
    // Idempotence: nothing to execute, the world is untouched.
    assert!(actions_of(&plan).is_empty());
}

// ---------------------------------------------------------------------------
// Scenario 4: referent clarification
// ---------------------------------------------------------------------------

#[test]
fn scenario_which_ball() {
    let mut s = two_ball_session();
    let question = question_of(process_utterance(&mut s, "take the ball"));
    assert_eq!(question, "Do you mean the white ball or the black ball?");

    // The reply resumes planning with the black ball.
    let plan = plan_of(process_utterance(&mut s, "the black one"));
    assert!(plan.contains(&PlanItem::Say("Moving the black ball".to_string())));
    let actions = actions_of(&plan);
    assert_eq!(
        actions,
        vec![Action::Right, Action::Right, Action::Pick]
    );
    assert!(s.clarify.is_idle(), "successful plan clears pending state");
}

#[test]
fn scenario_clarification_reply_not_an_option() {
    let mut s = two_ball_session();
    let question = question_of(process_utterance(&mut s, "take the ball"));
    let message = failure_of(process_utterance(&mut s, "the red one"));
    assert_eq!(
        message,
        format!("That was not one of the options I asked for. {}", question)
    );
    // The question is still pending, so a proper answer now works.
    let plan = plan_of(process_utterance(&mut s, "the white one"));
    assert!(plan.contains(&PlanItem::Say("Moving the white ball".to_string())));
}

#[test]
fn scenario_fresh_command_discards_question() {
    let mut s = two_ball_session();
    let _ = question_of(process_utterance(&mut s, "take the ball"));
    let plan = plan_of(process_utterance(&mut s, "take the yellow box"));
    assert_eq!(actions_of(&plan), vec![Action::Pick]);
    assert!(s.clarify.is_idle());
}

// ---------------------------------------------------------------------------
// Scenario 5: quantifier infeasibility
// ---------------------------------------------------------------------------

#[test]
fn scenario_all_balls_into_one_box() {
    let mut s = two_ball_session();
    let message = failure_of(process_utterance(
        &mut s,
        "put all balls in the yellow box",
    ));
    assert_eq!(message, "A box can only fit one object.");
}

// ---------------------------------------------------------------------------
// Scenario 6: parse-level clarification
// ---------------------------------------------------------------------------

#[test]
fn scenario_ambiguous_attachment() {
    let mut s = small_session();
    let question = question_of(process_utterance(
        &mut s,
        "put the white ball in a box on the floor",
    ));
    assert!(question.contains("1. "), "readings are numbered: {}", question);
    assert!(question.contains("2. "));
    assert!(question.contains("that is"));

    // Pick the reading whose destination is the box.
    let choice = if question
        .lines()
        .find(|l| l.trim_start().starts_with("1."))
        .unwrap()
        .contains("inside any box that is")
    {
        "1"
    } else {
        "2"
    };
    let plan = plan_of(process_utterance(&mut s, choice));
    assert_eq!(
        actions_of(&plan),
        vec![
            Action::Right,
            Action::Right,
            Action::Pick,
            Action::Left,
            Action::Left,
            Action::Drop,
        ]
    );
}

#[test]
fn scenario_non_numeric_reply_is_fresh_command() {
    let mut s = small_session();
    let _ = question_of(process_utterance(
        &mut s,
        "put the white ball in a box on the floor",
    ));
    // Not a number: pending parses are discarded, the reply stands alone.
    let message = failure_of(process_utterance(&mut s, "never mind"));
    assert_eq!(message, "Sorry I cannot understand this, please try again.");
    assert!(s.clarify.is_idle());
}

// ---------------------------------------------------------------------------
// Cross-cutting properties
// ---------------------------------------------------------------------------

#[test]
fn invariants_hold_across_a_conversation() {
    let mut s = Session::new(fixtures::load_str(fixtures::MEDIUM_WORLD).unwrap());
    let before = sorted_labels(&s.world);
    let utterances = [
        "take the small red brick",
        "put it on the green plank",
        "put the white ball on the floor",
        "move the small red brick inside the small red box",
    ];
    for utterance in utterances {
        match process_utterance(&mut s, utterance) {
            Outcome::Plan(plan) => {
                assert!(execute(&mut s.world, &plan), "illegal plan for {}", utterance);
                assert_invariants(&s.world, &before);
            }
            Outcome::Clarify(q) => panic!("unexpected question for {}: {}", utterance, q),
            Outcome::Failure(m) => panic!("unexpected failure for {}: {}", utterance, m),
        }
    }
}

#[test]
fn replanning_a_satisfied_goal_is_empty() {
    let mut s = small_session();
    let plan = plan_of(process_utterance(
        &mut s,
        "put the ball inside the yellow box",
    ));
    execute(&mut s.world, &plan);
    let plan = plan_of(process_utterance(
        &mut s,
        "put the ball inside the yellow box",
    ));
    assert_eq!(
        plan,
        vec![PlanItem::Say("That is already true!".to_string())]
    );
}

#[test]
fn errors_leave_world_untouched() {
    let mut s = small_session();
    let snapshot = s.world.clone();
    let _ = failure_of(process_utterance(&mut s, "take the red pyramid"));
    let _ = failure_of(process_utterance(&mut s, "blorp"));
    assert_eq!(s.world, snapshot);
}

#[test]
fn planning_does_not_mutate_live_world() {
    let mut s = small_session();
    let snapshot = s.world.clone();
    let _ = plan_of(process_utterance(&mut s, "take the ball"));
    // The plan was produced but not executed.
    assert_eq!(s.world, snapshot);
}
