use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Labels — the "currency" of the world model
// ---------------------------------------------------------------------------

/// Opaque identifier naming an object in the world.
pub type Label = String;

/// The ground sentinel. Never movable, never stored in a stack.
pub const FLOOR: &str = "floor";

// ---------------------------------------------------------------------------
// Object attributes
// ---------------------------------------------------------------------------

/// Geometric form of an object. `Any` is the wildcard used in descriptions
/// ("take an object"); world objects always carry a concrete form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    Ball,
    Box,
    Brick,
    Pyramid,
    Plank,
    Table,
    Floor,
    #[serde(rename = "anyform")]
    Any,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ball => write!(f, "ball"),
            Self::Box => write!(f, "box"),
            Self::Brick => write!(f, "brick"),
            Self::Pyramid => write!(f, "pyramid"),
            Self::Plank => write!(f, "plank"),
            Self::Table => write!(f, "table"),
            Self::Floor => write!(f, "floor"),
            Self::Any => write!(f, "object"),
        }
    }
}

/// Object size. `Any` means unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Large,
    #[serde(rename = "unspecified")]
    Any,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Large => write!(f, "large"),
            Self::Any => write!(f, "any size"),
        }
    }
}

/// Object color, drawn from a fixed palette. `Any` means unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
    #[serde(rename = "unspecified")]
    Any,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "black"),
            Self::White => write!(f, "white"),
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
            Self::Yellow => write!(f, "yellow"),
            Self::Any => write!(f, "any color"),
        }
    }
}

/// Immutable attribute record for one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDef {
    pub form: Form,
    #[serde(default = "any_size")]
    pub size: Size,
    #[serde(default = "any_color")]
    pub color: Color,
}

fn any_size() -> Size {
    Size::Any
}

fn any_color() -> Color {
    Color::Any
}

impl ObjectDef {
    pub fn new(form: Form, size: Size, color: Color) -> Self {
        Self { form, size, color }
    }

    /// The fixed definition of the ground.
    pub const FLOOR_DEF: ObjectDef = ObjectDef {
        form: Form::Floor,
        size: Size::Any,
        color: Color::Any,
    };
}

// ---------------------------------------------------------------------------
// Spatial relations and quantifiers — the goal vocabulary
// ---------------------------------------------------------------------------

/// Spatial relation between two objects, plus the unary `Holding`.
/// The display names appear verbatim in literals and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    LeftOf,
    RightOf,
    Inside,
    OnTop,
    Under,
    Beside,
    Above,
    Holding,
}

impl Relation {
    /// English surface form, for rendering commands back to the user.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::LeftOf => "left of",
            Self::RightOf => "right of",
            Self::Inside => "inside",
            Self::OnTop => "on top of",
            Self::Under => "under",
            Self::Beside => "beside",
            Self::Above => "above",
            Self::Holding => "holding",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftOf => write!(f, "leftof"),
            Self::RightOf => write!(f, "rightof"),
            Self::Inside => write!(f, "inside"),
            Self::OnTop => write!(f, "ontop"),
            Self::Under => write!(f, "under"),
            Self::Beside => write!(f, "beside"),
            Self::Above => write!(f, "above"),
            Self::Holding => write!(f, "holding"),
        }
    }
}

/// Noun-phrase quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// Unique referent; more than one match triggers a clarification dialogue.
    The,
    /// Existential: any one match will do.
    Any,
    /// Universal: every match.
    All,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::The => write!(f, "the"),
            Self::Any => write!(f, "any"),
            Self::All => write!(f, "all"),
        }
    }
}

// ---------------------------------------------------------------------------
// Literals and DNF goals
// ---------------------------------------------------------------------------

/// A relation-plus-arguments claim. `Holding` takes one argument, every
/// other relation takes two. Goals only ever use positive polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub polarity: bool,
    pub rel: Relation,
    pub args: Vec<Label>,
}

impl Literal {
    /// Unary `holding(x)`.
    pub fn holding(x: impl Into<Label>) -> Self {
        Self {
            polarity: true,
            rel: Relation::Holding,
            args: vec![x.into()],
        }
    }

    /// Binary `rel(a, b)`.
    pub fn binary(rel: Relation, a: impl Into<Label>, b: impl Into<Label>) -> Self {
        Self {
            polarity: true,
            rel,
            args: vec![a.into(), b.into()],
        }
    }

    pub fn first(&self) -> &Label {
        &self.args[0]
    }

    pub fn second(&self) -> Option<&Label> {
        self.args.get(1)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.polarity {
            write!(f, "-")?;
        }
        write!(f, "{}({})", self.rel, self.args.join(","))
    }
}

/// A conjunction of literals: all must hold simultaneously.
pub type Conjunction = Vec<Literal>;

/// Goal formula in disjunctive normal form: the planner may satisfy any one
/// conjunction. A single empty conjunction is universally true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnfGoal {
    pub conjunctions: Vec<Conjunction>,
}

impl DnfGoal {
    pub fn new(conjunctions: Vec<Conjunction>) -> Self {
        Self { conjunctions }
    }

    pub fn is_empty(&self) -> bool {
        self.conjunctions.is_empty()
    }
}

impl fmt::Display for DnfGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .conjunctions
            .iter()
            .map(|conj| {
                let lits: Vec<String> = conj.iter().map(|l| l.to_string()).collect();
                format!("({})", lits.join(" & "))
            })
            .collect();
        write!(f, "{}", rendered.join(" | "))
    }
}

// ---------------------------------------------------------------------------
// Primitive actions and plan items
// ---------------------------------------------------------------------------

/// A primitive arm action. The single-character tokens are the wire alphabet
/// the executor consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Pick,
    Drop,
}

impl Action {
    pub fn token(&self) -> char {
        match self {
            Self::Left => 'l',
            Self::Right => 'r',
            Self::Pick => 'p',
            Self::Drop => 'd',
        }
    }

    /// Parse a single-character action token.
    pub fn from_token(c: char) -> Option<Self> {
        match c {
            'l' => Some(Self::Left),
            'r' => Some(Self::Right),
            'p' => Some(Self::Pick),
            'd' => Some(Self::Drop),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// One element of a finished plan: either a primitive action token or a
/// free-form narration line. The executor treats non-tokens as narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanItem {
    Act(Action),
    Say(String),
}

impl fmt::Display for PlanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Act(a) => write!(f, "{}", a),
            Self::Say(s) => write!(f, "{}", s),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Every failure an utterance can produce. The display strings are the exact
/// user-visible messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Sorry I cannot understand this, please try again.")]
    CannotUnderstand,

    /// Resolution came back empty; carries the description of what is missing.
    #[error("There is no {0}.")]
    NoMatch(String),

    /// Quantifier infeasibility or a physics rule violated by the goal.
    /// Carries the full rule-specific message.
    #[error("{0}")]
    BadGoal(String),

    /// Goal construction produced an empty formula for no nameable reason.
    #[error("I cannot do that.")]
    NothingToDo,

    #[error("I cannot figure this out in the time I have.")]
    OutOfTime,

    /// Clarification reply did not name one of the offered referents.
    /// Carries the original prompt so it can be repeated.
    #[error("That was not one of the options I asked for. {0}")]
    NotAnOption(String),

    #[error("world fixture error: {0}")]
    Fixture(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
