//! The closed lexicon: canonical tokens → grammar terminal categories.
//!
//! Classification runs after normalization, so every entry here is a
//! canonical vocabulary word. A token may belong to several categories
//! ("floor" is a form; "all" is only a quantifier), and the Earley parser
//! tries each.

use std::sync::OnceLock;

use crate::nl::earley::TokenClassifier;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub const TAKE_VERB: &str = "take_verb";
pub const MOVE_VERB: &str = "move_verb";
pub const IT: &str = "it";
pub const QUANT: &str = "quant";
pub const SIZE: &str = "size";
pub const COLOR: &str = "color";
pub const FORM: &str = "form";
pub const REL: &str = "rel";
pub const THAT: &str = "that";
pub const IS: &str = "is";

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Static classifier over the closed command vocabulary.
pub struct Lexicon;

impl TokenClassifier for Lexicon {
    fn classify(&self, token: &str) -> Vec<String> {
        let mut cats: Vec<&str> = Vec::new();
        match token {
            "take" => cats.push(TAKE_VERB),
            "put" | "move" | "drop" => cats.push(MOVE_VERB),
            "it" => cats.push(IT),
            "the" | "any" | "all" => cats.push(QUANT),
            "small" | "large" => cats.push(SIZE),
            "black" | "white" | "red" | "green" | "blue" | "yellow" => cats.push(COLOR),
            "ball" | "box" | "brick" | "pyramid" | "plank" | "table" | "object" | "floor" => {
                cats.push(FORM)
            }
            "leftof" | "rightof" | "inside" | "ontop" | "under" | "beside" | "above" => {
                cats.push(REL)
            }
            "that" => cats.push(THAT),
            "is" => cats.push(IS),
            _ => {}
        }
        cats.into_iter().map(str::to_string).collect()
    }
}

/// The shared lexicon instance.
pub fn lexicon() -> &'static Lexicon {
    static LEX: OnceLock<Lexicon> = OnceLock::new();
    LEX.get_or_init(|| Lexicon)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
