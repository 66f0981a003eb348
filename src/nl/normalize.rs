//! Text normalization for the grammar front-end.
//!
//! Pipeline: raw input → case fold → strip punctuation → canonicalize
//! multi-word relation phrases → fold plurals → map synonyms into the closed
//! vocabulary. All pure string transforms over a fixed word list.
//!
//! After normalization every surviving token is either a canonical vocabulary
//! word (verb, quantifier, size, color, form, relation, clause marker) or an
//! unknown word that will fail classification downstream.

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a raw utterance into canonical tokens.
pub fn normalize(input: &str) -> Vec<String> {
    let folded = input.to_lowercase();
    let words: Vec<String> = folded
        .split_whitespace()
        .map(strip_punctuation)
        .filter(|w| !w.is_empty())
        .collect();
    let phrased = fold_phrases(&words);
    phrased.iter().map(|w| canonical_word(w)).collect()
}

/// Strip leading/trailing punctuation from a word.
fn strip_punctuation(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_string()
}

// ---------------------------------------------------------------------------
// Multi-word phrase folding
// ---------------------------------------------------------------------------

/// Phrases that collapse to a single canonical token. Longest first so that
/// "to the left of" wins over "left of".
const PHRASES: &[(&[&str], &str)] = &[
    (&["to", "the", "left", "of"], "leftof"),
    (&["to", "the", "right", "of"], "rightof"),
    (&["on", "top", "of"], "ontop"),
    (&["left", "of"], "leftof"),
    (&["right", "of"], "rightof"),
    (&["next", "to"], "beside"),
    (&["inside", "of"], "inside"),
    (&["pick", "up"], "take"),
];

fn fold_phrases(words: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(words.len());
    let mut i = 0;
    'outer: while i < words.len() {
        for (phrase, replacement) in PHRASES {
            if words.len() - i >= phrase.len()
                && phrase.iter().zip(&words[i..]).all(|(p, w)| p == w)
            {
                out.push(replacement.to_string());
                i += phrase.len();
                continue 'outer;
            }
        }
        out.push(words[i].clone());
        i += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Single-word canonicalization
// ---------------------------------------------------------------------------

/// Map one word into the closed vocabulary: plural folding plus synonyms.
/// Unknown words pass through unchanged.
fn canonical_word(word: &str) -> String {
    let canonical = match word {
        // plurals
        "balls" => "ball",
        "boxes" => "box",
        "bricks" => "brick",
        "pyramids" => "pyramid",
        "planks" => "plank",
        "tables" => "table",
        "objects" | "things" | "thing" | "ones" | "one" => "object",
        // verbs
        "grab" | "grasp" => "take",
        "place" => "put",
        // quantifiers
        "a" | "an" => "any",
        "every" | "each" => "all",
        // sizes
        "big" => "large",
        "tiny" | "little" => "small",
        // relations
        "in" | "into" => "inside",
        "on" | "onto" | "upon" => "ontop",
        "atop" => "ontop",
        "below" | "beneath" | "underneath" => "under",
        "over" => "above",
        other => other,
    };
    canonical.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
