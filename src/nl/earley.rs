//! Earley chart parser for the command grammar.
//!
//! Small command-English grammars are ambiguous on purpose here: distinct
//! relative-clause attachments must come back as distinct parse trees so the
//! dialogue layer can ask which one was meant. Items therefore carry their
//! back-pointers, and two items with the same dotted rule but different
//! derivation histories are both kept.

use std::fmt;

// ---------------------------------------------------------------------------
// Grammar
// ---------------------------------------------------------------------------

/// A grammar symbol: a non-terminal naming a rule, or a terminal naming a
/// lexicon category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    NonTerminal(&'static str),
    Terminal(&'static str),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::NonTerminal(s) => write!(f, "{}", s),
            Symbol::Terminal(s) => write!(f, "'{}'", s),
        }
    }
}

/// A production rule with a ranking weight (higher parses listed first).
#[derive(Debug, Clone)]
pub struct Rule {
    pub lhs: &'static str,
    pub rhs: Vec<Symbol>,
    pub weight: f64,
}

impl Rule {
    pub fn new(lhs: &'static str, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs, weight: 1.0 }
    }

    pub fn weighted(lhs: &'static str, rhs: Vec<Symbol>, weight: f64) -> Self {
        Self { lhs, rhs, weight }
    }
}

/// A context-free grammar with a designated start symbol.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub start: &'static str,
    pub rules: Vec<Rule>,
}

impl Grammar {
    pub fn new(start: &'static str, rules: Vec<Rule>) -> Self {
        Self { start, rules }
    }
}

// ---------------------------------------------------------------------------
// Lexicon interface
// ---------------------------------------------------------------------------

/// Classifies tokens into lexicon categories; terminals match through this.
pub trait TokenClassifier {
    fn classify(&self, token: &str) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Chart items
// ---------------------------------------------------------------------------

/// A derivation record attached to an item: one entry per symbol left of
/// the dot.
#[derive(Debug, Clone, PartialEq)]
enum Deriv {
    /// A scanned terminal token.
    Token { category: String, token: String },
    /// A completed non-terminal, with its own derivation.
    Sub { rule_idx: usize, children: Vec<Deriv> },
}

/// A dotted rule with origin and derivation history.
#[derive(Debug, Clone, PartialEq)]
struct Item {
    rule_idx: usize,
    dot: usize,
    origin: usize,
    derivs: Vec<Deriv>,
}

impl Item {
    fn predicted(rule_idx: usize, origin: usize) -> Self {
        Self {
            rule_idx,
            dot: 0,
            origin,
            derivs: Vec::new(),
        }
    }

    fn advanced(&self, deriv: Deriv) -> Self {
        let mut derivs = self.derivs.clone();
        derivs.push(deriv);
        Self {
            rule_idx: self.rule_idx,
            dot: self.dot + 1,
            origin: self.origin,
            derivs,
        }
    }

    fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot >= grammar.rules[self.rule_idx].rhs.len()
    }

    fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar.rules[self.rule_idx].rhs.get(self.dot)
    }
}

/// Insert an item unless an identical one (same dotted rule AND same
/// derivation) is already present. Distinct derivations of the same dotted
/// rule are kept — they are exactly the ambiguity we need to report.
fn insert(set: &mut Vec<Item>, item: Item) {
    if !set.contains(&item) {
        set.push(item);
    }
}

// ---------------------------------------------------------------------------
// Parse trees
// ---------------------------------------------------------------------------

/// A node in a finished parse tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    Interior {
        label: &'static str,
        children: Vec<ParseNode>,
        weight: f64,
    },
    Leaf {
        category: String,
        token: String,
    },
}

impl ParseNode {
    pub fn label(&self) -> &str {
        match self {
            ParseNode::Interior { label, .. } => label,
            ParseNode::Leaf { category, .. } => category,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            ParseNode::Leaf { token, .. } => Some(token),
            ParseNode::Interior { .. } => None,
        }
    }

    pub fn children(&self) -> &[ParseNode] {
        match self {
            ParseNode::Interior { children, .. } => children,
            ParseNode::Leaf { .. } => &[],
        }
    }

    /// Sum of rule weights over the whole tree.
    pub fn total_weight(&self) -> f64 {
        match self {
            ParseNode::Interior { weight, children, .. } => {
                *weight + children.iter().map(|c| c.total_weight()).sum::<f64>()
            }
            ParseNode::Leaf { .. } => 0.0,
        }
    }
}

/// A complete parse with its ranking score.
#[derive(Debug, Clone)]
pub struct RankedParse {
    pub tree: ParseNode,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse tokens against the grammar. Returns every complete parse of the
/// start symbol spanning the full input, ranked by weight (highest first).
pub fn parse(
    grammar: &Grammar,
    tokens: &[String],
    classifier: &dyn TokenClassifier,
) -> Vec<RankedParse> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let n = tokens.len();
    let mut chart: Vec<Vec<Item>> = vec![Vec::new(); n + 1];

    for (idx, rule) in grammar.rules.iter().enumerate() {
        if rule.lhs == grammar.start {
            insert(&mut chart[0], Item::predicted(idx, 0));
        }
    }

    for pos in 0..=n {
        let mut i = 0;
        while i < chart[pos].len() {
            let item = chart[pos][i].clone();
            if item.is_complete(grammar) {
                complete(grammar, &mut chart, &item, pos);
            } else {
                match item.next_symbol(grammar) {
                    Some(Symbol::NonTerminal(nt)) => predict(grammar, &mut chart, nt, pos),
                    Some(Symbol::Terminal(cat)) => {
                        if pos < n {
                            scan(&mut chart, &item, pos, &tokens[pos], cat, classifier);
                        }
                    }
                    None => {}
                }
            }
            i += 1;
        }
    }

    let mut parses: Vec<RankedParse> = chart[n]
        .iter()
        .filter(|item| {
            item.is_complete(grammar)
                && item.origin == 0
                && grammar.rules[item.rule_idx].lhs == grammar.start
        })
        .map(|item| {
            let tree = build_node(grammar, item.rule_idx, &item.derivs);
            let score = tree.total_weight();
            RankedParse { tree, score }
        })
        .collect();

    parses.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    parses
}

/// Predict: seed items for every rule producing the awaited non-terminal.
fn predict(grammar: &Grammar, chart: &mut [Vec<Item>], nt: &str, pos: usize) {
    for (idx, rule) in grammar.rules.iter().enumerate() {
        if rule.lhs == nt {
            insert(&mut chart[pos], Item::predicted(idx, pos));
        }
    }
}

/// Scan: advance the dot over a terminal when the token carries its category.
fn scan(
    chart: &mut [Vec<Item>],
    item: &Item,
    pos: usize,
    token: &str,
    category: &str,
    classifier: &dyn TokenClassifier,
) {
    if classifier.classify(token).iter().any(|c| c == category) {
        let deriv = Deriv::Token {
            category: category.to_string(),
            token: token.to_string(),
        };
        insert(&mut chart[pos + 1], item.advanced(deriv));
    }
}

/// Complete: advance every item in the origin set waiting on the finished
/// non-terminal, recording the finished derivation as a child.
fn complete(grammar: &Grammar, chart: &mut [Vec<Item>], finished: &Item, end: usize) {
    let lhs = grammar.rules[finished.rule_idx].lhs;
    let waiting: Vec<Item> = chart[finished.origin]
        .iter()
        .filter(|it| matches!(it.next_symbol(grammar), Some(Symbol::NonTerminal(nt)) if *nt == lhs))
        .cloned()
        .collect();

    for item in waiting {
        let deriv = Deriv::Sub {
            rule_idx: finished.rule_idx,
            children: finished.derivs.clone(),
        };
        insert(&mut chart[end], item.advanced(deriv));
    }
}

/// Materialize a parse tree from an item's derivation history.
fn build_node(grammar: &Grammar, rule_idx: usize, derivs: &[Deriv]) -> ParseNode {
    let rule = &grammar.rules[rule_idx];
    let children = derivs
        .iter()
        .map(|d| match d {
            Deriv::Token { category, token } => ParseNode::Leaf {
                category: category.clone(),
                token: token.clone(),
            },
            Deriv::Sub { rule_idx, children } => build_node(grammar, *rule_idx, children),
        })
        .collect();
    ParseNode::Interior {
        label: rule.lhs,
        children,
        weight: rule.weight,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
