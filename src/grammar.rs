//! String-rewriting grammar that derives the turtle command string.
//!
//! Rules are matched in declaration order, not by left-side length: at every
//! position the first rule whose left side is a prefix of the remaining input
//! wins. Declaring a longer context rule such as `F+F` before `F` lets it
//! pre-empt the shorter one.

use serde::{Deserialize, Deserializer, Serialize};

/// Characters accepted between the left and right side of a rule line.
pub const RULE_SEPARATORS: [char; 2] = [':', '='];

/// A single production `left -> right`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub left: String,
    pub right: String,
}

impl Rule {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Parses one raw rule line such as `F : F[+F]F` or `X=F-X`.
    ///
    /// Whitespace is stripped first. Returns `None` unless the line splits into
    /// exactly two parts with a non-empty left side. An empty right side is an
    /// erasing rule and is accepted.
    pub fn parse(line: &str) -> Option<Self> {
        let compact = strip_whitespace(line);
        let mut parts = compact.split(RULE_SEPARATORS);
        let left = parts.next()?;
        let right = parts.next()?;
        if parts.next().is_some() || left.is_empty() {
            return None;
        }
        Some(Self::new(left, right))
    }
}

/// Parses newline-separated rule text, silently dropping malformed lines.
pub fn parse_rules(text: &str) -> Vec<Rule> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(Rule::parse)
        .collect()
}

/// Removes every whitespace character from `s`.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Rewrites `input` once, scanning left to right.
pub fn rewrite_once(input: &str, rules: &[Rule]) -> String {
    let mut output = String::with_capacity(input.len() * 2);
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        match rules.iter().find(|rule| rest.starts_with(rule.left.as_str())) {
            Some(rule) => {
                output.push_str(&rule.right);
                pos += rule.left.len();
            }
            None => {
                // `rest` is non-empty and starts on a char boundary.
                let Some(ch) = rest.chars().next() else { break };
                output.push(ch);
                pos += ch.len_utf8();
            }
        }
    }

    output
}

/// Expands `axiom` by applying `rules` for `iterations` sequential passes.
///
/// The axiom is stripped of whitespace first. Rules are expected to be
/// whitespace-free already (see [`Rule::parse`]).
pub fn expand(axiom: &str, rules: &[Rule], iterations: u32) -> String {
    let mut current = strip_whitespace(axiom);
    for _ in 0..iterations {
        current = rewrite_once(&current, rules);
    }
    current
}

/// An L-System definition as entered by the user: axiom, raw rule text and
/// iteration count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub axiom: String,
    /// Newline-separated raw rule lines, kept verbatim so malformed lines
    /// survive a save/load cycle even though they never take part in matching.
    pub rules: String,
    #[serde(deserialize_with = "at_least_one")]
    iterations: u32,
}

fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(u32::deserialize(deserializer)?.max(1))
}

impl Default for Grammar {
    fn default() -> Self {
        Self {
            axiom: "F".to_string(),
            rules: "F:F".to_string(),
            iterations: 1,
        }
    }
}

impl Grammar {
    pub fn new(axiom: impl Into<String>, rules: impl Into<String>, iterations: u32) -> Self {
        Self {
            axiom: axiom.into(),
            rules: rules.into(),
            iterations: iterations.max(1),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Sets the iteration count, coercing it to at least 1.
    pub fn set_iterations(&mut self, iterations: u32) {
        self.iterations = iterations.max(1);
    }

    /// Parses a textual iteration count. Unparsable or non-positive input
    /// yields 1.
    pub fn set_iterations_str(&mut self, value: &str) {
        self.iterations = value
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|&n| n >= 1)
            .map_or(1, |n| u32::try_from(n).unwrap_or(u32::MAX));
    }

    /// The valid rules in declaration order.
    pub fn parsed_rules(&self) -> Vec<Rule> {
        parse_rules(&self.rules)
    }

    /// One whitespace-stripped entry per non-blank raw rule line.
    pub fn rule_lines(&self) -> Vec<String> {
        self.rules
            .lines()
            .map(strip_whitespace)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Derives the full command string. Recomputed from scratch on every call.
    pub fn derive(&self) -> String {
        let rules = self.parsed_rules();
        let commands = expand(&self.axiom, &rules, self.iterations);
        log::debug!(
            "derived {} symbols from {} rule(s) over {} iteration(s)",
            commands.len(),
            rules.len(),
            self.iterations
        );
        commands
    }
}

