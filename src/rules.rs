// Copyright 2018 Dario Domizioli
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use regex::{Captures, NoExpand, Regex};
use tracing::debug;

use crate::errors::AmdifyError;
use crate::session::{Discovery, Session};

/// The signature of a replacer function: it receives one match with its
/// capture groups and returns the replacement text, along with anything it
/// found along the way.
pub type ComputeFn = fn(caps: &Captures) -> Replacement;

/// The result of a replacer function for a single match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    pub discoveries: Vec<Discovery>,
}

impl Replacement {
    pub fn new(text: &str) -> Replacement {
        Replacement {
            text: text.to_string(),
            discoveries: Vec::new(),
        }
    }

    pub fn with(mut self, discovery: Discovery) -> Replacement {
        self.discoveries.push(discovery);
        self
    }
}

/// What a `Rule` puts in place of each match.
#[derive(Debug, Clone)]
enum Replacer {
    /// Inserted verbatim; `$` has no special meaning.
    Literal(String),
    Computed(ComputeFn),
}

/// A matcher paired with a replacer. Literal matchers are compiled to escaped
/// patterns so that both kinds share the same matching policy: every
/// leftmost, non-overlapping occurrence is replaced in a single pass.
#[derive(Debug, Clone)]
pub struct Rule {
    matcher: Regex,
    replacer: Replacer,
}

impl Rule {
    /// Replaces every occurrence of the literal `find` with `replace`.
    pub fn literal(find: &str, replace: &str) -> Result<Rule, AmdifyError> {
        Rule::pattern(&regex::escape(find), replace)
    }

    pub fn literal_with(find: &str, compute: ComputeFn) -> Result<Rule, AmdifyError> {
        Rule::computed(&regex::escape(find), compute)
    }

    /// Replaces every match of the regular expression `pattern` with the
    /// literal `replace`.
    pub fn pattern(pattern: &str, replace: &str) -> Result<Rule, AmdifyError> {
        Ok(Rule {
            matcher: Regex::new(pattern)?,
            replacer: Replacer::Literal(replace.to_string()),
        })
    }

    /// Replaces every match of `pattern` with the text computed by `compute`.
    pub fn computed(pattern: &str, compute: ComputeFn) -> Result<Rule, AmdifyError> {
        Ok(Rule {
            matcher: Regex::new(pattern)?,
            replacer: Replacer::Computed(compute),
        })
    }

    /// The matcher, as a regular expression source string.
    pub fn pattern_str(&self) -> &str {
        self.matcher.as_str()
    }

    /// Rewrites `text`, returning the new text and the discoveries made by
    /// the replacer, in match order. Never fails: a matcher that finds
    /// nothing leaves the text as it is.
    pub fn apply(&self, text: &str) -> (String, Vec<Discovery>) {
        match self.replacer {
            Replacer::Literal(ref replace) => (
                self.matcher
                    .replace_all(text, NoExpand(replace.as_str()))
                    .into_owned(),
                Vec::new(),
            ),
            Replacer::Computed(compute) => {
                let mut discoveries = Vec::new();
                let rewritten = self.matcher.replace_all(text, |caps: &Captures| {
                    let replacement = compute(caps);
                    discoveries.extend(replacement.discoveries);
                    replacement.text
                });
                (rewritten.into_owned(), discoveries)
            }
        }
    }
}

/// An ordered sequence of rules. Each rule sees the output of the previous
/// one, so the order is part of the table's meaning.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> RuleTable {
        RuleTable { rules: rules }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule once, in order, over `text`, folding whatever the
    /// rules discover into `session`.
    pub fn apply(&self, text: &str, session: &mut Session) -> String {
        let mut working = text.to_string();
        for (index, rule) in self.rules.iter().enumerate() {
            let (rewritten, discoveries) = rule.apply(&working);
            debug!(
                rule = index,
                pattern = rule.pattern_str(),
                discoveries = discoveries.len(),
                changed = rewritten != working,
                "applied rule"
            );
            for discovery in discoveries {
                session.record(discovery);
            }
            working = rewritten;
        }
        working
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> RuleTable {
        RuleTable::new(iter.into_iter().collect())
    }
}


#[cfg(test)]
fn register_capitalized(caps: &Captures) -> Replacement {
    Replacement::new(&caps[1]).with(Discovery::dependency(&caps[1], &caps[1]))
}

#[test]
fn test_literal_rule_replaces_every_occurrence() {
    let rule = Rule::literal("(function (B) {", "").unwrap();
    let (text, discoveries) = rule.apply("(function (B) {\na();\n(function (B) {\n");
    assert_eq!(text, "\na();\n\n");
    assert!(discoveries.is_empty());
}

#[test]
fn test_literal_replacement_is_not_expanded() {
    let rule = Rule::pattern(r"(\w+)!", "$1$").unwrap();
    let (text, _) = rule.apply("hey! you!");
    assert_eq!(text, "$1$ $1$");
}

#[test]
fn test_rule_without_match_is_a_no_op() {
    let rule = Rule::computed(r"B\.Utils\.(\w+)", register_capitalized).unwrap();
    let (text, discoveries) = rule.apply("nothing to see here");
    assert_eq!(text, "nothing to see here");
    assert!(discoveries.is_empty());
}

#[test]
fn test_computed_rule_called_per_match_in_order() {
    let rule = Rule::computed(r"\b([A-Z]\w*)\b", register_capitalized).unwrap();
    let (text, discoveries) = rule.apply("new Foo(Bar, baz, Foo)");
    assert_eq!(text, "new Foo(Bar, baz, Foo)");
    assert_eq!(
        discoveries,
        vec![
            Discovery::dependency("Foo", "Foo"),
            Discovery::dependency("Bar", "Bar"),
            Discovery::dependency("Foo", "Foo"),
        ]
    );
}

#[cfg(test)]
fn config_dependency(_: &Captures) -> Replacement {
    Replacement::new("config").with(Discovery::dependency("config", "config"))
}

#[test]
fn test_literal_matcher_with_computed_replacer() {
    let mut table = RuleTable::default();
    table.push(Rule::literal_with("B.config", config_dependency).unwrap());
    assert_eq!(table.len(), 1);
    let mut session = Session::new();
    let text = table.apply("B.config.a + BXconfig.b + B.config.c", &mut session);
    assert_eq!(text, "config.a + BXconfig.b + config.c");
    assert_eq!(session.registry().len(), 1);
    assert_eq!(session.registry().get("config").map(|d| d.binding.as_str()), Some("config"));
}

#[test]
fn test_invalid_pattern_is_an_error() {
    assert!(Rule::pattern("(unclosed", "").is_err());
}

#[test]
fn test_rule_order_matters() {
    let strip = || Rule::literal("A.B", "B").unwrap();
    let capitalized = || Rule::computed(r"\b([A-Z]\w*)\b", register_capitalized).unwrap();

    let forward: RuleTable = vec![strip(), capitalized()].into_iter().collect();
    let mut session = Session::new();
    let text = forward.apply("var x = A.B;", &mut session);
    assert_eq!(text, "var x = B;");
    let header = session.registry().render_header();
    assert_eq!(header.paths().collect::<Vec<_>>(), vec!["B"]);

    let backward: RuleTable = vec![capitalized(), strip()].into_iter().collect();
    let mut session = Session::new();
    backward.apply("var x = A.B;", &mut session);
    let header = session.registry().render_header();
    assert_eq!(header.paths().collect::<Vec<_>>(), vec!["A", "B"]);
}
