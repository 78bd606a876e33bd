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
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A module the rewritten code depends on: the path given to `define` and
/// the local name it is bound to in the factory function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub path: String,
    pub binding: String,
}

/// Accumulates dependencies by key. The first registration of a key wins.
#[derive(Debug, Default, Clone)]
pub struct DependencyRegistry {
    entries: BTreeMap<String, Dependency>,
}

impl DependencyRegistry {
    pub fn new() -> DependencyRegistry {
        DependencyRegistry::default()
    }

    /// Registers `path` bound to `binding` under `key`, unless `key` is
    /// already present.
    pub fn register(&mut self, key: &str, path: &str, binding: &str) {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| Dependency {
                path: path.to_string(),
                binding: binding.to_string(),
            });
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Dependency> {
        self.entries.get(key)
    }

    /// Produces the `define` header for the current entries, ordered by
    /// ascending path. Entries sharing a path keep key order.
    pub fn render_header(&self) -> DefineHeader {
        // BTreeMap iterates by key, and the sort is stable.
        let mut dependencies: Vec<Dependency> = self.entries.values().cloned().collect();
        dependencies.sort_by(|a, b| a.path.cmp(&b.path));
        DefineHeader { dependencies }
    }
}

/// The head of an AMD module: the dependency paths and, in the same order,
/// the parameter names they are bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineHeader {
    dependencies: Vec<Dependency>,
}

impl DefineHeader {
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|d| d.path.as_str())
    }

    pub fn bindings(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|d| d.binding.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl fmt::Display for DefineHeader {
    /// Writes the header up to and including the blank line that opens the
    /// factory body, e.g.
    ///
    /// ```text
    /// define(['config',
    ///         'zepto'],
    ///
    /// function (config, $) {
    ///
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let paths: Vec<String> = self.paths().map(|p| format!("'{}'", p)).collect();
        let bindings: Vec<&str> = self.bindings().collect();
        write!(
            f,
            "define([{}],\n\nfunction ({}) {{\n\n",
            paths.join(",\n        "),
            bindings.join(", ")
        )
    }
}

/// Collects extra lines to emit at the top of the module body. Duplicates are
/// kept in the log and only dropped when rendering.
#[derive(Debug, Default, Clone)]
pub struct PrependCollector {
    lines: Vec<String>,
}

impl PrependCollector {
    pub fn new() -> PrependCollector {
        PrependCollector::default()
    }

    pub fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// The logged lines in push order, keeping the first occurrence of each.
    pub fn render(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.lines
            .iter()
            .filter(|line| seen.insert(line.as_str()))
            .cloned()
            .collect()
    }
}


#[test]
fn test_register_first_wins() {
    let mut registry = DependencyRegistry::new();
    registry.register("zepto", "zepto", "$");
    registry.register("zepto", "jquery", "jQuery");
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.get("zepto"),
        Some(&Dependency { path: "zepto".to_string(), binding: "$".to_string() })
    );
}

#[test]
fn test_render_header_sorted_by_path() {
    let mut registry = DependencyRegistry::new();
    registry.register("zepto", "zepto", "$");
    registry.register("config", "config", "config");
    registry.register("Utils/Foo", "Utils/Foo", "Foo");
    let header = registry.render_header();
    assert_eq!(header.paths().collect::<Vec<_>>(), vec!["Utils/Foo", "config", "zepto"]);
    assert_eq!(header.bindings().collect::<Vec<_>>(), vec!["Foo", "config", "$"]);
}

#[test]
fn test_render_header_text() {
    let mut registry = DependencyRegistry::new();
    registry.register("zepto", "zepto", "$");
    registry.register("config", "config", "config");
    assert_eq!(
        registry.render_header().to_string(),
        "define(['config',\n        'zepto'],\n\nfunction (config, $) {\n\n"
    );
}

#[test]
fn test_reset_empties_everything() {
    let mut registry = DependencyRegistry::new();
    let mut prepends = PrependCollector::new();
    registry.register("config", "config", "config");
    prepends.push("X");
    registry.reset();
    prepends.reset();
    assert!(registry.render_header().is_empty());
    assert!(prepends.render().is_empty());
    assert_eq!(registry.render_header().to_string(), "define([],\n\nfunction () {\n\n");
}

#[test]
fn test_prepend_dedup_keeps_first_occurrence() {
    let mut prepends = PrependCollector::new();
    prepends.push("X");
    prepends.push("Y");
    prepends.push("X");
    prepends.push("X");
    assert_eq!(prepends.render(), vec!["X".to_string(), "Y".to_string()]);
}
