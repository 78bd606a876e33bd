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
use tracing::debug;

use crate::errors::AmdifyError;
use crate::legacy;
use crate::rules::RuleTable;
use crate::session::Session;

/// One level of indentation, added in front of the rewritten body.
pub const INDENT: &str = "    ";

/// Closes the factory function and the `define` call.
pub const CLOSER: &str = "\n});\n";

/// Turns a snippet into an AMD module by running a `RuleTable` over it and
/// wrapping the result in a `define` header built from what the rules found.
///
/// A `Rewriter` holds no state between calls; everything a rewrite
/// accumulates lives in the `Session` of that call.
#[derive(Debug, Clone)]
pub struct Rewriter {
    table: RuleTable,
}

impl Rewriter {
    pub fn new(table: RuleTable) -> Rewriter {
        Rewriter { table: table }
    }

    /// A rewriter using the legacy `Badoo` namespace rules.
    pub fn legacy() -> Result<Rewriter, AmdifyError> {
        Ok(Rewriter::new(legacy::rules()?))
    }

    /// Rewrites `source` with a fresh session.
    pub fn rewrite(&self, source: &str) -> String {
        let mut session = Session::new();
        self.rewrite_with(source, &mut session)
    }

    /// Rewrites `source`, resetting `session` first. The session is left
    /// holding the dependencies and prepends of this rewrite.
    pub fn rewrite_with(&self, source: &str, session: &mut Session) -> String {
        session.reset();
        let rewritten = self.table.apply(source, session);
        let body = rewritten.trim();

        let header = session.registry().render_header();
        let prepends = session.prepends().render();
        debug!(
            dependencies = header.dependencies().len(),
            prepends = prepends.len(),
            "rendering module"
        );

        let mut output = header.to_string();
        for line in &prepends {
            output.push_str(line);
            output.push('\n');
        }
        if !prepends.is_empty() {
            output.push('\n');
        }
        // Only the first line gets the extra level; the others keep their
        // own leading whitespace.
        if !body.is_empty() {
            output.push_str(INDENT);
            output.push_str(body);
        }
        output.push_str(CLOSER);
        output
    }
}


#[cfg(test)]
const PROFILE_VIEW: &str = r#"var Badoo = Badoo || {};

(function (B) {

    B.Views.Profile = B.Views.Base.extend({
        render: function () {
            B.Utils.Template.render(this.el, B.config.user);
        }
    });

})(Badoo);
"#;

#[test]
fn test_rewrite_profile_view() {
    let rewriter = Rewriter::legacy().unwrap();
    let output = rewriter.rewrite(PROFILE_VIEW);
    assert_eq!(
        output,
        r#"define(['Utils/Template',
        'Views/Base',
        'config'],

function (Template, BaseView, config) {

    var Profile = BaseView.extend({
        render: function () {
            Template.render(this.el, config.user);
        }
    });
});
"#
    );
    assert!(!output.contains("Badoo"));
    assert!(!output.contains("(function (B)"));
    assert!(!output.contains("B."));
}

#[test]
fn test_rewrite_with_prepends() {
    let rewriter = Rewriter::legacy().unwrap();
    let output = rewriter.rewrite("(function (B, $) {\n    $('#x').text(_t.hi + _t.there);\n}(Badoo, $));");
    assert_eq!(
        output,
        "define(['Utils/LexumManager',\n        'zepto'],\n\nfunction (Lexums, $) {\n\n    var _t = Lexums.get();\n\n    $('#x').text(_t.hi + _t.there);\n});\n"
    );
}

#[test]
fn test_rewrite_is_deterministic() {
    let rewriter = Rewriter::legacy().unwrap();
    let first = rewriter.rewrite(PROFILE_VIEW);
    let second = rewriter.rewrite(PROFILE_VIEW);
    assert_eq!(first, second);
}

#[test]
fn test_rewrite_with_resets_session() {
    let rewriter = Rewriter::legacy().unwrap();
    let mut session = Session::new();
    rewriter.rewrite_with(PROFILE_VIEW, &mut session);
    assert_eq!(session.registry().len(), 3);
    let output = rewriter.rewrite_with("B.config.debug = true;", &mut session);
    assert_eq!(session.registry().len(), 1);
    assert_eq!(output, "define(['config'],\n\nfunction (config) {\n\n    config.debug = true;\n});\n");
}

#[test]
fn test_rewrite_empty_and_unmatched_input() {
    let rewriter = Rewriter::legacy().unwrap();
    assert_eq!(rewriter.rewrite("  \n "), "define([],\n\nfunction () {\n\n\n});\n");
    assert_eq!(
        rewriter.rewrite("foo();\n  bar();\n"),
        "define([],\n\nfunction () {\n\n    foo();\n  bar();\n});\n"
    );
}
