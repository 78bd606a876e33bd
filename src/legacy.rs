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

//! The rule table for the legacy `Badoo` namespace idiom: files wrapped in an
//! immediately-invoked function taking `B` (and sometimes `$`), reaching every
//! other module through `Badoo.Views.*`, `B.Utils.*` and friends.

use regex::Captures;

use crate::errors::AmdifyError;
use crate::rules::{Replacement, Rule, RuleTable};
use crate::session::Discovery;

/// Line added to the module body whenever translations are used.
pub const LEXUMS_PREPEND: &str = "    var _t = Lexums.get();";

/// Builds the legacy rule table. The order is significant: wrapper removal
/// comes first, then `Badoo.` is shortened to `B.` so the later rules only
/// have to look for one spelling, then class definitions are turned into
/// local declarations before the remaining references become dependencies.
pub fn rules() -> Result<RuleTable, AmdifyError> {
    Ok(RuleTable::new(vec![
        // Wrapper boilerplate. The closer is appended by the rewriter.
        Rule::literal("var Badoo = Badoo || {};", "")?,
        Rule::literal("})(Badoo, Zepto);", "")?,
        Rule::literal("}(Badoo, $));", "")?,
        Rule::literal("})(Badoo);", "")?,
        Rule::literal("(function (B) {", "")?,
        Rule::literal("(function (B, $) {", "")?,
        Rule::pattern(r"Badoo\.", "B.")?,
        Rule::computed(r"( |\()_\.", underscore)?,
        Rule::computed(r"([^\.])\$(\(|\.)", zepto)?,
        Rule::computed(r"B(adoo)?\.(View|Model|Controller)s\.(\w+)( )?=", definition)?,
        Rule::computed(r"B(adoo)?\.(View|Model|Controller)s\.(\w+)", mvc)?,
        Rule::computed(r"B(adoo)?\.Proto\.(\w+)", proto)?,
        Rule::computed(r"B(adoo)?\.Utils\.(\w+)", utils)?,
        Rule::computed(r"B(adoo)?\.config", config)?,
        Rule::computed(r"_t\.", translations)?,
        Rule::computed(
            r"B\.(View|UI|Session|Router|Model|History|GlobalEvents|Events|Controller|Api)",
            core,
        )?,
    ]))
}

fn group<'c>(caps: &'c Captures, index: usize) -> &'c str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn underscore(caps: &Captures) -> Replacement {
    Replacement::new(&format!("{}_.", group(caps, 1)))
        .with(Discovery::dependency("underscore", "_"))
}

fn zepto(caps: &Captures) -> Replacement {
    Replacement::new(&format!("{}${}", group(caps, 1), group(caps, 2)))
        .with(Discovery::dependency("zepto", "$"))
}

fn definition(caps: &Captures) -> Replacement {
    Replacement::new(&format!("var {} =", group(caps, 3)))
}

/// `LoginView` stays `LoginView`, `Login` becomes `LoginView`.
fn local_name(file: &str, kind: &str) -> String {
    if file.contains(kind) {
        file.to_string()
    } else {
        format!("{}{}", file, kind)
    }
}

fn mvc(caps: &Captures) -> Replacement {
    let kind = group(caps, 2);
    let file = group(caps, 3);
    let local = local_name(file, kind);
    Replacement::new(&local).with(Discovery::dependency(&format!("{}s/{}", kind, file), &local))
}

fn proto(caps: &Captures) -> Replacement {
    let file = group(caps, 2);
    let local = format!("{}Proto", file);
    Replacement::new(&local).with(Discovery::dependency(&format!("Proto/{}", file), &local))
}

fn utils(caps: &Captures) -> Replacement {
    let file = group(caps, 2);
    Replacement::new(file).with(Discovery::dependency(&format!("Utils/{}", file), file))
}

fn config(_: &Captures) -> Replacement {
    Replacement::new("config").with(Discovery::dependency("config", "config"))
}

fn translations(_: &Captures) -> Replacement {
    Replacement::new("_t.")
        .with(Discovery::dependency("Utils/LexumManager", "Lexums"))
        .with(Discovery::prepend(LEXUMS_PREPEND))
}

fn core(caps: &Captures) -> Replacement {
    let name = group(caps, 1);
    Replacement::new(name).with(Discovery::dependency(&format!("Core/{}", name), name))
}


#[cfg(test)]
fn run(text: &str) -> (String, crate::session::Session) {
    let mut session = crate::session::Session::new();
    let rewritten = rules().unwrap().apply(text, &mut session);
    (rewritten, session)
}

#[test]
fn test_table_has_every_rule() {
    assert_eq!(rules().unwrap().len(), 16);
}

#[test]
fn test_wrappers_are_removed() {
    let (text, session) = run("var Badoo = Badoo || {};\n(function (B, $) {\n    x();\n}(Badoo, $));\n");
    assert_eq!(text.trim(), "x();");
    assert!(session.registry().is_empty());
}

#[test]
fn test_view_definition_and_reference() {
    let (text, session) = run("Badoo.Views.Login = B.Views.Base.extend({});");
    assert_eq!(text, "var Login = BaseView.extend({});");
    let header = session.registry().render_header();
    assert_eq!(header.paths().collect::<Vec<_>>(), vec!["Views/Base"]);
    assert_eq!(header.bindings().collect::<Vec<_>>(), vec!["BaseView"]);
}

#[test]
fn test_type_suffix_not_doubled() {
    let (text, session) = run("new B.Models.UserModel();");
    assert_eq!(text, "new UserModel();");
    assert_eq!(
        session.registry().get("Models/UserModel").map(|d| d.binding.as_str()),
        Some("UserModel")
    );
}

#[test]
fn test_underscore_and_zepto() {
    let (text, session) = run("var a = _.map(x), b = $('.c'), d = e.$el;");
    assert_eq!(text, "var a = _.map(x), b = $('.c'), d = e.$el;");
    let header = session.registry().render_header();
    assert_eq!(header.paths().collect::<Vec<_>>(), vec!["underscore", "zepto"]);
    assert_eq!(header.bindings().collect::<Vec<_>>(), vec!["_", "$"]);
}

#[test]
fn test_proto_utils_config() {
    let (text, session) = run("B.Proto.List; Badoo.Utils.Format(Badoo.config.x);");
    assert_eq!(text, "ListProto; Format(config.x);");
    let header = session.registry().render_header();
    assert_eq!(
        header.paths().collect::<Vec<_>>(),
        vec!["Proto/List", "Utils/Format", "config"]
    );
    assert_eq!(
        header.bindings().collect::<Vec<_>>(),
        vec!["ListProto", "Format", "config"]
    );
}

#[test]
fn test_translations_prepend_lexums() {
    let (text, session) = run("a(_t.hello); b(_t.bye);");
    assert_eq!(text, "a(_t.hello); b(_t.bye);");
    assert_eq!(session.prepends().render(), vec![LEXUMS_PREPEND.to_string()]);
    assert_eq!(
        session.registry().get("Utils/LexumManager").map(|d| d.binding.as_str()),
        Some("Lexums")
    );
}

#[test]
fn test_core_modules() {
    let (text, session) = run("Badoo.Events.on('x'); B.Api.get();");
    assert_eq!(text, "Events.on('x'); Api.get();");
    let header = session.registry().render_header();
    assert_eq!(header.paths().collect::<Vec<_>>(), vec!["Core/Api", "Core/Events"]);
}
