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

//! Amdify is a Rust crate that turns snippets written in a legacy
//! namespace-object idiom into AMD modules, using nothing but an ordered table
//! of pattern/replacement rules, along with the few build steps of the blog
//! that hosts it as a demo.
//!
//! A `Rule` pairs a matcher (a literal or a regular expression) with a
//! replacer (a literal or a function of the captures). Rules are applied in
//! the order of their `RuleTable`, each one to the output of the previous
//! one, replacing every occurrence in a single pass. Function replacers do not
//! mutate anything: they return a `Replacement` carrying the new text plus any
//! `Discovery` made, which is either:
//!
//! * a dependency, keyed by module path, with the local name it is bound to;
//!   the first registration of a key wins.
//! * a line to prepend to the module body; duplicates are dropped when the
//!   body is rendered, keeping the first occurrence.
//!
//! The `Rewriter` folds discoveries into a `Session` that belongs to a single
//! rewrite, trims and indents the resulting body and wraps it in a `define`
//! header whose dependencies are sorted by path.
//!
//! The matching is purely textual. Code the rules do not anticipate is
//! rewritten on a best-effort basis, which may well be wrong, but rewriting
//! never fails.
//!
//! Around the engine, the crate carries the build side of the blog: the
//! per-post asset directories (`PageDirs`), the `_config.yml` settings
//! (`SiteConfig`), the LESS stylesheet compilation (`LessGenerator`) and
//! passes over markdown posts, in particular one that rewrites the demo code
//! blocks of a post (`DemoRewritePass`).
//!
//! # Example
//!
//! ~~~rust,no_run
//! use amdify::{AmdifyError, Rewriter, Session};
//! fn example() -> Result<(), AmdifyError> {
//!     let rewriter = Rewriter::legacy()?;
//!     let mut session = Session::new();
//!     let module = rewriter.rewrite_with(r#"
//!     (function (B) {
//!         B.Views.Login = B.Views.Base.extend({});
//!     })(Badoo);
//!     "#, &mut session);
//!     println!("{}", module);
//!     assert_eq!(session.registry().len(), 1);
//!     Ok(())
//! }
//! ~~~
//!

pub mod config;
mod content;
mod errors;
pub mod legacy;
pub mod less;
mod passes;
mod registry;
mod rewrite;
mod rules;
mod session;
mod site;

pub use config::SiteConfig;
pub use content::{Post, PostCollection, PostOrigin};
pub use errors::AmdifyError;
pub use less::{GeneratedFile, LessGenerator};
pub use passes::{DemoRewritePass, HtmlExporterPass, LocalPass, ReadOnlyPass, DEMO_TAG};
pub use registry::{DefineHeader, Dependency, DependencyRegistry, PrependCollector};
pub use rewrite::{Rewriter, CLOSER, INDENT};
pub use rules::{ComputeFn, Replacement, Rule, RuleTable};
pub use session::{Discovery, Session};
pub use site::PageDirs;
