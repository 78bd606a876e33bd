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
use crate::registry::{DependencyRegistry, PrependCollector};

/// Something a rule found while rewriting, to be folded into the `Session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Dependency {
        key: String,
        path: String,
        binding: String,
    },
    Prepend(String),
}

impl Discovery {
    /// A dependency whose key is its own path, which is what nearly every
    /// rule wants.
    pub fn dependency(path: &str, binding: &str) -> Discovery {
        Discovery::Dependency {
            key: path.to_string(),
            path: path.to_string(),
            binding: binding.to_string(),
        }
    }

    pub fn prepend(line: &str) -> Discovery {
        Discovery::Prepend(line.to_string())
    }
}

/// The state accumulated during one rewrite. A `Session` belongs to a single
/// invocation; reusing one requires a `reset` first.
#[derive(Debug, Default, Clone)]
pub struct Session {
    registry: DependencyRegistry,
    prepends: PrependCollector,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn reset(&mut self) {
        self.registry.reset();
        self.prepends.reset();
    }

    pub fn record(&mut self, discovery: Discovery) {
        match discovery {
            Discovery::Dependency { key, path, binding } => {
                self.registry.register(&key, &path, &binding)
            }
            Discovery::Prepend(line) => self.prepends.push(&line),
        }
    }

    pub fn registry(&self) -> &DependencyRegistry {
        &self.registry
    }

    pub fn prepends(&self) -> &PrependCollector {
        &self.prepends
    }
}


#[test]
fn test_record_routes_discoveries() {
    let mut session = Session::new();
    session.record(Discovery::dependency("config", "config"));
    session.record(Discovery::prepend("    var _t = Lexums.get();"));
    session.record(Discovery::Dependency {
        key: "config".to_string(),
        path: "settings".to_string(),
        binding: "settings".to_string(),
    });
    assert_eq!(session.registry().len(), 1);
    assert_eq!(session.registry().get("config").map(|d| d.path.as_str()), Some("config"));
    assert_eq!(session.prepends().render(), vec!["    var _t = Lexums.get();".to_string()]);
    session.reset();
    assert!(session.registry().is_empty());
    assert!(session.prepends().render().is_empty());
}
