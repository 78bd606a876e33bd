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

use std::path::PathBuf;

use thiserror::Error;

/// An error that can be returned by amdify operations. Rewriting text never
/// produces one; only rule construction and the build-side operations do.
#[derive(Debug, Error)]
pub enum AmdifyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid exclude pattern: {0}")]
    InvalidExclude(#[from] glob::PatternError),

    #[error("invalid rule pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("cannot create pass: {0}")]
    PassCreation(String),

    #[error("page payload has no page url")]
    MissingPageUrl,

    #[error("LESS compilation failed for {path}: {detail}")]
    Compilation { path: PathBuf, detail: String },
}
