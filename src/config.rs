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
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::AmdifyError;

/// The subset of the blog's `_config.yml` the build steps care about. Any
/// other key in the file is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Pass `--compress` to `lessc`.
    pub compress_less: bool,
    /// Set when `lessc` is unavailable, so that pages fall back to less.js.
    pub use_lessjs: bool,
    /// Globs, relative to `source`, of entries that are not part of the site.
    pub exclude: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> SiteConfig {
        SiteConfig {
            source: PathBuf::from("."),
            destination: PathBuf::from("_site"),
            compress_less: false,
            use_lessjs: false,
            exclude: Vec::new(),
        }
    }
}

impl SiteConfig {
    pub fn from_yaml(text: &str) -> Result<SiteConfig, AmdifyError> {
        // An empty document deserializes to unit, not to a mapping.
        if text.trim().is_empty() {
            return Ok(SiteConfig::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<SiteConfig, AmdifyError> {
        let text = fs::read_to_string(path)?;
        SiteConfig::from_yaml(&text)
    }
}


#[test]
fn test_defaults() {
    let config = SiteConfig::from_yaml("").unwrap();
    assert_eq!(config, SiteConfig::default());
    assert_eq!(config.destination, PathBuf::from("_site"));
}

#[test]
fn test_partial_config_with_unknown_keys() {
    let config = SiteConfig::from_yaml("title: My blog\ncompress_less: true\ndestination: public\n").unwrap();
    assert!(config.compress_less);
    assert!(!config.use_lessjs);
    assert!(config.exclude.is_empty());
    assert_eq!(config.source, PathBuf::from("."));
    assert_eq!(config.destination, PathBuf::from("public"));
}

#[test]
fn test_exclude_list() {
    let config = SiteConfig::from_yaml("exclude:\n  - node_modules\n  - vendor/*.less\n").unwrap();
    assert_eq!(config.exclude, vec!["node_modules".to_string(), "vendor/*.less".to_string()]);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("_config.yml");
    fs::write(&path, "source: site\n").unwrap();
    assert_eq!(SiteConfig::load(&path).unwrap().source, PathBuf::from("site"));
    assert!(SiteConfig::load(&dir.path().join("missing.yml")).is_err());
}

#[test]
fn test_malformed_yaml_is_an_error() {
    assert!(matches!(
        SiteConfig::from_yaml("compress_less: [oops"),
        Err(AmdifyError::Yaml(_))
    ));
}
