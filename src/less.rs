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

//! Compiles the `.less` stylesheets of the site with the external `lessc`
//! compiler. When the compiler is not installed nothing is compiled and the
//! configuration is flagged so that pages load less.js instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use glob::Pattern;
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::SiteConfig;
use crate::errors::AmdifyError;

pub const LESS_COMPILER: &str = "lessc";

/// A stylesheet written by the generator: its directory relative to the
/// destination, and its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub dir: PathBuf,
    pub name: String,
}

pub struct LessGenerator {
    compiler: Option<PathBuf>,
}

impl LessGenerator {
    /// Looks for `lessc` on the `PATH`.
    pub fn locate() -> LessGenerator {
        LessGenerator::new(which::which(LESS_COMPILER).ok())
    }

    pub fn new(compiler: Option<PathBuf>) -> LessGenerator {
        LessGenerator { compiler: compiler }
    }

    /// Compiles every static `.less` file below `config.source` into the
    /// matching `.css` path below `config.destination`.
    pub fn generate(&self, config: &mut SiteConfig) -> Result<Vec<GeneratedFile>, AmdifyError> {
        let compiler = match self.compiler {
            Some(ref compiler) => compiler,
            None => {
                config.use_lessjs = true;
                warn!("{} is not installed, falling back to less.js", LESS_COMPILER);
                return Ok(Vec::new());
            }
        };
        info!(compiler = %compiler.display(), "compiling stylesheets");

        let mut generated = Vec::new();
        for less_path in static_files(&config.source, &config.destination, &config.exclude)? {
            if !is_less(&less_path) {
                continue;
            }
            let relative = less_path
                .strip_prefix(&config.source)
                .unwrap_or(less_path.as_path())
                .with_extension("css");
            let css_path = config.destination.join(&relative);
            if let Some(css_dir) = css_path.parent() {
                fs::create_dir_all(css_dir)?;
            }

            let mut command = Command::new(compiler);
            command.arg(&less_path).arg(&css_path);
            if config.compress_less {
                command.arg("--compress");
            }
            info!(less = %less_path.display(), css = %css_path.display(), "lessc");
            let output = command.output()?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                return Err(AmdifyError::Compilation {
                    path: less_path,
                    detail: if stderr.is_empty() {
                        output.status.to_string()
                    } else {
                        stderr
                    },
                });
            }

            generated.push(GeneratedFile {
                dir: relative.parent().map(Path::to_path_buf).unwrap_or_default(),
                name: relative
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            });
        }
        Ok(generated)
    }
}

fn is_less(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.to_string_lossy().eq_ignore_ascii_case("less"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |name| name.starts_with('_') || name.starts_with('.'))
}

/// Files of the site that are copied as they are: everything below `source`
/// except hidden and underscore-prefixed entries, entries whose path relative
/// to `source` matches one of the `exclude` globs, and the destination itself.
pub fn static_files(
    source: &Path,
    destination: &Path,
    exclude: &[String],
) -> Result<Vec<PathBuf>, AmdifyError> {
    let exclude = exclude
        .iter()
        .map(String::as_str)
        .map(Pattern::new)
        .collect::<Result<Vec<_>, _>>()?;
    let destination = fs::canonicalize(destination).ok();
    let walker = WalkDir::new(source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if is_hidden(entry) {
                return false;
            }
            let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
            if exclude.iter().any(|pattern| pattern.matches_path(relative)) {
                return false;
            }
            match destination {
                Some(ref dest) if entry.file_type().is_dir() => {
                    fs::canonicalize(entry.path()).ok().as_ref() != Some(dest)
                }
                _ => true,
            }
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}


#[cfg(test)]
fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[cfg(all(test, unix))]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    write_file(path, &format!("#!/bin/sh\n{}\n", body));
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_static_files_skip_hidden_and_destination() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("site");
    write_file(&source.join("css/main.less"), "a {}");
    write_file(&source.join("_drafts/draft.less"), "a {}");
    write_file(&source.join(".git/config.less"), "a {}");
    write_file(&source.join("public/old.less"), "a {}");
    write_file(&source.join("js/app.js"), "x();");
    let files = static_files(&source, &source.join("public"), &[]).unwrap();
    assert_eq!(files, vec![source.join("css/main.less"), source.join("js/app.js")]);
}

#[test]
fn test_static_files_honor_exclude() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("site");
    write_file(&source.join("css/main.less"), "a {}");
    write_file(&source.join("node_modules/bootstrap/less/grid.less"), "a {}");
    write_file(&source.join("vendor/theme.less"), "a {}");
    write_file(&source.join("vendor/reset.css"), "a {}");
    let exclude = vec!["node_modules".to_string(), "vendor/*.less".to_string()];
    let files = static_files(&source, &source.join("_site"), &exclude).unwrap();
    assert_eq!(files, vec![source.join("css/main.less"), source.join("vendor/reset.css")]);
    assert!(matches!(
        static_files(&source, &source.join("_site"), &["[".to_string()]),
        Err(AmdifyError::InvalidExclude(_))
    ));
}

#[test]
fn test_missing_compiler_falls_back_to_lessjs() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SiteConfig {
        source: dir.path().to_path_buf(),
        destination: dir.path().join("_site"),
        ..SiteConfig::default()
    };
    write_file(&dir.path().join("style.less"), "a {}");
    let generated = LessGenerator::new(None).generate(&mut config).unwrap();
    assert!(generated.is_empty());
    assert!(config.use_lessjs);
    assert!(!dir.path().join("_site").exists());
}

// Scripts are all written before any of them runs, so that no file is still
// open for writing when one is executed.
#[cfg(unix)]
#[test]
fn test_compile_with_external_compiler() {
    let dir = tempfile::tempdir().unwrap();
    let copying = dir.path().join("bin/copying-lessc");
    let failing = dir.path().join("bin/failing-lessc");
    write_script(&copying, "printf '%s%s' \"$(cat \"$1\")\" \"$3\" > \"$2\"");
    write_script(&failing, "echo 'unrecognised input' >&2\nexit 1");

    let source = dir.path().join("site");
    write_file(&source.join("css/main.less"), "a {}");
    write_file(&source.join("css/Theme.LESS"), "b {}");
    write_file(&source.join("css/skip.less"), "broken {");
    write_file(&source.join("index.html"), "<html></html>");
    let mut config = SiteConfig {
        source: source.clone(),
        destination: source.join("_site"),
        compress_less: false,
        use_lessjs: false,
        exclude: vec!["css/skip.less".to_string()],
    };

    let generated = LessGenerator::new(Some(copying.clone())).generate(&mut config).unwrap();
    assert_eq!(
        generated,
        vec![
            GeneratedFile { dir: PathBuf::from("css"), name: "Theme.css".to_string() },
            GeneratedFile { dir: PathBuf::from("css"), name: "main.css".to_string() },
        ]
    );
    assert_eq!(fs::read_to_string(source.join("_site/css/main.css")).unwrap(), "a {}");
    assert!(!config.use_lessjs);

    config.compress_less = true;
    LessGenerator::new(Some(copying)).generate(&mut config).unwrap();
    assert_eq!(fs::read_to_string(source.join("_site/css/main.css")).unwrap(), "a {}--compress");

    match LessGenerator::new(Some(failing)).generate(&mut config) {
        Err(AmdifyError::Compilation { path, detail }) => {
            assert_eq!(path, source.join("css/Theme.LESS"));
            assert_eq!(detail, "unrecognised input");
        }
        other => panic!("expected a compilation error, got {:?}", other),
    }
}
