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
use std::mem;
use std::path::{Path, PathBuf};

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use tracing::{debug, info};

use crate::content::{Post, PostCollection, PostOrigin};
use crate::errors::AmdifyError;
use crate::rewrite::Rewriter;

/// This trait is implemented by all passes that only read the posts and
/// update an external state as a side effect.
pub trait ReadOnlyPass<ExternalState> {
    fn apply(&mut self, posts: &PostCollection, state: &mut ExternalState) -> Result<(), AmdifyError>;
}

/// This trait is implemented by all passes that modify one `Post` at a time;
/// an external state may be updated as a side effect too.
pub trait LocalPass<ExternalState> {
    fn apply(&mut self, post: &mut Post, state: &mut ExternalState) -> Result<(), AmdifyError>;
}

/// Info string prefix marking a fenced code block as a rewrite demo.
pub const DEMO_TAG: &str = "amdify";

/// A `LocalPass` that rewrites the content of every demo code block of a
/// post, i.e. every fenced block whose info string starts with the tag. The
/// rewritten modules are pushed to the external state in document order.
pub struct DemoRewritePass {
    rewriter: Rewriter,
    tag: String,
}

impl DemoRewritePass {
    pub fn new(rewriter: Rewriter) -> DemoRewritePass {
        DemoRewritePass::with_tag(rewriter, DEMO_TAG)
    }

    pub fn with_tag(rewriter: Rewriter, tag: &str) -> DemoRewritePass {
        DemoRewritePass {
            rewriter: rewriter,
            tag: tag.to_string(),
        }
    }

    fn opens_demo(&self, event: &Event) -> bool {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                info.starts_with(self.tag.as_str())
            }
            _ => false,
        }
    }
}

impl LocalPass<Vec<String>> for DemoRewritePass {
    fn apply(&mut self, post: &mut Post, modules: &mut Vec<String>) -> Result<(), AmdifyError> {
        // Code block content arrives as one or more text events; they are
        // collected until the end of the block and replaced by a single one.
        let events = mem::take(post.events_mut());
        let mut rewritten = Vec::with_capacity(events.len());
        let mut demo_text: Option<String> = None;
        for event in events {
            if let Some(ref mut text) = demo_text {
                match event {
                    Event::Text(chunk) => text.push_str(&chunk),
                    Event::End(TagEnd::CodeBlock) => {
                        let module = self.rewriter.rewrite(text);
                        debug!(lines = module.lines().count(), "rewrote demo block");
                        rewritten.push(Event::Text(CowStr::from(module.clone())));
                        rewritten.push(event);
                        modules.push(module);
                        demo_text = None;
                    }
                    other => rewritten.push(other),
                }
                continue;
            }
            if self.opens_demo(&event) {
                demo_text = Some(String::new());
            }
            rewritten.push(event);
        }
        post.swap_events(rewritten);
        Ok(())
    }
}

/// A `ReadOnlyPass` which will output every post as an HTML file laid flat
/// under a specified directory.
pub struct HtmlExporterPass {
    output_dir: PathBuf,
}

impl HtmlExporterPass {
    /// Creates a HtmlExporterPass with the specified output directory.
    pub fn new(dir: &Path) -> Result<HtmlExporterPass, AmdifyError> {
        if !dir.is_dir() {
            return Err(AmdifyError::PassCreation(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(HtmlExporterPass {
            output_dir: dir.to_path_buf(),
        })
    }
}

impl ReadOnlyPass<Vec<PathBuf>> for HtmlExporterPass {
    fn apply(&mut self, posts: &PostCollection, filenames: &mut Vec<PathBuf>) -> Result<(), AmdifyError> {
        filenames.clear();
        posts.posts().iter().try_for_each(|post| {
            let stem = match post.origin() {
                PostOrigin::MarkdownFile(path) => path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned()),
                PostOrigin::RawString | PostOrigin::Created => None,
            };
            // The running index keeps posts sharing a stem apart.
            let filename = match stem {
                Some(stem) => format!("{:0>4}-{}.html", filenames.len(), stem),
                None => format!("{:0>4}.html", filenames.len()),
            };
            let path = self.output_dir.join(filename);
            fs::write(&path, post.to_html())?;
            info!(path = %path.display(), "exported post");
            filenames.push(path);
            Ok(())
        })
    }
}


#[cfg(test)]
const DEMO_POST: &str = r#"Before:

```amdify
B.config.x = 1;
```

Untouched:

```js
B.config.y = 2;
```
"#;

#[test]
fn test_demo_blocks_are_rewritten() {
    let mut post = Post::parse(DEMO_POST, PostOrigin::RawString);
    let mut pass = DemoRewritePass::new(Rewriter::legacy().unwrap());
    let mut modules = Vec::new();
    pass.apply(&mut post, &mut modules).unwrap();
    assert_eq!(
        modules,
        vec!["define(['config'],\n\nfunction (config) {\n\n    config.x = 1;\n});\n".to_string()]
    );
    let html = post.to_html();
    assert!(html.contains("B.config.y = 2;"));
    assert!(!html.contains("B.config.x"));
    assert!(html.contains("config.x = 1;"));
}

#[test]
fn test_post_without_demo_is_unchanged() {
    let mut post = Post::parse("foo\n\n```js\nB.config;\n```\n", PostOrigin::RawString);
    let before = post.to_html();
    let mut pass = DemoRewritePass::new(Rewriter::legacy().unwrap());
    let mut modules = Vec::new();
    pass.apply(&mut post, &mut modules).unwrap();
    assert!(modules.is_empty());
    assert_eq!(post.to_html(), before);
}

#[test]
fn test_html_exporter() {
    let dir = tempfile::tempdir().unwrap();
    let posts = PostCollection::from_posts(vec![
        Post::parse("foo\n", PostOrigin::RawString),
        Post::parse("bar\n", PostOrigin::MarkdownFile(PathBuf::from("_posts/2015-hello.md"))),
    ]);
    let mut pass = HtmlExporterPass::new(dir.path()).unwrap();
    let mut files = Vec::new();
    pass.apply(&posts, &mut files).unwrap();
    assert_eq!(files, vec![dir.path().join("0000.html"), dir.path().join("0001-2015-hello.html")]);
    assert_eq!(fs::read_to_string(&files[0]).unwrap(), "<p>foo</p>\n");
    assert_eq!(fs::read_to_string(&files[1]).unwrap(), "<p>bar</p>\n");
}

#[test]
fn test_html_exporter_keeps_posts_with_same_stem_apart() {
    let dir = tempfile::tempdir().unwrap();
    let posts = PostCollection::from_posts(vec![
        Post::parse("first\n", PostOrigin::MarkdownFile(PathBuf::from("a/index.md"))),
        Post::parse("second\n", PostOrigin::MarkdownFile(PathBuf::from("b/index.md"))),
    ]);
    let mut pass = HtmlExporterPass::new(dir.path()).unwrap();
    let mut files = Vec::new();
    pass.apply(&posts, &mut files).unwrap();
    assert_eq!(files, vec![dir.path().join("0000-index.html"), dir.path().join("0001-index.html")]);
    assert_eq!(fs::read_to_string(&files[0]).unwrap(), "<p>first</p>\n");
    assert_eq!(fs::read_to_string(&files[1]).unwrap(), "<p>second</p>\n");
}

#[test]
fn test_html_exporter_needs_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    fs::write(&file, "").unwrap();
    assert!(HtmlExporterPass::new(&file).is_err());
}
