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
use std::slice::IterMut;

use pulldown_cmark::{html, Event, Options, Parser};

/// Where a `Post` comes from: usually a markdown file of the blog, but tests
/// and passes may build posts from plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOrigin {
    MarkdownFile(PathBuf),
    RawString,
    Created,
}

/// A blog post as a sequence of markdown events. The raw text is owned
/// elsewhere.
pub struct Post<'a> {
    origin: PostOrigin,
    events: Vec<Event<'a>>,
}

impl<'a> Post<'a> {
    /// Parses `text` with tables and footnotes enabled.
    pub fn parse(text: &'a str, origin: PostOrigin) -> Post<'a> {
        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_TABLES);
        opts.insert(Options::ENABLE_FOOTNOTES);
        Post {
            origin: origin,
            events: Parser::new_ext(text, opts).collect(),
        }
    }

    pub fn origin(&self) -> &PostOrigin {
        &self.origin
    }

    pub fn events(&self) -> &[Event<'a>] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut Vec<Event<'a>> {
        &mut self.events
    }

    pub fn swap_events(&mut self, new_events: Vec<Event<'a>>) {
        self.events = new_events
    }

    pub fn to_html(&self) -> String {
        let mut rendered = String::new();
        html::push_html(&mut rendered, self.events.iter().cloned());
        rendered
    }
}

/// The posts of one build.
pub struct PostCollection<'a> {
    posts: Vec<Post<'a>>,
}

impl<'a> PostCollection<'a> {
    pub fn from_posts(posts: Vec<Post<'a>>) -> PostCollection<'a> {
        PostCollection { posts: posts }
    }

    pub fn posts(&self) -> &[Post<'a>] {
        &self.posts
    }

    pub fn posts_iter_mut(&mut self) -> IterMut<Post<'a>> {
        self.posts.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}


#[test]
fn test_post_renders_html() {
    let post = Post::parse("foo\n\n*bar*\n", PostOrigin::RawString);
    assert_eq!(post.origin(), &PostOrigin::RawString);
    assert_eq!(post.to_html(), "<p>foo</p>\n<p><em>bar</em></p>\n");
}

#[test]
fn test_post_swap_events() {
    let mut post = Post::parse("foo\n", PostOrigin::Created);
    let other = Post::parse("bar\n", PostOrigin::RawString);
    post.swap_events(other.events().to_vec());
    assert_eq!(post.to_html(), "<p>bar</p>\n");
    assert_eq!(post.origin(), &PostOrigin::Created);
}
