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
use serde::Serialize;
use serde_json::Value;

use crate::errors::AmdifyError;

/// Per-post asset directories, named after the last segment of the post url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDirs {
    pub imgdir: String,
    pub demodir: String,
    pub filesdir: String,
}

impl PageDirs {
    pub fn from_url(url: &str) -> PageDirs {
        // Pretty permalinks end in a slash; the slug is the segment before it.
        let slug = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        PageDirs {
            imgdir: format!("/images/{}", slug),
            demodir: format!("/demo/{}", slug),
            filesdir: format!("/files/{}", slug),
        }
    }

    /// Reads `page.url` from a render payload and stores the directories
    /// next to it.
    pub fn inject(payload: &mut Value) -> Result<PageDirs, AmdifyError> {
        let page = payload
            .get_mut("page")
            .and_then(Value::as_object_mut)
            .ok_or(AmdifyError::MissingPageUrl)?;
        let url = page
            .get("url")
            .and_then(Value::as_str)
            .ok_or(AmdifyError::MissingPageUrl)?;
        let dirs = PageDirs::from_url(url);
        page.insert("imgdir".to_string(), Value::from(dirs.imgdir.clone()));
        page.insert("demodir".to_string(), Value::from(dirs.demodir.clone()));
        page.insert("filesdir".to_string(), Value::from(dirs.filesdir.clone()));
        Ok(dirs)
    }
}


#[test]
fn test_dirs_from_url() {
    let dirs = PageDirs::from_url("/blog/2015/using-regular-expressions");
    assert_eq!(dirs.imgdir, "/images/using-regular-expressions");
    assert_eq!(dirs.demodir, "/demo/using-regular-expressions");
    assert_eq!(dirs.filesdir, "/files/using-regular-expressions");
}

#[test]
fn test_trailing_slash_is_ignored() {
    let dirs = PageDirs::from_url("/2015/04/20/using-regex/");
    assert_eq!(dirs.imgdir, "/images/using-regex");
    assert_eq!(dirs.demodir, "/demo/using-regex");
    assert_eq!(dirs.filesdir, "/files/using-regex");
    assert_eq!(PageDirs::from_url("/post//").imgdir, "/images/post");
}

#[test]
fn test_root_and_empty_urls_give_empty_slug() {
    assert_eq!(PageDirs::from_url("/").imgdir, "/images/");
    assert_eq!(PageDirs::from_url("").imgdir, "/images/");
}

#[test]
fn test_inject_into_payload() {
    let mut payload = serde_json::json!({"page": {"url": "/2015/hello", "title": "Hello"}});
    PageDirs::inject(&mut payload).unwrap();
    assert_eq!(payload["page"]["demodir"], "/demo/hello");
    assert_eq!(payload["page"]["imgdir"], "/images/hello");
    assert_eq!(payload["page"]["filesdir"], "/files/hello");
    assert_eq!(payload["page"]["title"], "Hello");
}

#[test]
fn test_inject_without_url_fails() {
    let mut payload = serde_json::json!({"page": {"title": "Hello"}});
    assert!(matches!(PageDirs::inject(&mut payload), Err(AmdifyError::MissingPageUrl)));
    let mut payload = serde_json::json!({});
    assert!(PageDirs::inject(&mut payload).is_err());
}
