//! Converts posts and site settings into template [`Value`]s.
//!
//! Templates don't escape anything, so every plain-text field is escaped here
//! and is safe in HTML and XML text and in double-quoted attributes. The
//! `content` and `structured_data` fields are the exception: they are
//! already markup and are passed through untouched.

use crate::config::Site;
use crate::post::Post;
use gtmpl::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;

/// Escapes `&`, `<`, `>` and `"`.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // Writing into a `String` can't fail.
    let _ = escape_html(&mut escaped, text);
    escaped
}

fn string(s: impl Into<String>) -> Value {
    Value::String(s.into())
}

/// The fields every page can use: `site_url`, `site_title`, `author` and
/// `analytics_id` (empty when analytics are disabled).
pub fn site_fields(site: &Site) -> HashMap<String, Value> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("site_url".to_owned(), string(escape(&site.url)));
    m.insert("site_title".to_owned(), string(escape(&site.title)));
    m.insert("author".to_owned(), string(escape(&site.author)));
    m.insert(
        "analytics_id".to_owned(),
        string(escape(site.analytics_id.as_deref().unwrap_or_default())),
    );
    m
}

/// The fields describing one post. `cover_url` is empty when the post has no
/// cover.
pub fn post_fields(post: &Post, site: &Site) -> HashMap<String, Value> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), string(escape(&post.title)));
    m.insert("description".to_owned(), string(escape(&post.description)));
    m.insert("slug".to_owned(), string(escape(&post.slug)));
    m.insert("file_name".to_owned(), string(escape(&post.file_name())));
    m.insert("url".to_owned(), string(escape(&site.post_url(&post.slug))));
    m.insert("date".to_owned(), string(post.display_date()));
    m.insert("date_iso".to_owned(), string(post.iso_date()));
    m.insert("date_rfc3339".to_owned(), string(post.timestamp()));
    m.insert(
        "cover_url".to_owned(),
        string(match post.cover.is_empty() {
            true => String::new(),
            false => escape(&site.asset_url(&post.cover)),
        }),
    );
    m.insert("content".to_owned(), string(post.content.as_str()));
    m.insert(
        "structured_data".to_owned(),
        string(post.structured_data.as_str()),
    );
    m
}
