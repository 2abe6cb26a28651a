//! Support for creating the Atom feed from the post collection.

use crate::collection::Collection;
use crate::config::Site;
use crate::post::Post;
use crate::value::{escape, site_fields};
use crate::write::{self, write_file, Render};
use chrono::{DateTime, SecondsFormat, Utc};
use gtmpl::Value;
use std::collections::HashMap;
use std::path::Path;

/// Wraps `text` in a CDATA section. A literal `]]>` can't appear inside one,
/// so it is split across two sections.
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

/// The feed's `updated` timestamp: the newest post's date, or `now` when
/// there are no posts.
pub fn updated(posts: &Collection, now: DateTime<Utc>) -> String {
    match posts.newest() {
        Some(post) => post.timestamp(),
        None => now.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn entry(post: &Post, site: &Site) -> Value {
    let url = escape(&site.post_url(&post.slug));
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("id".to_owned(), Value::String(url.clone()));
    m.insert("url".to_owned(), Value::String(url));
    m.insert("title".to_owned(), Value::String(escape(&post.title)));
    m.insert("published".to_owned(), Value::String(post.timestamp()));
    m.insert("updated".to_owned(), Value::String(post.timestamp()));
    m.insert("summary".to_owned(), Value::String(cdata(&post.description)));
    m.insert("content".to_owned(), Value::String(cdata(&post.content)));
    Value::Object(m)
}

/// The value the feed template is rendered from: the site's fields plus
/// `feed_url`, `updated` (see [`updated`]) and `entries`, one per post in
/// collection order. Entry fields are `id`, `url`, `title`, `published`,
/// `updated`, and `summary` and `content`, which are complete CDATA
/// sections.
pub fn feed(posts: &Collection, site: &Site, now: DateTime<Utc>) -> Value {
    let mut m = site_fields(site);
    m.insert(
        "feed_url".to_owned(),
        Value::String(escape(&site.asset_url(FEED_FILE_NAME))),
    );
    m.insert("updated".to_owned(), Value::String(updated(posts, now)));
    m.insert(
        "entries".to_owned(),
        Value::Array(posts.posts().iter().map(|p| entry(p, site)).collect()),
    );
    Value::Object(m)
}

pub const FEED_FILE_NAME: &str = "feed.xml";

/// Renders the feed into `{output_directory}/feed.xml`.
pub fn write_feed(
    template: &dyn Render,
    posts: &Collection,
    site: &Site,
    now: DateTime<Utc>,
    output_directory: &Path,
) -> write::Result<()> {
    write_file(
        template,
        feed(posts, site, now),
        &output_directory.join(FEED_FILE_NAME),
    )
}
