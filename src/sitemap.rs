//! Support for creating `sitemap.xml`.

use crate::collection::Collection;
use crate::config::Site;
use crate::value::{escape, site_fields};
use crate::write::{self, write_file, Render};
use chrono::{DateTime, Utc};
use gtmpl::Value;
use std::collections::HashMap;
use std::path::Path;

pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";

/// The site's last-modified date: the newest post's ISO date, or `now`'s
/// date when there are no posts.
pub fn last_updated(posts: &Collection, now: DateTime<Utc>) -> String {
    match posts.newest() {
        Some(post) => post.iso_date(),
        None => now.format("%Y-%m-%d").to_string(),
    }
}

fn url(loc: String, lastmod: String) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("loc".to_owned(), Value::String(loc));
    m.insert("lastmod".to_owned(), Value::String(lastmod));
    Value::Object(m)
}

/// The value the sitemap template is rendered from: the site's fields plus
/// `last_updated` (see [`last_updated`]), `index_url`, and `urls`. `urls`
/// lists the index page first and then each post in collection order; each
/// item has a `loc` and a `lastmod`.
pub fn sitemap(posts: &Collection, site: &Site, now: DateTime<Utc>) -> Value {
    let last_updated = last_updated(posts, now);
    let index_url = escape(&format!("{}/", site.url));

    let mut urls = Vec::with_capacity(posts.len() + 1);
    urls.push(url(index_url.clone(), last_updated.clone()));
    for post in posts.posts() {
        urls.push(url(escape(&site.post_url(&post.slug)), post.iso_date()));
    }

    let mut m = site_fields(site);
    m.insert("last_updated".to_owned(), Value::String(last_updated));
    m.insert("index_url".to_owned(), Value::String(index_url));
    m.insert("urls".to_owned(), Value::Array(urls));
    Value::Object(m)
}

/// Renders the sitemap into `{output_directory}/sitemap.xml`.
pub fn write_sitemap(
    template: &dyn Render,
    posts: &Collection,
    site: &Site,
    now: DateTime<Utc>,
    output_directory: &Path,
) -> write::Result<()> {
    write_file(
        template,
        sitemap(posts, site, now),
        &output_directory.join(SITEMAP_FILE_NAME),
    )
}
