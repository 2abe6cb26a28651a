//! Builds the schema.org `BlogPosting` description embedded in each post page
//! as `application/ld+json`.

use crate::config::Site;
use crate::post::Post;
use serde::Serialize;

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct BlogPosting<'a> {
    #[serde(rename = "@context")]
    pub context: &'static str,

    #[serde(rename = "@type")]
    pub kind: &'static str,

    pub headline: &'a str,

    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'a str,

    #[serde(rename = "datePublished")]
    pub date_published: String,

    pub author: Person<'a>,

    pub publisher: Person<'a>,

    #[serde(rename = "mainEntityOfPage")]
    pub main_entity_of_page: WebPage,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Person<'a> {
    #[serde(rename = "@type")]
    pub kind: &'static str,

    pub name: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct WebPage {
    #[serde(rename = "@type")]
    pub kind: &'static str,

    #[serde(rename = "@id")]
    pub id: String,
}

impl<'a> BlogPosting<'a> {
    /// Describes `post`. The author and publisher are always the site's
    /// author; the image is only present when the post has a cover.
    pub fn new(site: &'a Site, post: &'a Post) -> BlogPosting<'a> {
        BlogPosting {
            context: "https://schema.org",
            kind: "BlogPosting",
            headline: &post.title,
            description: &post.description,
            date_published: post.timestamp(),
            author: Person {
                kind: "Person",
                name: &site.author,
                url: Some(site.url.as_str()),
            },
            publisher: Person {
                kind: "Person",
                name: &site.author,
                url: None,
            },
            main_entity_of_page: WebPage {
                kind: "WebPage",
                id: site.post_url(&post.slug),
            },
            image: match post.cover.is_empty() {
                true => None,
                false => Some(site.asset_url(&post.cover)),
            },
        }
    }

    /// Serializes to compact JSON that can be placed inside a `<script>`
    /// element as-is: `<`, `>` and `&` never appear literally, so neither
    /// `</script>` nor `<!--` can end the block early.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let json = serde_json::to_string(self)?;
        let mut escaped = String::with_capacity(json.len());
        for c in json.chars() {
            match c {
                '<' => escaped.push_str("\\u003c"),
                '>' => escaped.push_str("\\u003e"),
                '&' => escaped.push_str("\\u0026"),
                '\u{2028}' => escaped.push_str("\\u2028"),
                '\u{2029}' => escaped.push_str("\\u2029"),
                c => escaped.push(c),
            }
        }
        Ok(escaped)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    fn site() -> Site {
        Site {
            url: "https://example.com".to_owned(),
            title: "Example".to_owned(),
            author: "Jo Writer".to_owned(),
            analytics_id: None,
        }
    }

    fn post(description: &str, cover: &str) -> Post {
        Post {
            title: "Hello".to_owned(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            description: description.to_owned(),
            cover: cover.to_owned(),
            slug: "hello".to_owned(),
            content: String::new(),
            structured_data: String::new(),
        }
    }

    fn to_value(site: &Site, post: &Post) -> serde_json::Result<Value> {
        serde_json::from_str(&BlogPosting::new(site, post).to_json()?)
    }

    #[test]
    fn test_full_shape() -> serde_json::Result<()> {
        let site = site();
        assert_eq!(
            json!({
                "@context": "https://schema.org",
                "@type": "BlogPosting",
                "headline": "Hello",
                "description": "A greeting",
                "datePublished": "2025-01-01T00:00:00Z",
                "author": {"@type": "Person", "name": "Jo Writer", "url": "https://example.com"},
                "publisher": {"@type": "Person", "name": "Jo Writer"},
                "mainEntityOfPage": {"@type": "WebPage", "@id": "https://example.com/hello.html"},
                "image": "https://example.com/img.png"
            }),
            to_value(&site, &post("A greeting", "img.png"))?
        );
        Ok(())
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() -> serde_json::Result<()> {
        let site = site();
        let value = to_value(&site, &post("", ""))?;
        assert!(value.get("image").is_none());
        assert!(value.get("description").is_none());
        Ok(())
    }

    #[test]
    fn test_script_breaking_characters_are_escaped() -> serde_json::Result<()> {
        let site = site();
        let post = post("</script><script>alert(1)</script> & more\u{2028}\u{2029}", "");
        let json = BlogPosting::new(&site, &post).to_json()?;
        assert!(!json.contains('<'));
        assert!(!json.contains('&'));
        assert!(!json.contains(['\u{2028}', '\u{2029}']));
        assert!(json.contains(r"more\u2028\u2029"), "{}", json);
        assert_eq!(
            "</script><script>alert(1)</script> & more\u{2028}\u{2029}",
            serde_json::from_str::<Value>(&json)?["description"]
        );
        Ok(())
    }
}
