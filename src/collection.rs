//! Defines [`Collection`], the sorted, read-only set of posts that every
//! render target consumes.

use crate::post::Post;
use std::collections::HashMap;
use std::fmt;

/// Posts ordered newest first. Posts sharing a date keep the order they were
/// given in (file-name order when they come from
/// [`crate::post::Parser::parse_posts`]).
#[derive(Debug, Default)]
pub struct Collection {
    posts: Vec<Post>,
}

impl Collection {
    /// Sorts `posts` by date, descending, after checking that no two posts
    /// would be written to the same output file. Slugs are compared
    /// case-insensitively since `Hello.html` and `hello.html` collide on
    /// case-insensitive file systems.
    pub fn new(mut posts: Vec<Post>) -> Result<Collection> {
        let mut seen: HashMap<String, &Post> = HashMap::with_capacity(posts.len());
        for post in &posts {
            if let Some(first) = seen.insert(post.slug.to_lowercase(), post) {
                return Err(Error::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: first.source_file_name(),
                    second: post.source_file_name(),
                });
            }
        }

        // `sort_by` is stable, so ties keep their read order.
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(Collection { posts })
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// The most recent post, if there are any.
    pub fn newest(&self) -> Option<&Post> {
        self.posts.first()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an inconsistency across posts.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when two source files map to the same output file.
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DuplicateSlug {
                slug,
                first,
                second,
            } => write!(
                f,
                "`{}` and `{}` would both be written as `{}.html`",
                first, second, slug
            ),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn post(slug: &str, date: &str) -> Post {
        Post {
            title: slug.to_owned(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: String::new(),
            cover: String::new(),
            slug: slug.to_owned(),
            content: String::new(),
            structured_data: String::new(),
        }
    }

    fn slugs(collection: &Collection) -> Vec<&str> {
        collection.posts().iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_newest_first() -> Result<()> {
        let collection = Collection::new(vec![
            post("january", "2025-01-01"),
            post("june", "2025-06-01"),
        ])?;
        assert_eq!(vec!["june", "january"], slugs(&collection));
        assert_eq!(Some("june"), collection.newest().map(|p| p.slug.as_str()));
        Ok(())
    }

    #[test]
    fn test_ordering_holds_for_every_pair() -> Result<()> {
        let collection = Collection::new(vec![
            post("c", "2024-03-09"),
            post("a", "2025-01-01"),
            post("e", "2023-12-31"),
            post("b", "2025-06-01"),
            post("d", "2024-03-10"),
        ])?;
        for (i, a) in collection.posts().iter().enumerate() {
            for b in &collection.posts()[i + 1..] {
                assert!(a.date >= b.date, "{} before {}", a.slug, b.slug);
            }
        }
        Ok(())
    }

    #[test]
    fn test_ties_keep_read_order() -> Result<()> {
        let collection = Collection::new(vec![
            post("a", "2025-01-01"),
            post("b", "2025-01-01"),
            post("c", "2025-02-01"),
            post("d", "2025-01-01"),
        ])?;
        assert_eq!(vec!["c", "a", "b", "d"], slugs(&collection));
        Ok(())
    }

    #[test]
    fn test_empty() -> Result<()> {
        let collection = Collection::new(Vec::new())?;
        assert!(collection.is_empty());
        assert_eq!(0, collection.len());
        assert!(collection.newest().is_none());
        Ok(())
    }

    #[test]
    fn test_duplicate_slugs_differing_in_case() {
        assert_eq!(
            Error::DuplicateSlug {
                slug: "Hello".to_owned(),
                first: "hello.md".to_owned(),
                second: "Hello.md".to_owned(),
            },
            Collection::new(vec![post("hello", "2025-01-01"), post("Hello", "2025-02-01")])
                .unwrap_err()
        );
    }
}
