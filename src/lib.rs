//! The library code for the `quillpost` static site generator. The
//! architecture can be generally broken down into two distinct steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::post`]) into a sorted
//!    [`crate::collection::Collection`]
//! 2. Rendering the collection into output files on disk
//!
//! The second step is made of four independent targets that all read the same
//! collection: one page per post and the index page ([`crate::write`]), the
//! Atom feed ([`crate::feed`]) and the sitemap ([`crate::sitemap`]). Each
//! target shapes the posts into a template value and hands it to a
//! [`crate::write::Render`] implementation, normally a `gtmpl` template loaded
//! from the project's `templates/` directory.
//!
//! Markdown rendering sits behind [`crate::markdown::Markdown`] so the
//! pipeline can run with a stub renderer in tests.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod collection;
pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod markdown;
pub mod post;
pub mod sitemap;
pub mod structured_data;
pub mod value;
pub mod write;
