//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: parsing the posts
//! ([`crate::post`]), ordering them ([`crate::collection`]), rendering the
//! post pages and index ([`crate::write`]), the feed ([`crate::feed`]) and the
//! sitemap ([`crate::sitemap`]), and copying the static assets into the
//! output directory.
//!
//! The first error aborts the build. Files written before it stay on disk;
//! since every build regenerates everything, rerunning after fixing the
//! problem produces a complete site.

use crate::collection::{Collection, Error as CollectionError};
use crate::config::Config;
use crate::feed::write_feed;
use crate::markdown::{CommonMark, Error as MarkdownError, Markdown};
use crate::post::{Error as ParseError, Parser as PostParser};
use crate::sitemap::write_sitemap;
use crate::write::{Error as WriteError, Writer};
use chrono::{DateTime, Utc};
use gtmpl::Template;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const POST_TEMPLATE: &str = "post.html";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const FEED_TEMPLATE: &str = "feed.xml";
pub const SITEMAP_TEMPLATE: &str = "sitemap.xml";

/// Builds the site from a [`Config`] object, rendering markdown with
/// [`CommonMark`] and stamping empty feeds and sitemaps with the current
/// time.
pub fn build_site(config: &Config) -> Result<()> {
    let markdown = CommonMark::new(&config.highlight_theme)?;
    build_site_with(config, &markdown, Utc::now())
}

/// Builds the site from a [`Config`] object with an explicit markdown
/// renderer and clock. This calls into [`PostParser::parse_posts`],
/// [`Collection::new`], [`Writer`], [`write_feed`] and [`write_sitemap`]
/// which do the heavy-lifting.
pub fn build_site_with(config: &Config, markdown: &dyn Markdown, now: DateTime<Utc>) -> Result<()> {
    info!(
        "Building `{}` into `{}`",
        config.posts_source_directory.display(),
        config.output_directory.display()
    );

    // collect all posts
    let post_parser = PostParser::new(&config.site, markdown);
    let posts = Collection::new(post_parser.parse_posts(&config.posts_source_directory)?)?;
    info!("Parsed {} posts", posts.len());

    // Parse the template files before writing anything.
    let templates = &config.templates_directory;
    let posts_template = parse_template(&templates.join(POST_TEMPLATE))?;
    let index_template = parse_template(&templates.join(INDEX_TEMPLATE))?;
    let feed_template = parse_template(&templates.join(FEED_TEMPLATE))?;
    let sitemap_template = parse_template(&templates.join(SITEMAP_TEMPLATE))?;

    std::fs::create_dir_all(&config.output_directory).map_err(|err| Error::Io {
        path: config.output_directory.clone(),
        err,
    })?;

    // write the post and index pages
    let writer = Writer {
        posts_template: &posts_template,
        index_template: &index_template,
        output_directory: &config.output_directory,
        site: &config.site,
    };
    writer.write_post_pages(&posts)?;
    writer.write_index(&posts)?;

    // create the atom feed and the sitemap
    write_feed(
        &feed_template,
        &posts,
        &config.site,
        now,
        &config.output_directory,
    )?;
    write_sitemap(
        &sitemap_template,
        &posts,
        &config.site,
        now,
        &config.output_directory,
    )?;

    // copy static directory
    let copied = copy_static(&config.static_source_directory, &config.output_directory)?;
    info!("Copied {} static files", copied);

    info!("Wrote {} post pages, index, feed and sitemap", posts.len());
    Ok(())
}

/// Copies every file directly inside `src` into `dst`. Subdirectories are
/// skipped. Returns the number of files copied.
fn copy_static(src: &Path, dst: &Path) -> Result<usize> {
    let static_err = |path: &Path, err: std::io::Error| Error::Static {
        path: path.to_owned(),
        err,
    };

    let mut copied = 0;
    for entry in std::fs::read_dir(src).map_err(|e| static_err(src, e))? {
        let entry = entry.map_err(|e| static_err(src, e))?;
        let path = entry.path();
        if entry.file_type().map_err(|e| static_err(&path, e))?.is_dir() {
            continue;
        }
        std::fs::copy(&path, dst.join(entry.file_name())).map_err(|e| static_err(&path, e))?;
        debug!("Copied `{}`", path.display());
        copied += 1;
    }
    Ok(copied)
}

// Loads the template file and parses it into a template.
fn parse_template(path: &Path) -> Result<Template> {
    let contents = std::fs::read_to_string(path).map_err(|err| Error::OpenTemplateFile {
        path: path.to_owned(),
        err,
    })?;

    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|err| Error::ParseTemplate {
            path: path.to_owned(),
            err,
        })?;
    Ok(template)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, writing,
/// parsing template files, copying static files, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned when the markdown renderer can't be set up.
    Markdown(MarkdownError),

    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned when the parsed posts are inconsistent with each other.
    Collection(CollectionError),

    /// Returned for errors writing output files.
    Write(WriteError),

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: String },

    /// Returned for I/O problems while copying static files.
    Static { path: PathBuf, err: std::io::Error },

    /// Returned for other I/O errors.
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Markdown(err) => err.fmt(f),
            Error::Parse(err) => err.fmt(f),
            Error::Collection(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::Static { path, err } => {
                write!(f, "Copying static file '{}': {}", path.display(), err)
            }
            Error::Io { path, err } => {
                write!(f, "Creating '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Markdown(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Collection(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::Static { path: _, err } => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}

impl From<MarkdownError> for Error {
    /// Converts [`MarkdownError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: MarkdownError) -> Error {
        Error::Markdown(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<CollectionError> for Error {
    /// Converts [`CollectionError`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: CollectionError) -> Error {
        Error::Collection(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
