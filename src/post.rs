//! Defines the [`Post`], [`Parser`], and [`Error`] types, and the logic for
//! reading posts from the file system into memory.

use crate::config::Site;
use crate::frontmatter::{self, Frontmatter};
use crate::markdown::{self, Markdown};
use crate::structured_data::BlogPosting;
use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const MARKDOWN_EXTENSION: &str = ".md";
pub const HTML_EXTENSION: &str = ".html";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

/// A validated blog post. Every post has a non-empty title and a date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub title: String,
    pub date: NaiveDate,

    /// Empty when the frontmatter has no `description`.
    pub description: String,

    /// A path relative to the site root, empty when the post has no cover.
    pub cover: String,

    /// The source file name without `.md`. It names the output file and
    /// identifies the post everywhere else.
    pub slug: String,

    /// The rendered body. Trusted HTML; templates embed it unescaped.
    pub content: String,

    /// The post's [`BlogPosting`] as script-safe JSON.
    pub structured_data: String,
}

impl Post {
    /// The output file name, e.g. `hello.html`.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.slug, HTML_EXTENSION)
    }

    /// The source file name, e.g. `hello.md`.
    pub fn source_file_name(&self) -> String {
        format!("{}{}", self.slug, MARKDOWN_EXTENSION)
    }

    /// `YYYY-MM-DD`.
    pub fn iso_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// `Jan 2, 2006`.
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// RFC 3339 at midnight UTC.
    pub fn timestamp(&self) -> String {
        self.date.format("%Y-%m-%dT00:00:00Z").to_string()
    }
}

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// The site identity, used to build each post's structured data.
    site: &'a Site,

    /// Renders post bodies.
    markdown: &'a dyn Markdown,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(site: &'a Site, markdown: &'a dyn Markdown) -> Parser<'a> {
        Parser { site, markdown }
    }

    /// Parses a single [`Post`] from the source `file_name` (which must end in
    /// `.md`) and the file's contents.
    pub fn parse_post(&self, file_name: &str, input: &str) -> Result<Post> {
        let (frontmatter, body) = frontmatter::split(input).map_err(|err| match err {
            frontmatter::Error::MissingMetadataBlock => Error::MissingMetadataBlock {
                file: file_name.to_owned(),
            },
            frontmatter::Error::MissingClosingDelimiter => Error::MissingClosingDelimiter {
                file: file_name.to_owned(),
            },
        })?;
        let Frontmatter {
            title,
            date,
            description,
            cover,
        } = frontmatter;

        if title.trim().is_empty() {
            return Err(Error::MissingField {
                field: "title",
                file: file_name.to_owned(),
            });
        }

        let date = match is_date_shaped(&date) {
            true => NaiveDate::parse_from_str(&date, DATE_FORMAT).ok(),
            false => None,
        }
        .ok_or_else(|| Error::InvalidDate {
            raw: date.clone(),
            file: file_name.to_owned(),
        })?;

        let mut post = Post {
            title: title.trim().to_owned(),
            date,
            description,
            cover,
            slug: file_name
                .strip_suffix(MARKDOWN_EXTENSION)
                .unwrap_or(file_name)
                .to_owned(),
            content: String::default(),
            structured_data: String::default(),
        };

        post.content = self
            .markdown
            .to_html(body)
            .map_err(|err| Error::Render {
                file: file_name.to_owned(),
                err,
            })?;
        post.structured_data = BlogPosting::new(self.site, &post)
            .to_json()
            .map_err(|err| Error::StructuredData {
                file: file_name.to_owned(),
                err,
            })?;
        Ok(post)
    }

    /// Searches `source_directory` for post files (extension `.md`) and
    /// parses each one, stopping at the first failure. Subdirectories and
    /// other files are skipped. Files are read in file-name order; the result
    /// is not sorted by date (see [`crate::collection::Collection`]).
    ///
    /// Each post file must be structured as follows:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2021-04-16
    /// description: Optional summary
    /// cover: optional/cover.png
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        for result in WalkDir::new(source_directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            let file_name = entry.file_name().to_string_lossy();
            if entry.file_type().is_dir() || !file_name.ends_with(MARKDOWN_EXTENSION) {
                continue;
            }

            let input = std::fs::read_to_string(entry.path()).map_err(|err| Error::Io {
                path: entry.path().to_owned(),
                err,
            })?;
            let post = self.parse_post(&file_name, &input)?;
            debug!("Parsed post `{}` ({})", post.slug, post.iso_date());
            posts.push(post);
        }
        Ok(posts)
    }
}

// Reports whether `date` is laid out as `YYYY-MM-DD`. `%Y` alone admits
// signed and short years.
fn is_date_shaped(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object. Every variant names the
/// offending file.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file doesn't begin with a `---` fence.
    MissingMetadataBlock { file: String },

    /// Returned when the starting fence was found but the ending one was
    /// missing.
    MissingClosingDelimiter { file: String },

    /// Returned when a required field is absent or blank.
    MissingField { field: &'static str, file: String },

    /// Returned when the date is absent or isn't `YYYY-MM-DD`. `raw` is the
    /// value as written (empty when absent).
    InvalidDate { raw: String, file: String },

    /// Returned when the markdown body can't be rendered.
    Render { file: String, err: markdown::Error },

    /// Returned when the structured data can't be serialized.
    StructuredData { file: String, err: serde_json::Error },

    /// Returned when a source file can't be read.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned when the source directory can't be listed.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingMetadataBlock { file } => {
                write!(f, "parsing post `{}`: post must begin with `---`", file)
            }
            Error::MissingClosingDelimiter { file } => {
                write!(f, "parsing post `{}`: missing closing `---`", file)
            }
            Error::MissingField { field, file } => {
                write!(f, "parsing post `{}`: missing `{}`", file, field)
            }
            Error::InvalidDate { raw, file } => write!(
                f,
                "parsing post `{}`: invalid date {:?}, expected YYYY-MM-DD",
                file, raw
            ),
            Error::Render { file, err } => {
                write!(f, "rendering post `{}`: {}", file, err)
            }
            Error::StructuredData { file, err } => {
                write!(f, "serializing structured data for `{}`: {}", file, err)
            }
            Error::Io { path, err } => {
                write!(f, "reading `{}`: {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingMetadataBlock { .. }
            | Error::MissingClosingDelimiter { .. }
            | Error::MissingField { .. }
            | Error::InvalidDate { .. } => None,
            Error::Render { err, .. } => Some(err),
            Error::StructuredData { err, .. } => Some(err),
            Error::Io { err, .. } => Some(err),
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator while listing the source directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
