//! Splits a post source file into its [`Frontmatter`] and markdown body.
//!
//! The frontmatter block is fenced by `---` lines and must be the first thing
//! in the file. Only four keys are recognized (`title`, `date`, `description`
//! and `cover`); each is a single-line value. Anything else is ignored.

use std::fmt;

const FENCE: &str = "---";

/// The raw, unvalidated metadata of a post. Absent keys are empty strings;
/// validation happens in [`crate::post`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: String,
    pub date: String,
    pub description: String,
    pub cover: String,
}

impl Frontmatter {
    fn parse(block: &str) -> Frontmatter {
        let mut frontmatter = Frontmatter::default();
        for line in block.lines() {
            let (field, value) = if let Some(v) = line.strip_prefix("title:") {
                (&mut frontmatter.title, v)
            } else if let Some(v) = line.strip_prefix("date:") {
                (&mut frontmatter.date, v)
            } else if let Some(v) = line.strip_prefix("description:") {
                (&mut frontmatter.description, v)
            } else if let Some(v) = line.strip_prefix("cover:") {
                (&mut frontmatter.cover, v)
            } else {
                continue;
            };
            *field = unquote(value.trim()).to_owned();
        }
        frontmatter
    }
}

// Strips one layer of matching quotes so `title: "a: b"` reads as `a: b`.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == FENCE
}

/// Splits `input` into its [`Frontmatter`] and the body that follows the
/// closing fence.
pub fn split(input: &str) -> Result<(Frontmatter, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut lines = input.split_inclusive('\n');
    match lines.next() {
        Some(first) if is_fence(first) => {}
        _ => return Err(Error::MissingMetadataBlock),
    }

    let yaml_start = input.find('\n').map_or(input.len(), |i| i + 1);
    let mut offset = yaml_start;
    for line in lines {
        let next = offset + line.len();
        if is_fence(line) {
            return Ok((Frontmatter::parse(&input[yaml_start..offset]), &input[next..]));
        }
        offset = next;
    }
    Err(Error::MissingClosingDelimiter)
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a structural problem with a post's frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Returned when the first line of the file isn't a `---` fence.
    MissingMetadataBlock,

    /// Returned when the opening fence was found but no closing fence
    /// follows it.
    MissingClosingDelimiter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingMetadataBlock => write!(f, "post must begin with `---`"),
            Error::MissingClosingDelimiter => write!(f, "missing closing `---`"),
        }
    }
}

impl std::error::Error for Error {}
