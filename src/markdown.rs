//! Converts post bodies from markdown to HTML. The rest of the crate only
//! sees the [`Markdown`] trait; [`CommonMark`] is the implementation used for
//! real builds.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag};
use std::fmt;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Renders a markdown document into an HTML fragment. Implementations must be
/// deterministic: the same input always yields the same output.
pub trait Markdown {
    fn to_html(&self, markdown: &str) -> Result<String, Error>;
}

/// CommonMark with footnotes, smart punctuation, strikethrough, tables and
/// task lists. Fenced code blocks that name a language are highlighted.
pub struct CommonMark {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl CommonMark {
    /// Loads the bundled syntax definitions and the named highlighting theme.
    pub fn new(theme: &str) -> Result<CommonMark, Error> {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(theme)
            .ok_or_else(|| Error::UnknownTheme(theme.to_owned()))?;
        Ok(CommonMark {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    fn highlight(&self, language: &str, code: &str) -> Result<String, Error> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        Ok(highlighted_html_for_string(
            code,
            &self.syntax_set,
            syntax,
            &self.theme,
        )?)
    }
}

impl Markdown for CommonMark {
    fn to_html(&self, markdown: &str) -> Result<String, Error> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut events: Vec<Event> = Vec::new();
        // (language, code) of the fenced block currently being collected
        let mut fenced: Option<(CowStr, String)> = None;
        for ev in Parser::new_ext(markdown, options) {
            match ev {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang)))
                    if fenced.is_none() && !lang.is_empty() =>
                {
                    fenced = Some((lang, String::new()));
                }
                Event::Text(text) if fenced.is_some() => {
                    if let Some((_, code)) = fenced.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(Tag::CodeBlock(_)) if fenced.is_some() => {
                    if let Some((lang, code)) = fenced.take() {
                        let token = lang.split_whitespace().next().unwrap_or_default();
                        events.push(Event::Html(self.highlight(token, &code)?.into()));
                    }
                }
                ev => events.push(ev),
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        Ok(out)
    }
}

/// Represents an error converting markdown to HTML.
#[derive(Debug)]
pub enum Error {
    /// Returned when the configured highlighting theme doesn't exist.
    UnknownTheme(String),

    /// Returned when syntax highlighting a code block fails.
    Highlight(syntect::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownTheme(name) => {
                write!(f, "unknown highlighting theme `{}`", name)
            }
            Error::Highlight(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnknownTheme(_) => None,
            Error::Highlight(err) => Some(err),
        }
    }
}

impl From<syntect::Error> for Error {
    /// Converts a [`syntect::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator when highlighting.
    fn from(err: syntect::Error) -> Error {
        Error::Highlight(err)
    }
}
