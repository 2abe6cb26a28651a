//! Renders template values to files. Defines the [`Render`] capability that
//! every output target goes through, the [`Writer`] for the HTML pages (one
//! page per post plus the index), and the [`Error`] type shared by all
//! targets.

use crate::collection::Collection;
use crate::config::Site;
use crate::post::Post;
use crate::value::{post_fields, site_fields};
use gtmpl::{Context, Template, Value};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Applies a template to a [`Value`], producing the bytes of one output file.
pub trait Render {
    fn render(&self, data: Value) -> std::result::Result<Vec<u8>, String>;
}

impl Render for Template {
    fn render(&self, data: Value) -> std::result::Result<Vec<u8>, String> {
        let mut out = Vec::new();
        self.execute(&mut out, &Context::from(data)?)?;
        Ok(out)
    }
}

/// Applies `template` to `data` and writes the result to `path`.
pub fn write_file(template: &dyn Render, data: Value, path: &Path) -> Result<()> {
    let bytes = template.render(data).map_err(|err| Error::Template {
        path: path.to_owned(),
        err,
    })?;
    std::fs::write(path, bytes).map_err(|err| Error::Io {
        path: path.to_owned(),
        err,
    })?;
    debug!("Wrote `{}`", path.display());
    Ok(())
}

/// Responsible for templating and writing the HTML pages to disk.
pub struct Writer<'a> {
    /// The template for post pages.
    pub posts_template: &'a dyn Render,

    /// The template for the index page.
    pub index_template: &'a dyn Render,

    /// The directory every page is written into. It must already exist.
    pub output_directory: &'a Path,

    /// The site identity, made available to every page.
    pub site: &'a Site,
}

impl Writer<'_> {
    /// Writes `{slug}.html` for every post.
    pub fn write_post_pages(&self, posts: &Collection) -> Result<()> {
        for post in posts.posts() {
            write_file(
                self.posts_template,
                post_page(post, self.site),
                &self.output_directory.join(post.file_name()),
            )?;
        }
        Ok(())
    }

    /// Writes `index.html`, listing every post newest first.
    pub fn write_index(&self, posts: &Collection) -> Result<()> {
        write_file(
            self.index_template,
            index_page(posts, self.site),
            &self.output_directory.join("index.html"),
        )
    }
}

/// The value a post page is rendered from: the post's fields (see
/// [`post_fields`]) merged with the site's (see [`site_fields`]).
pub fn post_page(post: &Post, site: &Site) -> Value {
    let mut m = site_fields(site);
    m.extend(post_fields(post, site));
    Value::Object(m)
}

/// The value the index page is rendered from: the site's fields plus `posts`,
/// an array of post values in collection order, and `last_updated`, the
/// newest post's ISO date (empty when there are no posts).
pub fn index_page(posts: &Collection, site: &Site) -> Value {
    let mut m = site_fields(site);
    m.insert(
        "posts".to_owned(),
        Value::Array(
            posts
                .posts()
                .iter()
                .map(|p| Value::Object(post_fields(p, site)))
                .collect(),
        ),
    );
    m.insert(
        "last_updated".to_owned(),
        Value::String(posts.newest().map(Post::iso_date).unwrap_or_default()),
    );
    Value::Object(m)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template { path: PathBuf, err: String },

    /// An error writing the output file.
    Io { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template { path, err } => {
                write!(f, "rendering `{}`: {}", path.display(), err)
            }
            Error::Io { path, err } => {
                write!(f, "writing `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template { .. } => None,
            Error::Io { err, .. } => Some(err),
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::post::test::{site, Stub};
    use crate::post::Parser;

    pub fn template(text: &str) -> Template {
        let mut template = Template::default();
        if let Err(e) = template.parse(text) {
            panic!("parsing test template: {}", e);
        }
        template
    }

    pub fn collection(sources: &[(&str, &str)]) -> Collection {
        let site = site();
        let parser = Parser::new(&site, &Stub);
        let posts = sources
            .iter()
            .map(|(file_name, input)| parser.parse_post(file_name, input))
            .collect::<crate::post::Result<Vec<Post>>>()
            .unwrap();
        Collection::new(posts).unwrap()
    }

    fn render(template: &Template, data: Value) -> String {
        String::from_utf8(Render::render(template, data).unwrap()).unwrap()
    }

    #[test]
    fn test_post_page() {
        let posts = collection(&[("hello.md", "---\ntitle: Hello\ndate: 2025-01-01\n---\n# Hi")]);
        let page = render(
            &template("<title>{{.title}}</title>{{.content}}<!-- {{.analytics_id}} -->"),
            post_page(&posts.posts()[0], &site()),
        );
        assert_eq!("<title>Hello</title><p># Hi</p><!-- G-TEST -->", page);
    }

    #[test]
    fn test_index_lists_posts_newest_first() {
        let posts = collection(&[
            ("old.md", "---\ntitle: Old\ndate: 2025-01-01\n---\n"),
            ("new.md", "---\ntitle: New\ndate: 2025-06-01\n---\n"),
        ]);
        let page = render(
            &template(r#"{{range .posts}}<a href="{{.file_name}}">{{.title}}</a>{{end}}"#),
            index_page(&posts, &site()),
        );
        assert_eq!(
            r#"<a href="new.html">New</a><a href="old.html">Old</a>"#,
            page
        );
    }

    #[test]
    fn test_index_of_nothing() {
        let page = render(
            &template("[{{range .posts}}{{.title}}{{end}}]{{.last_updated}}"),
            index_page(&Collection::default(), &site()),
        );
        assert_eq!("[]", page);
    }

    #[test]
    fn test_writer() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let posts = collection(&[
            ("a.md", "---\ntitle: A\ndate: 2025-01-01\n---\n"),
            ("b.md", "---\ntitle: B\ndate: 2025-01-02\n---\n"),
        ]);
        let posts_template = template("{{.title}}");
        let index_template = template("{{range .posts}}{{.slug}} {{end}}");
        let site = site();
        let writer = Writer {
            posts_template: &posts_template,
            index_template: &index_template,
            output_directory: dir.path(),
            site: &site,
        };
        writer.write_post_pages(&posts).unwrap();
        writer.write_index(&posts).unwrap();
        assert_eq!("A", std::fs::read_to_string(dir.path().join("a.html"))?);
        assert_eq!("B", std::fs::read_to_string(dir.path().join("b.html"))?);
        assert_eq!("b a ", std::fs::read_to_string(dir.path().join("index.html"))?);
        Ok(())
    }

    #[test]
    fn test_missing_output_directory() {
        let posts = collection(&[("a.md", "---\ntitle: A\ndate: 2025-01-01\n---\n")]);
        let posts_template = template("{{.title}}");
        let site = site();
        let writer = Writer {
            posts_template: &posts_template,
            index_template: &posts_template,
            output_directory: Path::new("./no/such/directory"),
            site: &site,
        };
        match writer.write_post_pages(&posts) {
            Err(Error::Io { path, .. }) => {
                assert_eq!(Path::new("./no/such/directory/a.html"), path)
            }
            other => panic!("wanted Io error; found {:?}", other),
        }
    }

    struct Broken;

    impl Render for Broken {
        fn render(&self, _: Value) -> std::result::Result<Vec<u8>, String> {
            Err("no such field".to_owned())
        }
    }

    #[test]
    fn test_template_failure_names_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_file(&Broken, Value::Nil, &dir.path().join("index.html")).unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
        assert!(err.to_string().contains("index.html"), "{}", err);
        assert!(!dir.path().join("index.html").exists());
    }
}
