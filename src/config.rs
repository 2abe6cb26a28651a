//! Defines the [`Config`] and [`Site`] types. A project is a directory with a
//! fixed layout (`posts/`, `templates/`, `static/`, and the `public/` output
//! directory) and an optional `site.yaml` file overriding the built-in site
//! settings.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const DEFAULT_URL: &str = "https://example.com";
const DEFAULT_TITLE: &str = "Blog";
const DEFAULT_AUTHOR: &str = "Anonymous";
const DEFAULT_HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Site-wide identity shared by every render target. It is built once and
/// passed by reference; nothing reads it from global state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    /// The canonical base URL without a trailing slash, e.g.
    /// `https://example.com`.
    pub url: String,

    /// The site title, used by the index page and the feed.
    pub title: String,

    /// The author and publisher name.
    pub author: String,

    /// The analytics measurement ID, if any.
    pub analytics_id: Option<String>,
}

impl Site {
    /// Builds a [`Site`] after validating `url`. Any trailing slash is
    /// removed so that `{url}/{slug}.html` never contains `//`.
    pub fn new(
        url: &str,
        title: &str,
        author: &str,
        analytics_id: Option<String>,
    ) -> Result<Site> {
        Url::parse(url).map_err(|e| anyhow!("Invalid site url `{}`: {}", url, e))?;
        Ok(Site {
            url: url.trim_end_matches('/').to_owned(),
            title: title.to_owned(),
            author: author.to_owned(),
            analytics_id: analytics_id.filter(|id| !id.is_empty()),
        })
    }

    /// Returns the canonical URL for a post with the given slug.
    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/{}.html", self.url, slug)
    }

    /// Returns the absolute URL for a path relative to the site root.
    pub fn asset_url(&self, relative: &str) -> String {
        format!("{}/{}", self.url, relative.trim_start_matches('/'))
    }
}

impl Default for Site {
    fn default() -> Self {
        Site {
            url: DEFAULT_URL.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            author: DEFAULT_AUTHOR.to_owned(),
            analytics_id: None,
        }
    }
}

/// The on-disk shape of `site.yaml`. Every field is optional.
#[derive(Deserialize, Default)]
#[serde(default)]
struct SiteFile {
    url: Option<String>,
    title: Option<String>,
    author: Option<String>,
    analytics_id: Option<String>,
    highlight_theme: Option<String>,
}

pub struct Config {
    pub site: Site,
    pub posts_source_directory: PathBuf,
    pub templates_directory: PathBuf,
    pub static_source_directory: PathBuf,
    pub output_directory: PathBuf,
    pub highlight_theme: String,
}

impl Config {
    /// Resolves the project layout rooted at `dir`, reading `site.yaml` when
    /// it exists.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join("site.yaml");
        let file: SiteFile = if path.is_file() {
            serde_yaml::from_reader(open_site_file(&path)?)
                .map_err(|e| anyhow!("Loading `{}`: {}", path.display(), e))?
        } else {
            SiteFile::default()
        };
        Config::from_site_file(dir, file)
    }

    fn from_site_file(dir: &Path, file: SiteFile) -> Result<Config> {
        Ok(Config {
            site: Site::new(
                file.url.as_deref().unwrap_or(DEFAULT_URL),
                file.title.as_deref().unwrap_or(DEFAULT_TITLE),
                file.author.as_deref().unwrap_or(DEFAULT_AUTHOR),
                file.analytics_id,
            )?,
            posts_source_directory: dir.join("posts"),
            templates_directory: dir.join("templates"),
            static_source_directory: dir.join("static"),
            output_directory: dir.join("public"),
            highlight_theme: file
                .highlight_theme
                .unwrap_or_else(|| DEFAULT_HIGHLIGHT_THEME.to_owned()),
        })
    }
}

fn open_site_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| anyhow!("Opening site file `{}`: {}", path.display(), e))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_without_site_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!(Site::default(), config.site);
        assert_eq!(dir.path().join("posts"), config.posts_source_directory);
        assert_eq!(dir.path().join("public"), config.output_directory);
        assert_eq!(DEFAULT_HIGHLIGHT_THEME, config.highlight_theme);
        Ok(())
    }

    #[test]
    fn test_site_file_overrides() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("site.yaml"),
            "url: https://blog.example.org/\nauthor: Jo Writer\nanalytics_id: G-TEST\n",
        )?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!("https://blog.example.org", config.site.url);
        assert_eq!("Jo Writer", config.site.author);
        assert_eq!(DEFAULT_TITLE, config.site.title);
        assert_eq!(Some("G-TEST".to_owned()), config.site.analytics_id);
        Ok(())
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(Site::new("not a url", "t", "a", None).is_err());
    }

    #[test]
    fn test_asset_url_does_not_double_slashes() -> Result<()> {
        let site = Site::new("https://example.com/", "t", "a", None)?;
        assert_eq!("https://example.com/img.png", site.asset_url("/img.png"));
        assert_eq!("https://example.com/hello.html", site.post_url("hello"));
        Ok(())
    }
}
