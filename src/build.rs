//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the output site: preparing the output tree
//! and staging assets ([`crate::assets`]), discovering chapters
//! ([`crate::chapter`]), and rendering chapter pages plus the index
//! ([`crate::write`]).

use crate::assets::{self, Error as AssetsError};
use crate::chapter;
use crate::config::SiteConfig;
use crate::log;
use crate::write::{Error as WriteError, Writer};
use chrono::{Datelike, Utc};
use std::fmt;
use std::path::PathBuf;

/// Builds the site described by `config`, start to finish. The chapters
/// directory is checked up front: when it is missing the build fails before
/// the old output tree is touched, so an aborted run never leaves behind a
/// half-created site. Every other failure is fatal too, but may leave an
/// incomplete output tree behind.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    if !config.chapters_directory.is_dir() {
        return Err(Error::MissingChaptersDirectory(
            config.chapters_directory.clone(),
        ));
    }

    assets::prepare_output(&config.output_directory)?;
    assets::stage_assets(config)?;

    let chapters = chapter::discover(
        &config.chapters_directory,
        &config.auxiliary_directories,
    )?;
    log!("chapters"; "rendering {} chapters", chapters.len());

    let writer = Writer::new(config, i64::from(Utc::now().year()))?;
    writer.write_chapters(&chapters)?;

    let index_source = match config.readme.is_file() {
        true => "README",
        false => "the chapter list",
    };
    log!("index"; "writing index.html from {}", index_source);
    writer.write_index(&chapters)?;

    log!("build"; "site written to {}", config.output_directory.display());
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during output
/// preparation, asset staging, chapter discovery, and page writing.
#[derive(Debug)]
pub enum Error {
    /// Returned when the required chapters directory is absent. The build
    /// aborts before creating any output.
    MissingChaptersDirectory(PathBuf),

    /// Returned for errors preparing the output tree or staging assets.
    Assets(AssetsError),

    /// Returned for errors during chapter discovery.
    Discover(chapter::Error),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingChaptersDirectory(path) => {
                write!(
                    f,
                    "chapters directory does not exist: {}",
                    path.display()
                )
            }
            Error::Assets(err) => err.fmt(f),
            Error::Discover(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingChaptersDirectory(_) => None,
            Error::Assets(err) => Some(err),
            Error::Discover(err) => Some(err),
            Error::Write(err) => Some(err),
        }
    }
}

impl From<AssetsError> for Error {
    /// Converts [`AssetsError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: AssetsError) -> Error {
        Error::Assets(err)
    }
}

impl From<chapter::Error> for Error {
    /// Converts [`chapter::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: chapter::Error) -> Error {
        Error::Discover(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_file(directory: &Path, name: &str, contents: &str) {
        fs::write(directory.join(name), contents).unwrap();
    }

    /// Lays out a small project: two chapters, one glossary entry, an asset,
    /// a figure, and a README linking to the first chapter.
    fn project_fixture(root: &Path) {
        let chapters = root.join("chapters");
        fs::create_dir(&chapters).unwrap();
        write_file(
            &chapters,
            "01-intro.md",
            "# Introduction\n\nOn to [history](chapters/02-history.md).\n",
        );
        write_file(
            &chapters,
            "02-history.md",
            "# History\n\nBack to [the start](chapters/01-intro.md#introduction).\n",
        );

        let glossary = root.join("glossary");
        fs::create_dir(&glossary).unwrap();
        write_file(&glossary, "terms.md", "# Terms\n\ncommodity money\n");

        let assets = root.join("assets");
        fs::create_dir(&assets).unwrap();
        write_file(&assets, "logo.png", "png bytes");

        let figures = root.join("figures");
        fs::create_dir(&figures).unwrap();
        write_file(&figures, "fig1.svg", "svg bytes");

        write_file(
            root,
            "README.md",
            "# Welcome\n\nStart with [the introduction](chapters/01-intro.md).\n",
        );
    }

    #[test]
    fn test_build_site() -> Result<()> {
        let root = tempfile::tempdir().unwrap();
        project_fixture(root.path());
        let config = SiteConfig::load(root.path()).unwrap();

        build_site(&config)?;

        let site = &config.output_directory;
        // One HTML file per source file, plus the index.
        for name in
            ["01-intro.html", "02-history.html", "terms.html", "index.html"]
        {
            assert!(site.join(name).is_file(), "missing {}", name);
        }

        let intro = fs::read_to_string(site.join("01-intro.html")).unwrap();
        assert!(intro.contains(r#"href="02-history.html""#));
        let history =
            fs::read_to_string(site.join("02-history.html")).unwrap();
        assert!(history.contains(r#"href="01-intro.html#introduction""#));

        let index = fs::read_to_string(site.join("index.html")).unwrap();
        assert!(index.contains("Welcome"));
        assert!(index.contains(r#"href="01-intro.html""#));
        assert!(!index.contains("chapter-list"));

        assert!(site.join("assets/style.css").is_file());
        assert_eq!(
            "png bytes",
            fs::read_to_string(site.join("assets/uploads/logo.png")).unwrap()
        );
        assert_eq!(
            "svg bytes",
            fs::read_to_string(site.join("assets/figures/fig1.svg")).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_build_site_fallback_index() -> Result<()> {
        let root = tempfile::tempdir().unwrap();
        project_fixture(root.path());
        fs::remove_file(root.path().join("README.md")).unwrap();
        let config = SiteConfig::load(root.path()).unwrap();

        build_site(&config)?;

        let index =
            fs::read_to_string(config.output_directory.join("index.html"))
                .unwrap();
        let intro = index
            .find(r#"<li><a href="01-intro.html">Introduction</a></li>"#)
            .unwrap();
        let history = index
            .find(r#"<li><a href="02-history.html">History</a></li>"#)
            .unwrap();
        let terms = index
            .find(r#"<li><a href="terms.html">Terms</a></li>"#)
            .unwrap();
        assert!(intro < history && history < terms);
        Ok(())
    }

    #[test]
    fn test_build_site_twice_is_byte_identical() -> Result<()> {
        let root = tempfile::tempdir().unwrap();
        project_fixture(root.path());
        let config = SiteConfig::load(root.path()).unwrap();

        let snapshot = |site: &Path| -> Vec<(PathBuf, Vec<u8>)> {
            let mut files: Vec<(PathBuf, Vec<u8>)> =
                walkdir::WalkDir::new(site)
                    .into_iter()
                    .map(|entry| entry.unwrap())
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| {
                        (
                            entry.path().to_owned(),
                            fs::read(entry.path()).unwrap(),
                        )
                    })
                    .collect();
            files.sort();
            files
        };

        build_site(&config)?;
        let first = snapshot(&config.output_directory);
        build_site(&config)?;
        let second = snapshot(&config.output_directory);
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_build_site_collision_last_wins() -> Result<()> {
        let root = tempfile::tempdir().unwrap();
        let chapters = root.path().join("chapters");
        fs::create_dir(&chapters).unwrap();
        write_file(&chapters, "dup.md", "# From Chapters\n");
        let glossary = root.path().join("glossary");
        fs::create_dir(&glossary).unwrap();
        write_file(&glossary, "dup.md", "# From Glossary\n");
        let config = SiteConfig::load(root.path()).unwrap();

        build_site(&config)?;

        // Both sources render to dup.html; the auxiliary directory is
        // processed after the primary one, so its version survives.
        let html =
            fs::read_to_string(config.output_directory.join("dup.html"))
                .unwrap();
        assert!(html.contains("From Glossary"));
        assert!(!html.contains("From Chapters"));
        Ok(())
    }

    #[test]
    fn test_build_site_missing_chapters_directory() {
        let root = tempfile::tempdir().unwrap();
        let config = SiteConfig::load(root.path()).unwrap();

        match build_site(&config) {
            Err(Error::MissingChaptersDirectory(path)) => {
                assert_eq!(config.chapters_directory, path)
            }
            other => panic!(
                "wanted MissingChaptersDirectory; got {:?}",
                other.err()
            ),
        }
        // The failed run must not create any output.
        assert!(!config.output_directory.exists());
    }
}
