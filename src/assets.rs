//! Output tree preparation and static asset staging. The output directory
//! is destroyed and recreated on every build; asset staging then merges the
//! project's `assets` and `figures` directories into the fresh tree and
//! writes the stylesheet afterwards, so it always ends up with the built-in
//! content no matter what was there before.

use crate::config::SiteConfig;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The stylesheet written to `assets/style.css` on every build.
const STYLESHEET: &str = r#":root {
  color-scheme: light;
  --text-color: #1a1a1a;
  --background-color: #fafafa;
  --accent-color: #0070f3;
  --border-color: #e0e0e0;
}

body {
  margin: 0;
  font-family: "Hiragino Sans", "Noto Sans JP", "Yu Gothic", system-ui, -apple-system, BlinkMacSystemFont, sans-serif;
  color: var(--text-color);
  background-color: var(--background-color);
  line-height: 1.7;
}

.site-header, .site-footer {
  text-align: center;
  padding: 2rem 1rem;
  background-color: white;
  border-bottom: 1px solid var(--border-color);
}

.site-footer {
  border-top: 1px solid var(--border-color);
  border-bottom: none;
}

.site-header a {
  text-decoration: none;
  color: inherit;
}

.container {
  max-width: 960px;
  margin: 0 auto;
  padding: 2rem 1.5rem 4rem;
  background-color: white;
  box-shadow: 0 4px 16px rgba(0, 0, 0, 0.05);
}

.chapter-list {
  list-style: none;
  padding: 0;
  margin: 0;
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
  gap: 1rem;
}

.chapter-list li {
  border: 1px solid var(--border-color);
  border-radius: 12px;
  padding: 1rem;
  background-color: #fff;
  transition: transform 0.2s ease, box-shadow 0.2s ease;
}

.chapter-list li:hover {
  transform: translateY(-4px);
  box-shadow: 0 8px 20px rgba(0, 0, 0, 0.1);
}

.chapter-list a {
  text-decoration: none;
  color: var(--text-color);
  font-weight: 600;
}

.breadcrumbs {
  margin-bottom: 1.5rem;
  font-size: 0.95rem;
}

.content h1 {
  font-size: 2.2rem;
  margin-top: 0;
}

.content img {
  max-width: 100%;
  height: auto;
}

pre code {
  display: block;
  padding: 1rem;
  background-color: #1e1e1e;
  color: #f4f4f4;
  overflow-x: auto;
  border-radius: 8px;
}

code {
  font-family: "Fira Code", "Source Code Pro", monospace;
  background-color: rgba(0, 112, 243, 0.1);
  padding: 0.1rem 0.3rem;
  border-radius: 4px;
}"#;

/// Removes any prior output directory and recreates it together with its
/// `assets` subdirectory. Deleting the old tree is irrecoverable, so callers
/// must not point this at a directory holding unrelated data. A directory
/// that doesn't exist yet is not an error.
pub fn prepare_output(output_directory: &Path) -> Result<()> {
    rmdir(output_directory)?;
    fs::create_dir_all(output_directory.join("assets"))?;
    Ok(())
}

/// Copies the project's `assets` directory into `assets/uploads` and its
/// `figures` directory into `assets/figures`, skipping either silently when
/// it doesn't exist, then writes the built-in stylesheet. The copies merge:
/// same-named files at the destination are overwritten, unrelated ones are
/// left alone.
pub fn stage_assets(config: &SiteConfig) -> Result<()> {
    let assets_root = config.output_directory.join("assets");
    if config.assets_directory.is_dir() {
        copy_dir(&config.assets_directory, &assets_root.join("uploads"))?;
    }
    if config.figures_directory.is_dir() {
        copy_dir(&config.figures_directory, &assets_root.join("figures"))?;
    }
    fs::write(assets_root.join("style.css"), STYLESHEET)?;
    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry?;
        // strip_prefix shouldn't fail since `src` is always an ancestor of
        // the entry path
        let target = dst.join(entry.path().strip_prefix(src).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn rmdir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

/// The result of a fallible asset-staging operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error preparing the output tree or staging assets.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for WalkDir I/O errors while copying asset trees.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Clean { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator when walking asset trees.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
