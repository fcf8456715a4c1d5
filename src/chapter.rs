//! Defines the [`Chapter`] type and the logic for discovering chapters on
//! the file system. Discovery walks the primary chapters directory (which
//! must exist) followed by the auxiliary directories (which are skipped when
//! absent), yielding chapters in lexicographic filename order within each
//! directory.

use gtmpl_value::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, read_dir};
use std::path::{Path, PathBuf};

/// One discovered markdown source file and its derived title and output
/// file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// The path of the markdown source file.
    pub source: PathBuf,

    /// The display title, taken from the first heading line in the source,
    /// or the file's stem when no heading exists.
    pub title: String,

    /// The name of the HTML file this chapter renders to (e.g.
    /// `01-intro.html`).
    pub output_name: String,
}

impl From<&Chapter> for Value {
    /// Converts a [`Chapter`] into a template [`Value`]: a [`Value::Object`]
    /// with `title` and `output_name` fields, as consumed by the
    /// chapter-list index template.
    fn from(chapter: &Chapter) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(chapter.title.clone()));
        m.insert(
            "output_name".to_owned(),
            Value::String(chapter.output_name.clone()),
        );
        Value::Object(m)
    }
}

/// Searches `primary` and then each of the `auxiliary` directories for
/// chapter files (extension = `.md`) and returns the discovered [`Chapter`]s
/// in order. `primary` must exist; auxiliary directories that don't are
/// silently skipped. Chapters from different directories sharing a base name
/// will render to the same output file, the later one winning.
pub fn discover(
    primary: &Path,
    auxiliary: &[PathBuf],
) -> Result<Vec<Chapter>> {
    if !primary.is_dir() {
        return Err(Error::MissingChaptersDirectory(primary.to_owned()));
    }
    let mut chapters = scan_directory(primary)?;
    for directory in auxiliary {
        if directory.is_dir() {
            chapters.extend(scan_directory(directory)?);
        }
    }
    Ok(chapters)
}

fn scan_directory(directory: &Path) -> Result<Vec<Chapter>> {
    const MARKDOWN_EXTENSION: &str = ".md";

    let mut chapters = Vec::new();
    for result in read_dir(directory)? {
        let entry = result?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if !file_name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }
        let stem = &file_name[..file_name.len() - MARKDOWN_EXTENSION.len()];
        let text = fs::read_to_string(entry.path())?;
        chapters.push(Chapter {
            source: entry.path(),
            title: extract_title(&text, stem),
            output_name: format!("{}.html", stem),
        });
    }

    // read_dir yields entries in platform-dependent order; the paths share a
    // parent, so sorting them sorts by file name.
    chapters.sort_by(|a, b| a.source.cmp(&b.source));
    Ok(chapters)
}

/// Extracts a chapter title from its markdown `text`: the first line
/// beginning with one or more `#` characters (after trimming whitespace) is
/// the title, with the leading `#` run and any following whitespace
/// stripped. Falls back to `fallback` (the file stem) when no heading line
/// exists.
pub fn extract_title(text: &str, fallback: &str) -> String {
    for line in text.lines() {
        let stripped = line.trim();
        if stripped.starts_with('#') {
            return stripped.trim_start_matches('#').trim_start().to_owned();
        }
    }
    fallback.to_owned()
}

/// Represents the result of a [`Chapter`] discovery operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error discovering [`Chapter`] objects.
#[derive(Debug)]
pub enum Error {
    /// Returned when the required chapters directory is absent.
    MissingChaptersDirectory(PathBuf),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingChaptersDirectory(path) => {
                write!(f, "chapters directory does not exist: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingChaptersDirectory(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct TitleTestCase {
        text: &'static str,
        fallback: &'static str,
        wanted: &'static str,
    }

    fn title_test(test_case: &TitleTestCase) {
        let result = extract_title(test_case.text, test_case.fallback);
        assert_eq!(
            test_case.wanted, result,
            "wanted \"{}\"; found \"{}\"",
            test_case.wanted, result
        );
    }

    #[test]
    fn test_extract_title_first_heading() {
        title_test(&TitleTestCase {
            text: "# Chapter One\n\nbody text",
            fallback: "01-intro",
            wanted: "Chapter One",
        })
    }

    #[test]
    fn test_extract_title_subheading_level() {
        title_test(&TitleTestCase {
            text: "## Coinage\n",
            fallback: "02-coinage",
            wanted: "Coinage",
        })
    }

    #[test]
    fn test_extract_title_without_space_after_hashes() {
        title_test(&TitleTestCase {
            text: "###Banking",
            fallback: "03-banking",
            wanted: "Banking",
        })
    }

    #[test]
    fn test_extract_title_skips_leading_prose() {
        title_test(&TitleTestCase {
            text: "preface paragraph\n\n# Real Title",
            fallback: "04",
            wanted: "Real Title",
        })
    }

    #[test]
    fn test_extract_title_trims_indentation() {
        title_test(&TitleTestCase {
            text: "   # Indented Heading   ",
            fallback: "05",
            wanted: "Indented Heading",
        })
    }

    #[test]
    fn test_extract_title_fallback_when_no_heading() {
        title_test(&TitleTestCase {
            text: "no headings anywhere\njust prose\n",
            fallback: "06-notes",
            wanted: "06-notes",
        })
    }

    #[test]
    fn test_extract_title_empty_heading() {
        title_test(&TitleTestCase {
            text: "#",
            fallback: "07",
            wanted: "",
        })
    }

    fn write_file(directory: &Path, name: &str, contents: &str) {
        fs::write(directory.join(name), contents).unwrap();
    }

    #[test]
    fn test_discover_orders_within_directory() -> Result<()> {
        let root = tempfile::tempdir()?;
        let chapters_dir = root.path().join("chapters");
        fs::create_dir(&chapters_dir)?;
        write_file(&chapters_dir, "02-history.md", "# History");
        write_file(&chapters_dir, "01-intro.md", "# Introduction");
        write_file(&chapters_dir, "notes.txt", "not a chapter");

        let chapters = discover(&chapters_dir, &[])?;
        let names: Vec<&str> =
            chapters.iter().map(|c| c.output_name.as_str()).collect();
        assert_eq!(vec!["01-intro.html", "02-history.html"], names);
        assert_eq!("Introduction", chapters[0].title);
        assert_eq!("History", chapters[1].title);
        Ok(())
    }

    #[test]
    fn test_discover_appends_auxiliary_in_declared_order() -> Result<()> {
        let root = tempfile::tempdir()?;
        let chapters_dir = root.path().join("chapters");
        let glossary_dir = root.path().join("glossary");
        let references_dir = root.path().join("references");
        fs::create_dir(&chapters_dir)?;
        fs::create_dir(&glossary_dir)?;
        fs::create_dir(&references_dir)?;
        write_file(&chapters_dir, "01-intro.md", "# Introduction");
        write_file(&glossary_dir, "zz-terms.md", "# Terms");
        write_file(&references_dir, "aa-sources.md", "# Sources");

        let chapters = discover(
            &chapters_dir,
            &[glossary_dir.clone(), references_dir.clone()],
        )?;
        let names: Vec<&str> =
            chapters.iter().map(|c| c.output_name.as_str()).collect();
        // Primary first, then each auxiliary directory in declared order,
        // regardless of how the names would interleave alphabetically.
        assert_eq!(
            vec!["01-intro.html", "zz-terms.html", "aa-sources.html"],
            names
        );
        Ok(())
    }

    #[test]
    fn test_discover_skips_missing_auxiliary() -> Result<()> {
        let root = tempfile::tempdir()?;
        let chapters_dir = root.path().join("chapters");
        fs::create_dir(&chapters_dir)?;
        write_file(&chapters_dir, "01-intro.md", "body only");

        let chapters =
            discover(&chapters_dir, &[root.path().join("glossary")])?;
        assert_eq!(1, chapters.len());
        // No heading line, so the title falls back to the stem.
        assert_eq!("01-intro", chapters[0].title);
        Ok(())
    }

    #[test]
    fn test_discover_missing_primary() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("chapters");
        match discover(&missing, &[]) {
            Err(Error::MissingChaptersDirectory(path)) => {
                assert_eq!(missing, path)
            }
            other => panic!("wanted MissingChaptersDirectory; got {:?}", other),
        }
    }
}
