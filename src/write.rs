//! Responsible for templating and writing HTML pages to disk from
//! [`Chapter`] sources. Chapter pages and the README-based landing page
//! share one page template; projects without a README get a generated
//! chapter-list index instead.

use crate::chapter::Chapter;
use crate::config::SiteConfig;
use crate::links::rewrite_links;
use crate::markdown;
use gtmpl::{Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Templates and writes HTML pages into the output directory.
pub struct Writer<'a> {
    /// The template for chapter pages and the README-based index.
    page_template: Template,

    /// The template for the fallback chapter-list index.
    index_template: Template,

    config: &'a SiteConfig,

    /// The year spliced into every page footer.
    year: i64,
}

impl<'a> Writer<'a> {
    /// Parses the configured template strings into a ready [`Writer`].
    pub fn new(config: &'a SiteConfig, year: i64) -> Result<Writer<'a>> {
        Ok(Writer {
            page_template: parse_template(&config.page_template)?,
            index_template: parse_template(&config.index_template)?,
            config,
            year,
        })
    }

    /// Renders every [`Chapter`] to its own HTML file in the output
    /// directory. Chapters sharing an output name overwrite each other in
    /// order, the last one winning.
    pub fn write_chapters(&self, chapters: &[Chapter]) -> Result<()> {
        for chapter in chapters {
            self.write_chapter(chapter)?;
        }
        Ok(())
    }

    /// Writes the landing page. A root README renders through the page
    /// template like a chapter, only with no breadcrumb and the site title
    /// as page title; projects without a README get the chapter-list
    /// template over every chapter in discovery order.
    pub fn write_index(&self, chapters: &[Chapter]) -> Result<()> {
        let path = self.config.output_directory.join("index.html");
        match self.config.readme.is_file() {
            true => {
                let text = fs::read_to_string(&self.config.readme)?;
                let content = self.render_fragment(&text)?;
                let value =
                    self.page_value(&self.config.site_title, "", &content);
                self.write_page(&path, &self.page_template, value)
            }
            false => {
                self.write_page(&path, &self.index_template, self.index_value(chapters))
            }
        }
    }

    fn write_chapter(&self, chapter: &Chapter) -> Result<()> {
        let text = fs::read_to_string(&chapter.source)?;
        let content = self.render_fragment(&text)?;
        let value = self.page_value(
            &chapter.title,
            &self.config.navigation,
            &content,
        );
        self.write_page(
            &self.config.output_directory.join(&chapter.output_name),
            &self.page_template,
            value,
        )
    }

    /// Converts chapter markdown into its final HTML fragment: markdown
    /// rendering followed by the `.md` to `.html` link rewrite.
    fn render_fragment(&self, markdown_text: &str) -> Result<String> {
        let html = markdown::to_html(markdown_text)?;
        Ok(rewrite_links(&html).into_owned())
    }

    /// Takes a single templated page, renders it, and writes it to disk.
    fn write_page(
        &self,
        path: &Path,
        template: &Template,
        value: Value,
    ) -> Result<()> {
        let context = gtmpl::Context::from(value).map_err(Error::Template)?;
        template.execute(&mut fs::File::create(path)?, &context)?;
        Ok(())
    }

    /// Builds the template [`Value`] for a page rendered through the shared
    /// page template. The result is a [`Value::Object`] with the fields the
    /// template names: `title`, `site_title`, `tagline`, `copyright`, `nav`,
    /// `content`, and `year`. `nav` and `content` are spliced in raw.
    fn page_value(&self, title: &str, nav: &str, content: &str) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(title.to_owned()));
        m.insert(
            "site_title".to_owned(),
            Value::String(self.config.site_title.clone()),
        );
        m.insert(
            "tagline".to_owned(),
            Value::String(self.config.tagline.clone()),
        );
        m.insert(
            "copyright".to_owned(),
            Value::String(self.config.copyright.clone()),
        );
        m.insert("nav".to_owned(), Value::String(nav.to_owned()));
        m.insert("content".to_owned(), Value::String(content.to_owned()));
        m.insert("year".to_owned(), Value::from(self.year));
        Value::Object(m)
    }

    /// Builds the template [`Value`] for the chapter-list index: the shared
    /// site fields plus a `chapters` array of `{title, output_name}`
    /// objects.
    fn index_value(&self, chapters: &[Chapter]) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "site_title".to_owned(),
            Value::String(self.config.site_title.clone()),
        );
        m.insert(
            "tagline".to_owned(),
            Value::String(self.config.tagline.clone()),
        );
        m.insert(
            "copyright".to_owned(),
            Value::String(self.config.copyright.clone()),
        );
        m.insert("year".to_owned(), Value::from(self.year));
        m.insert(
            "chapters".to_owned(),
            Value::Array(chapters.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}

fn parse_template(text: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(text)?;
    Ok(template)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
