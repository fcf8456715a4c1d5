//! Implements a custom [`push_html`] to give every heading a stable `id`
//! anchor. [`pulldown_cmark::html::push_html`] emits bare `<h1>` tags, but
//! chapter cross-references rely on fragment identifiers (e.g.
//! `foo.html#history`), so the renderer buffers each heading's events until
//! the closing tag and derives a slugified anchor from the accumulated text,
//! disambiguating duplicates within a document with a numeric suffix.

use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use pulldown_cmark::{Alignment, CodeBlockKind, CowStr, Event, LinkType, Tag};
use std::collections::HashSet;
use std::io;

enum TableState {
    Head,
    Body,
}

/// Accumulates the events between a heading's opening and closing tags:
/// `html` collects the rendered inner markup while `text` collects the plain
/// text that the anchor slug is derived from.
struct HeadingBuffer {
    level: u32,
    text: String,
    html: String,
}

impl HeadingBuffer {
    fn new(level: u32) -> Self {
        HeadingBuffer {
            level,
            text: String::default(),
            html: String::default(),
        }
    }
}

/// Renders markdown [`Event`]s into HTML, one event at a time, plus the
/// heading buffering described in the module docs.
struct HtmlRenderer {
    table_alignments: Vec<Alignment>,
    table_state: TableState,
    table_cell_index: usize,

    /// The heading currently being buffered, if any. Headings never nest, so
    /// a single slot suffices.
    heading: Option<HeadingBuffer>,

    /// Anchors already issued in this document.
    anchors: HashSet<String>,
}

impl<'a> HtmlRenderer {
    fn new() -> Self {
        HtmlRenderer {
            table_alignments: Vec::default(),
            table_state: TableState::Head,
            table_cell_index: usize::default(),
            heading: None,
            anchors: HashSet::default(),
        }
    }

    fn on_event<W: StrWrite>(
        &mut self,
        w: &mut W,
        event: Event<'a>,
    ) -> io::Result<()> {
        if let Some(mut heading) = self.heading.take() {
            if let Event::End(Tag::Heading(_)) = event {
                return self.flush_heading(w, heading);
            }
            match &event {
                Event::Text(text) => heading.text.push_str(text),
                Event::Code(code) => heading.text.push_str(code),
                _ => (),
            }
            let result = self.dispatch(&mut heading.html, event);
            self.heading = Some(heading);
            return result;
        }
        if let Event::Start(Tag::Heading(level)) = event {
            self.heading = Some(HeadingBuffer::new(level));
            return Ok(());
        }
        self.dispatch(w, event)
    }

    fn dispatch<W: StrWrite>(
        &mut self,
        w: &mut W,
        event: Event<'a>,
    ) -> io::Result<()> {
        match event {
            Event::Start(tag) => self.on_start(w, tag),
            Event::End(tag) => self.on_end(w, tag),
            Event::Code(code) => self.on_code(w, code),
            Event::FootnoteReference(name) => {
                w.write_str(
                    r##"<sup class="footnote-reference"><a href="#"##,
                )?;
                escape_html(&mut *w, &name)?;
                w.write_str(r#"">"#)?;
                escape_html(&mut *w, &name)?;
                w.write_str("</a></sup>")
            }
            Event::HardBreak => self.on_hard_break(w),
            Event::Html(html) => self.on_html(w, html),
            Event::Rule => self.on_rule(w),
            Event::SoftBreak => self.on_soft_break(w),
            Event::TaskListMarker(checked) => {
                self.on_task_list_marker(w, checked)
            }
            Event::Text(text) => self.on_text(w, text),
        }
    }

    /// Writes out a buffered heading, attaching the anchor derived from its
    /// text. Headings whose text slugifies to nothing are written without an
    /// `id` attribute.
    fn flush_heading<W: StrWrite>(
        &mut self,
        w: &mut W,
        heading: HeadingBuffer,
    ) -> io::Result<()> {
        match self.anchor(&heading.text) {
            None => write!(
                w,
                "<h{}>{}</h{}>",
                heading.level, heading.html, heading.level,
            ),
            Some(anchor) => write!(
                w,
                r#"<h{} id="{}">{}</h{}>"#,
                heading.level, anchor, heading.html, heading.level,
            ),
        }
    }

    /// Slugifies `text` into an anchor that is unique for this document.
    /// Duplicates pick up a numeric suffix (`foo`, `foo-1`, `foo-2`, ...).
    fn anchor(&mut self, text: &str) -> Option<String> {
        let base = slug::slugify(text);
        if base.is_empty() {
            return None;
        }
        let mut candidate = base.clone();
        let mut suffix = 1;
        while !self.anchors.insert(candidate.clone()) {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        Some(candidate)
    }

    fn on_start<W: StrWrite>(
        &mut self,
        w: &mut W,
        tag: Tag<'a>,
    ) -> io::Result<()> {
        match tag {
            Tag::BlockQuote => w.write_str("<blockquote>"),
            Tag::CodeBlock(kind) => match kind {
                CodeBlockKind::Fenced(info) => {
                    match info.split(' ').next().unwrap_or("") {
                        "" => w.write_str("<pre><code>"),
                        lang => {
                            w.write_str(r#"<pre><code class="language-"#)?;
                            w.write_str(lang)?;
                            w.write_str(r#"">"#)
                        }
                    }
                }
                CodeBlockKind::Indented => w.write_str("<pre><code>"),
            },
            Tag::Emphasis => w.write_str("<em>"),
            Tag::FootnoteDefinition(name) => {
                w.write_str(r#"<div class="footnote-definition" id=""#)?;
                escape_html(&mut *w, &name)?;
                w.write_str(r#"">"#)?;
                escape_html(&mut *w, &name)?;
                w.write_str(". &nbsp;")
            }
            Tag::Heading(size) => write!(w, "<h{}>", size),
            Tag::Image(_link_type, dest, title) => {
                // TODO: Handle alt text
                w.write_str(r#"<img src=""#)?;
                escape_href(&mut *w, &dest)?;
                w.write_str(r#"" alt="" title=""#)?;
                escape_html(&mut *w, &title)?;
                w.write_str(r#"">"#)
            }
            Tag::Item => w.write_str("<li>"),
            Tag::Link(LinkType::Email, dest, title) => {
                w.write_str(r#"<a href="mailto:"#)?;
                escape_href(&mut *w, &dest)?;
                w.write_str(r#"" title=""#)?;
                escape_html(&mut *w, &title)?;
                w.write_str(r#"">"#)
            }
            Tag::Link(_link_type, dest, title) => {
                w.write_str(r#"<a href=""#)?;
                escape_href(&mut *w, &dest)?;
                w.write_str(r#"" title=""#)?;
                escape_html(&mut *w, &title)?;
                w.write_str(r#"">"#)
            }
            Tag::List(None) => w.write_str("<ul>"),
            Tag::List(Some(1)) => w.write_str("<ol>"),
            Tag::List(Some(start)) => write!(w, r#"<ol start="{}">"#, start),
            Tag::Paragraph => w.write_str("<p>"),
            Tag::Strikethrough => w.write_str("<del>"),
            Tag::Strong => w.write_str("<strong>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                w.write_str("<table>")
            }
            Tag::TableHead => {
                self.table_state = TableState::Head;
                self.table_cell_index = 0;
                w.write_str("<thead><tr>")
            }
            Tag::TableRow => {
                self.table_cell_index = 0;
                w.write_str("<tr>")
            }
            Tag::TableCell => write!(
                w,
                "<{}{}>",
                match self.table_state {
                    TableState::Head => "th",
                    TableState::Body => "td",
                },
                match self.table_alignments.get(self.table_cell_index) {
                    Some(Alignment::Left) => r#" align="left""#,
                    Some(Alignment::Right) => r#" align="right""#,
                    Some(Alignment::Center) => r#" align="center""#,
                    _ => "",
                }
            ),
        }
    }

    fn on_end<W: StrWrite>(&mut self, w: &mut W, tag: Tag) -> io::Result<()> {
        match tag {
            Tag::BlockQuote => w.write_str("</blockquote>"),
            Tag::CodeBlock(_) => w.write_str("</code></pre>"),
            Tag::Emphasis => w.write_str("</em>"),
            Tag::FootnoteDefinition(_) => w.write_str("</div>"),
            Tag::Heading(level) => write!(w, "</h{}>", level),
            Tag::Image(_, _, _) => Ok(()), /* shouldn't happen, handled in
                                             * start */
            Tag::Item => w.write_str("</li>"),
            Tag::Link(_, _, _) => w.write_str("</a>"),
            Tag::List(Some(_)) => w.write_str("</ol>"),
            Tag::List(None) => w.write_str("</ul>"),
            Tag::Paragraph => w.write_str("</p>"),
            Tag::Strikethrough => w.write_str("</del>"),
            Tag::Strong => w.write_str("</strong>"),
            Tag::Table(_) => w.write_str("</tbody></table>"),
            Tag::TableHead => {
                self.table_state = TableState::Body;
                w.write_str("</tr></thead><tbody>")
            }
            Tag::TableRow => w.write_str("</tr>"),
            Tag::TableCell => {
                self.table_cell_index += 1;
                w.write_str(match self.table_state {
                    TableState::Head => "</th>",
                    TableState::Body => "</td>",
                })
            }
        }
    }

    fn on_text<W: StrWrite>(
        &mut self,
        w: &mut W,
        s: CowStr,
    ) -> io::Result<()> {
        escape_html(w, &s)
    }

    fn on_code<W: StrWrite>(
        &mut self,
        w: &mut W,
        s: CowStr,
    ) -> io::Result<()> {
        w.write_str("<code>")?;
        escape_html(&mut *w, &s)?;
        w.write_str("</code>")
    }

    fn on_html<W: StrWrite>(
        &mut self,
        w: &mut W,
        s: CowStr,
    ) -> io::Result<()> {
        w.write_str(&s)
    }

    fn on_soft_break<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("\n")
    }

    fn on_hard_break<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("<br />")
    }

    fn on_rule<W: StrWrite>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_str("<hr />")
    }

    fn on_task_list_marker<W: StrWrite>(
        &mut self,
        w: &mut W,
        checked: bool,
    ) -> io::Result<()> {
        write!(
            w,
            r#"<input disabled="" type="checkbox" {}/>"#,
            match checked {
                true => r#"checked="" "#,
                false => "",
            }
        )
    }
}

/// Converts [`Event`]s into an HTML string much like
/// [`pulldown_cmark::html::push_html`] except that headings come out with
/// slugified `id` anchors. See the module description for more details.
pub fn push_html<'a, I>(out: &mut String, events: I) -> io::Result<()>
where
    I: Iterator<Item = Event<'a>>,
{
    let mut renderer = HtmlRenderer::new();
    for event in events {
        renderer.on_event(out, event)?;
    }
    Ok(())
}
