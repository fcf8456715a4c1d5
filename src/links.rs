//! Rewrites markdown-style anchors (`href="foo.md"`) in rendered HTML into
//! their published counterparts (`href="foo.html"`). This is a pure string
//! rewrite over the HTML fragment and must run *after* markdown conversion:
//! the renderer passes link destinations through untouched, so `.md`
//! references survive into the fragment exactly as the author wrote them.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Matches an anchor reference ending in `.md`, with an optional fragment
/// identifier (`#...`). Group 1 is the path without the extension, group 2
/// the fragment (including the `#`) if present.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"href="([^"]+?)\.md(#[^"]*)?""##).unwrap());

const CHAPTERS_PREFIX: &str = "chapters/";

/// Rewrites every internal `.md` anchor in `html` to point at the
/// corresponding `.html` file in the flat output tree:
///
/// * external references (`http://` or `https://`) are left untouched;
/// * a leading `chapters/` prefix is stripped;
/// * any remaining directory components are discarded, keeping only the
///   final path segment (source directories flatten into one output
///   directory, so a name collision silently wins; accepted limitation);
/// * the `.md` suffix becomes `.html`; the fragment identifier survives.
///
/// Fragments without `.md` anchors are returned borrowed and unchanged, so
/// the rewrite is idempotent.
pub fn rewrite_links(html: &str) -> Cow<'_, str> {
    LINK_PATTERN.replace_all(html, |caps: &Captures| {
        let path = &caps[1];
        let fragment = caps.get(2).map_or("", |m| m.as_str());

        if path.starts_with("http://") || path.starts_with("https://") {
            return caps[0].to_string();
        }

        let path = path.strip_prefix(CHAPTERS_PREFIX).unwrap_or(path);
        let path = match path.rfind('/') {
            Some(i) => &path[i + 1..],
            None => path,
        };

        format!(r#"href="{}.html{}""#, path, fragment)
    })
}
