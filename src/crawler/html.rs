//! HTML to plain text and outbound links.

use regex::{Captures, Regex};
use url::Url;

use crate::error::{Result, ScourError};

/// Text and links extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedPage {
    /// Visible text with markup removed.
    pub text: String,

    /// Absolute http(s) links in first-occurrence order, without fragments
    /// and without duplicates.
    pub links: Vec<Url>,
}

/// Turns raw HTML into a [`CleanedPage`].
pub trait HtmlCleaner: Send + Sync {
    /// Clean `html` fetched from `base`; relative links resolve against `base`.
    fn clean(&self, base: &Url, html: &str) -> CleanedPage;
}

/// Regex-based cleaner.
///
/// Comments go first, then anchors are collected, then `head`, `style`,
/// `script`, `noscript` and `svg` blocks are dropped, remaining tags become
/// spaces and character entities are decoded. Every HTML5 named entity is
/// recognized; an unknown one becomes a space.
#[derive(Debug, Clone)]
pub struct RegexHtmlCleaner {
    comments: Regex,
    anchors: Regex,
    blocks: Regex,
    tags: Regex,
    entities: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ScourError::analysis(format!("invalid HTML pattern: {e}")))
}

impl RegexHtmlCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            comments: compile(r"(?s)<!--.*?-->")?,
            anchors: compile(
                r#"(?is)<a\s[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
            )?,
            blocks: compile(
                r"(?is)<head\b.*?</head\s*>|<style\b.*?</style\s*>|<script\b.*?</script\s*>|<noscript\b.*?</noscript\s*>|<svg\b.*?</svg\s*>",
            )?,
            tags: compile(r"(?s)<[^>]*>")?,
            entities: compile(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]*);")?,
        })
    }

    fn links(&self, base: &Url, html: &str) -> Vec<Url> {
        let mut links: Vec<Url> = Vec::new();
        for captures in self.anchors.captures_iter(html) {
            let Some(href) = captures
                .get(1)
                .or_else(|| captures.get(2))
                .or_else(|| captures.get(3))
            else {
                continue;
            };

            let href = self.decode_entities(href.as_str().trim());
            let Ok(mut link) = base.join(&href) else {
                log::debug!("ignoring unparsable link {href:?} on {base}");
                continue;
            };
            if !matches!(link.scheme(), "http" | "https") {
                continue;
            }
            link.set_fragment(None);
            if !links.contains(&link) {
                links.push(link);
            }
        }
        links
    }

    fn decode_entities(&self, text: &str) -> String {
        self.entities
            .replace_all(text, |captures: &Captures| {
                decode_entity(&captures[0]).unwrap_or_else(|| " ".to_string())
            })
            .into_owned()
    }
}

/// Decode one `&...;` reference, or `None` when it names no known entity.
fn decode_entity(entity: &str) -> Option<String> {
    let decoded = html_escape::decode_html_entities(entity);
    (decoded != entity).then(|| decoded.into_owned())
}

impl HtmlCleaner for RegexHtmlCleaner {
    fn clean(&self, base: &Url, html: &str) -> CleanedPage {
        let html = self.comments.replace_all(html, " ");
        let links = self.links(base, &html);

        let html = self.blocks.replace_all(&html, " ");
        let text = self.tags.replace_all(&html, " ");
        let text = self.decode_entities(&text);

        CleanedPage { text, links }
    }
}
