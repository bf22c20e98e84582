//! Root markup document extraction.
//!
//! Pattern-based extraction of the pieces the bundle reconstructs at
//! runtime: `<meta>` declarations, inline `<style>` blocks, stylesheet
//! `<link>` references, and the `<body>` element. This deliberately stays at
//! the regex level rather than a full markup parser; extraction order and
//! emitted text are the documented behavior.

use regex::Regex;

/// A `<meta>` declaration with its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    /// Attribute name/value pairs as written.
    pub attrs: Vec<(String, String)>,
}

/// A stylesheet reference found in a `<link rel="stylesheet">` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetRef {
    /// Absolute remote URL; stays a live link element at runtime.
    Remote(String),
    /// Local path, folded into the bundle's rule list.
    Local(String),
}

/// URL scheme prefixes treated as remote.
const REMOTE_PREFIXES: [&str; 2] = ["http://", "https://"];

impl StylesheetRef {
    /// Classify an href as remote or local.
    #[must_use]
    pub fn classify(href: &str) -> Self {
        if REMOTE_PREFIXES.iter().any(|p| href.starts_with(p)) {
            Self::Remote(href.to_string())
        } else {
            Self::Local(href.to_string())
        }
    }
}

/// The `<body>` element: its own attributes and inner markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyTag {
    /// Attribute name/value pairs from the body tag itself.
    pub attrs: Vec<(String, String)>,
    /// Raw inner markup, uncleaned.
    pub inner: String,
}

/// Scanner over a root markup document.
#[derive(Debug)]
pub struct DocumentScanner {
    meta_re: Regex,
    attr_re: Regex,
    style_re: Regex,
    link_re: Regex,
    rel_stylesheet_re: Regex,
    href_re: Regex,
    body_re: Regex,
    comment_re: Regex,
    indent_re: Regex,
    tag_gap_re: Regex,
}

impl Default for DocumentScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentScanner {
    /// Create a scanner with its pattern set compiled up front.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta_re: Regex::new(r"<meta\s+([\s\S]*?)/?>").unwrap(),
            attr_re: Regex::new(r#"([^\s=/>"']+)\s*=\s*["']([^"']*)["']"#).unwrap(),
            style_re: Regex::new(r"<style[\s\S]*?>([\s\S]*?)</style>").unwrap(),
            link_re: Regex::new(r"<link([\s\S]*?)(?:/>|></link>)").unwrap(),
            rel_stylesheet_re: Regex::new(r#"(?i)rel=["']?stylesheet["']?"#).unwrap(),
            href_re: Regex::new(r#"href=["']([^"']*)["']"#).unwrap(),
            body_re: Regex::new(r"<body\s*([\s\S]*?)>([\s\S]*?)</body>").unwrap(),
            // HTML comments, plus a bare `>` preceded by only whitespace.
            comment_re: Regex::new(r"(?:\s+>|<!--[\s\S]*?-->)").unwrap(),
            indent_re: Regex::new(r"(?:[\n\r]+\s+|[\n\r\s]+$)").unwrap(),
            tag_gap_re: Regex::new(r">[\s]+<").unwrap(),
        }
    }

    /// All `<meta>` declarations in source order.
    #[must_use]
    pub fn meta_tags(&self, src: &str) -> Vec<MetaTag> {
        self.meta_re
            .captures_iter(src)
            .map(|caps| MetaTag {
                attrs: self.attr_pairs(&caps[1]),
            })
            .collect()
    }

    /// Inner text of every inline `<style>` block, in source order.
    #[must_use]
    pub fn inline_styles(&self, src: &str) -> Vec<String> {
        self.style_re
            .captures_iter(src)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Every stylesheet `<link>` reference, classified remote/local.
    ///
    /// Links whose `rel` is not `stylesheet` (case/quote-insensitive) or
    /// that carry no quoted `href` are skipped.
    #[must_use]
    pub fn stylesheet_links(&self, src: &str) -> Vec<StylesheetRef> {
        self.link_re
            .captures_iter(src)
            .filter(|caps| self.rel_stylesheet_re.is_match(&caps[1]))
            .filter_map(|caps| {
                self.href_re
                    .captures(&caps[1])
                    .map(|href| StylesheetRef::classify(&href[1]))
            })
            .collect()
    }

    /// The `<body>` element, if present.
    #[must_use]
    pub fn body(&self, src: &str) -> Option<BodyTag> {
        self.body_re.captures(src).map(|caps| BodyTag {
            attrs: self.attr_pairs(&caps[1]),
            inner: caps[2].to_string(),
        })
    }

    /// Clean body markup for embedding in a single-quoted string literal.
    ///
    /// In order: drop HTML comments and stray whitespace-preceded `>`;
    /// delete newline+indent runs and trailing whitespace; collapse
    /// whitespace between a tag closer and the next tag opener to one
    /// space. Later steps observe earlier steps' output, so the order is
    /// load-bearing.
    #[must_use]
    pub fn clean_markup(&self, inner: &str) -> String {
        let cleaned = self.comment_re.replace_all(inner, "");
        let cleaned = self.indent_re.replace_all(&cleaned, "");
        let cleaned = self.tag_gap_re.replace_all(&cleaned, "> <");
        cleaned.into_owned()
    }

    /// Attribute name/value pairs from a tag's attribute text, in order.
    fn attr_pairs(&self, attr_text: &str) -> Vec<(String, String)> {
        self.attr_re
            .captures_iter(attr_text)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect()
    }
}
