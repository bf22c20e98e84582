//! Root document loading and statement generation.
//!
//! Converts the root markup document into the runtime statements that
//! rebuild it: meta-element construction, remote stylesheet links, body
//! attribute assignments, and the single innerHTML assignment carrying the
//! cleaned body markup. Inline styles and local linked stylesheets feed the
//! rule list instead.

use sitefold_core::SourceFile;
use sitefold_parser::{extract_rules, DocumentScanner, MetaTag, StylesheetRef};
use tracing::{debug, info};

use crate::{
    bundle::Bundle,
    resolver::{Include, Resolver},
};

/// Loader over the root markup document.
#[derive(Debug)]
pub struct DocumentLoader {
    scanner: DocumentScanner,
    root_id: String,
}

impl DocumentLoader {
    /// Create a loader targeting the given root element id.
    #[must_use]
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            scanner: DocumentScanner::new(),
            root_id: root_id.into(),
        }
    }

    /// Fold the document into the bundle.
    ///
    /// Emission order follows the four extraction passes: meta tags, inline
    /// styles, stylesheet links, then the body. Local linked stylesheets are
    /// queued on the resolver ahead of any manifest entries.
    pub fn load(&self, document: &SourceFile, bundle: &mut Bundle, resolver: &mut Resolver) {
        let src = document.text();
        info!(file = document.name(), "loading root document");

        let metas = self.scanner.meta_tags(src);
        debug!(count = metas.len(), "meta tags");
        for meta in &metas {
            bundle.push_fragment(meta_statement(meta));
        }

        for style in self.scanner.inline_styles(src) {
            bundle.extend_rules(extract_rules(&style));
        }

        for link in self.scanner.stylesheet_links(src) {
            match link {
                StylesheetRef::Remote(href) => {
                    debug!(href = %href, "remote stylesheet stays a live link");
                    bundle.push_fragment(remote_link_statement(&href));
                }
                StylesheetRef::Local(href) => resolver.enqueue(Include::Style(href)),
            }
        }

        if let Some(body) = self.scanner.body(src) {
            for (name, value) in &body.attrs {
                bundle.push_fragment(format!(
                    "document.body.setAttribute(\"{name}\", \"{value}\");"
                ));
            }

            let markup = self.scanner.clean_markup(&body.inner);
            bundle.push_fragment(format!(
                "document.getElementById(\"{}\").innerHTML =\n'{}';",
                self.root_id,
                escape_single_quotes(&markup),
            ));
        }
    }
}

/// Statement block constructing one meta element with its attributes.
fn meta_statement(meta: &MetaTag) -> String {
    let mut stmt = String::from("!function(){\n");
    stmt.push_str("  var t = document.createElement(\"meta\");\n");
    stmt.push_str("  document.getElementsByTagName(\"head\")[0].appendChild(t);\n");
    for (name, value) in &meta.attrs {
        stmt.push_str(&format!("  t.setAttribute(\"{name}\", \"{value}\");\n"));
    }
    stmt.push_str("}();");
    stmt
}

/// Statement block constructing one remote stylesheet link.
fn remote_link_statement(href: &str) -> String {
    let mut stmt = String::from("!function(){\n");
    stmt.push_str("  var t = document.createElement(\"link\");\n");
    stmt.push_str("  document.getElementsByTagName(\"head\")[0].appendChild(t);\n");
    stmt.push_str("  t.rel = \"stylesheet\";\n");
    stmt.push_str(&format!("  t.href = \"{href}\";\n"));
    stmt.push_str("}();");
    stmt
}

/// Escape the single-quote string delimiter in embedded markup.
fn escape_single_quotes(text: &str) -> String {
    text.replace('\'', "\\'")
}
