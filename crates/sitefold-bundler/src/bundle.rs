//! Bundle accumulation and final assembly.
//!
//! The [`Bundle`] is the single build context threaded through every
//! pipeline component: an append-only list of statement fragments plus an
//! append-only list of style rules. Finalizing consumes the bundle, so a
//! build can only serialize it once.

use thiserror::Error;

use crate::minify;

/// Bundle assembly errors.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The rule list could not be serialized into the injection block.
    #[error("rule serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for bundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;

/// One unit of generated statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    origin: Option<String>,
    text: String,
}

impl Fragment {
    /// Originating file, when the fragment is a folded-in source file.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// The statement text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Accumulator for fragments and style rules, assembled once at the end.
#[derive(Debug)]
pub struct Bundle {
    fragments: Vec<Fragment>,
    rules: Vec<String>,
    minify: bool,
}

impl Bundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new(minify: bool) -> Self {
        Self {
            fragments: Vec::new(),
            rules: Vec::new(),
            minify,
        }
    }

    /// Append a generated statement fragment.
    pub fn push_fragment(&mut self, text: impl Into<String>) {
        self.fragments.push(Fragment {
            origin: None,
            text: text.into(),
        });
    }

    /// Append a source file's content as a fragment.
    ///
    /// The originating name is written as a banner comment ahead of the
    /// fragment at assembly time.
    pub fn push_file_fragment(&mut self, origin: impl Into<String>, text: impl Into<String>) {
        self.fragments.push(Fragment {
            origin: Some(origin.into()),
            text: text.into(),
        });
    }

    /// Append one style rule. Insertion order is cascade order.
    pub fn push_rule(&mut self, rule: impl Into<String>) {
        self.rules.push(rule.into());
    }

    /// Append a sequence of style rules in order.
    pub fn extend_rules(&mut self, rules: impl IntoIterator<Item = String>) {
        self.rules.extend(rules);
    }

    /// Accumulated rules, in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Accumulated fragments, in emission order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Assemble the final artifact text.
    ///
    /// Fixed layout: opening self-invoking wrapper, the style-injection
    /// block when any rules exist, every fragment in emission order, closing
    /// wrapper. The rule array is serialized as JSON and inserted by index
    /// at runtime so array order stays cascade order. Compaction runs last
    /// when enabled.
    pub fn finalize(self) -> Result<String> {
        let mut out = String::new();
        out.push_str("!function(){\n");

        if !self.rules.is_empty() {
            out.push_str("!function (styles) {\n");
            out.push_str("  var t = document.createElement(\"style\");\n");
            out.push_str("  document.getElementsByTagName(\"head\")[0].appendChild(t);\n");
            out.push_str("  t.type = \"text/css\";\n");
            out.push_str("  for (var k = 0; k < styles.length; k += 1) {\n");
            out.push_str("    t.sheet.insertRule(styles[k], k);\n");
            out.push_str("  }\n");
            out.push_str("}(");
            out.push_str(&serde_json::to_string(&self.rules)?);
            out.push_str(");\n");
        }

        for fragment in &self.fragments {
            if let Some(origin) = &fragment.origin {
                out.push_str("\n\n\n/* ======= ");
                out.push_str(origin);
                out.push_str(" ======= */\n");
            }
            out.push_str(&fragment.text);
            if !fragment.text.ends_with('\n') {
                out.push('\n');
            }
        }

        out.push_str("}();\n");

        Ok(if self.minify {
            minify::compact(&out)
        } else {
            out
        })
    }
}
