//! Top-level stylesheet rule extraction.
//!
//! Splits concatenated stylesheet text into discrete brace-balanced rules
//! with a depth-counting scanner. Comments are elided before scanning: a
//! brace inside `/* ... */` would otherwise desynchronize the depth count.

use regex::Regex;

/// Extract the syntactically top-level `{...}` rules from stylesheet text.
///
/// Rules are returned in source order with comments removed and leading
/// indentation (including the run of whitespace after each newline)
/// stripped. Trailing text that never closes back to depth zero is dropped;
/// unbalanced input loses its tail rather than erroring.
pub fn extract_rules(text: &str) -> Vec<String> {
    let comment_re = Regex::new(r"/\*[\s\S]*?\*/").unwrap();
    let indent_re = Regex::new(r"(?:^\s*|[\r\n]\s*)").unwrap();

    let stripped = comment_re.replace_all(text, "");
    let stripped: &str = &stripped;

    let mut rules = Vec::new();
    let mut depth: i32 = 0;
    let mut window = 0usize;

    for (i, byte) in stripped.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let rule = indent_re.replace_all(&stripped[window..=i], "");
                    rules.push(rule.into_owned());
                    window = i + 1;
                }
            }
            _ => {}
        }
    }

    rules
}
