//! Reference-style link expansion, run before line encoding.

use crate::decode::rewrite_segments;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\[([^\]]+)\]:[ \t]*(\S.*?)[ \t]*$").expect("definition regex is valid")
});
static DEFINITION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\[[^\]]+\]:[ \t]*\S.*(\n|$)").expect("definition line regex is valid")
});
static FULL_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\[([^\]]*)\]").expect("reference regex is valid"));
static SHORTCUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\](\()?").expect("shortcut regex is valid"));

/// Expands `[text][ref]` and `[ref]` links against `[ref]: url` definitions
/// and removes the definition lines. Fenced code is left untouched.
pub fn expand_link_references(markdown: &str) -> String {
    let mut definitions: HashMap<String, String> = HashMap::new();
    rewrite_segments(
        markdown,
        |prose| {
            for caps in DEFINITION.captures_iter(prose) {
                definitions.insert(caps[1].to_lowercase(), caps[2].to_string());
            }
            String::new()
        },
        |_| String::new(),
    );
    if definitions.is_empty() {
        return markdown.to_string();
    }
    log::debug!("Expanding {} link reference definitions", definitions.len());

    rewrite_segments(
        markdown,
        |prose| {
            let text = DEFINITION_LINE.replace_all(prose, "");
            let text = FULL_REFERENCE.replace_all(&text, |caps: &Captures| {
                let label = &caps[1];
                let key = if caps[2].is_empty() { label } else { &caps[2] };
                match definitions.get(&key.to_lowercase()) {
                    Some(url) => format!("[{label}]({url})"),
                    None => format!("[{label}]"),
                }
            });
            SHORTCUT
                .replace_all(&text, |caps: &Captures| {
                    if caps.get(2).is_some() {
                        return caps[0].to_string();
                    }
                    match definitions.get(&caps[1].to_lowercase()) {
                        Some(url) => format!("[{}]({url})", &caps[1]),
                        None => caps[0].to_string(),
                    }
                })
                .into_owned()
        },
        str::to_string,
    )
}
