// tests/common/mod.rs
//! Shared helpers for the integration suites.

#![allow(dead_code)]

use regex::Regex;
use storage2md::ConverterConfig;

pub fn config() -> ConverterConfig {
    ConverterConfig::default()
}

/// Drops CDATA sections so their payload is not mistaken for markup.
fn strip_cdata(storage: &str) -> String {
    let cdata = Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>").unwrap();
    cdata.replace_all(storage, "").into_owned()
}

/// Checks that every opening tag has a matching close, in order.
///
/// Self-closing tags are ignored. Returns the first mismatch as an error.
pub fn check_tag_balance(storage: &str) -> Result<(), String> {
    let tag = Regex::new(r"<(/?)([A-Za-z][\w:-]*)[^>]*?(/?)>").unwrap();
    let mut stack: Vec<String> = Vec::new();
    for caps in tag.captures_iter(&strip_cdata(storage)) {
        let name = caps[2].to_string();
        if !caps[3].is_empty() {
            continue;
        }
        if caps[1].is_empty() {
            stack.push(name);
        } else {
            match stack.pop() {
                Some(open) if open == name => {}
                Some(open) => return Err(format!("</{name}> closes <{open}>")),
                None => return Err(format!("</{name}> without opener")),
            }
        }
    }
    match stack.last() {
        Some(open) => Err(format!("<{open}> never closed")),
        None => Ok(()),
    }
}

pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
