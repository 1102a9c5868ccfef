//! Character entity handling for storage markup.
//!
//! Storage documents mix XML's predefined entities with HTML named entities
//! (`&nbsp;`, `&mdash;`, ...). Unknown entities are kept verbatim rather than
//! rejected.

use once_cell::sync::Lazy;
use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};
use std::borrow::Cow;

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("entity regex is valid")
});

/// Resolves numeric character references and every HTML5 named entity.
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    ENTITY.replace_all(raw, |caps: &Captures| {
        let body = &caps[1];
        let numeric = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
            Some(u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
        } else {
            body.strip_prefix('#')
                .map(|dec| dec.parse::<u32>().ok().and_then(char::from_u32))
        };
        match numeric {
            Some(Some(c)) => c.to_string(),
            Some(None) => caps[0].to_string(),
            None => resolve_html5_entity(body)
                .map_or_else(|| caps[0].to_string(), str::to_string),
        }
    })
}

/// Escapes text for use in element content or a double-quoted attribute.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_named_and_numeric_references() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&#128203; &#x2713;"), "\u{1f4cb} \u{2713}");
        assert_eq!(decode_entities("x&nbsp;y"), "x\u{a0}y");
    }

    #[test]
    fn resolves_the_full_html5_entity_set() {
        assert_eq!(
            decode_entities("Caf&eacute; M&uuml;ller &auml; &hearts; &ccedil; &Omega;"),
            "Caf\u{e9} M\u{fc}ller \u{e4} \u{2665} \u{e7} \u{3a9}"
        );
    }

    #[test]
    fn keeps_unknown_or_bare_ampersands() {
        assert_eq!(decode_entities("R&D"), "R&D");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_entities("&#xFFFFFFFF;"), "&#xFFFFFFFF;");
    }

    #[test]
    fn escapes_attribute_sensitive_characters() {
        assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}
