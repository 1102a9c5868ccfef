//! Inline spans, Markdown to storage.
//!
//! Substitutions run in a fixed order over one line of text. Fragments that
//! later rules must not see again (anchors, code spans, link targets) are
//! swapped for private-use placeholder tokens and restored at the end.

use super::emoji::encode_emoji;
use crate::encode::image;
use crate::model::{decode_entities, escape_xml};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const TOKEN_OPEN: char = '\u{e000}';
const TOKEN_CLOSE: char = '\u{e001}';

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect("inline regex is valid"));
    };
}

pattern!(AUTOLINK, r"<(https?://[^\s>]+)>");
pattern!(MAILTO, r"<([^\s@<>]+@[^\s@<>]+\.[^\s@<>]+)>");
pattern!(AMPERSAND, r"&(#\d+;)?");
pattern!(CODE_SPAN, r"`([^`]+)`");
pattern!(INLINE_IMAGE, r"!\[([^\]]*)\]\(([^)\s]+)\)");
pattern!(LINK_TARGET, r"\[([^\]]+)\]\(([^)\s]+)\)");
pattern!(STRIKE, r"~~([^~\n]+)~~");
pattern!(BOLD_ITALIC_STAR, r"\*\*\*([^*\n]+)\*\*\*");
pattern!(BOLD_ITALIC_UNDERSCORE, r"\b___([^_\n]+)___\b");
pattern!(BOLD_STAR, r"\*\*([^*\n]+)\*\*");
pattern!(BOLD_UNDERSCORE, r"\b__([^_\n]+)__\b");
pattern!(ITALIC_STAR, r"\*([^*\n]+)\*");
pattern!(ITALIC_UNDERSCORE, r"\b_([^_\n]+)_\b");
pattern!(LINK, r"\[([^\]]+)\]\(\x{e000}(\d+)\x{e001}\)");
pattern!(TOKEN, r"\x{e000}(\d+)\x{e001}");

/// Converts the inline Markdown of a single line into storage markup.
///
/// Unmatched delimiters stay verbatim. Links whose target uses
/// `page_link_scheme` (`scheme://SPACE/Title`) become page references.
pub fn render_inline(text: &str, page_link_scheme: &str) -> String {
    let mut stash = Placeholders::default();

    let text = encode_emoji(text);

    let text = AUTOLINK.replace_all(&text, |caps: &Captures| {
        let url = &caps[1];
        stash.push(format!(
            r#"<a href="{}">{}</a>"#,
            escape_xml(url),
            escape_xml(url)
        ))
    });
    let text = MAILTO.replace_all(&text, |caps: &Captures| {
        let address = &caps[1];
        stash.push(format!(
            r#"<a href="mailto:{}">{}</a>"#,
            escape_xml(address),
            escape_xml(address)
        ))
    });

    let text = escape_text(&text);

    let text = CODE_SPAN.replace_all(&text, |caps: &Captures| {
        stash.push(format!("<code>{}</code>", &caps[1]))
    });

    let text = INLINE_IMAGE.replace_all(&text, |caps: &Captures| {
        stash.push(image(&decode_entities(&caps[1]), &decode_entities(&caps[2])))
    });

    let mut targets: Vec<String> = Vec::new();
    let text = LINK_TARGET.replace_all(&text, |caps: &Captures| {
        targets.push(caps[2].to_string());
        format!(
            "[{}]({TOKEN_OPEN}{}{TOKEN_CLOSE})",
            &caps[1],
            targets.len() - 1
        )
    });

    let text = STRIKE.replace_all(&text, "<del>$1</del>");
    let text = BOLD_ITALIC_STAR.replace_all(&text, "<strong><em>$1</em></strong>");
    let text = BOLD_ITALIC_UNDERSCORE.replace_all(&text, "<strong><em>$1</em></strong>");
    let text = BOLD_STAR.replace_all(&text, "<strong>$1</strong>");
    let text = BOLD_UNDERSCORE.replace_all(&text, "<strong>$1</strong>");
    let text = ITALIC_STAR.replace_all(&text, "<em>$1</em>");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "<em>$1</em>");

    let text = LINK.replace_all(&text, |caps: &Captures| {
        let label = &caps[1];
        let target = caps[2]
            .parse::<usize>()
            .ok()
            .and_then(|index| targets.get(index))
            .map(String::as_str)
            .unwrap_or_default();
        link_markup(label, target, page_link_scheme)
    });

    stash.restore(&text)
}

/// Entity-escapes `&`, `<` and `>`, leaving numeric references intact.
fn escape_text(text: &str) -> String {
    AMPERSAND
        .replace_all(text, |caps: &Captures| match caps.get(1) {
            Some(reference) => format!("&{}", reference.as_str()),
            None => "&amp;".to_string(),
        })
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn link_markup(label: &str, target: &str, page_link_scheme: &str) -> String {
    let prefix = format!("{page_link_scheme}://");
    if let Some((space, title)) = target
        .strip_prefix(&prefix)
        .and_then(|rest| rest.split_once('/'))
        .filter(|(space, title)| !space.is_empty() && !title.is_empty())
    {
        let title = urlencoding::decode(title)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| title.to_string());
        let title = decode_entities(&title).into_owned();
        return format!(
            r#"<ac:link><ri:page ri:space-key="{}" ri:content-title="{}" /><ac:link-body>{}</ac:link-body></ac:link>"#,
            escape_xml(&decode_entities(space)),
            escape_xml(&title),
            label
        );
    }
    format!(r#"<a href="{}">{}</a>"#, target.replace('"', "&quot;"), label)
}

/// Stash of finished markup fragments keyed by placeholder index.
#[derive(Default)]
struct Placeholders {
    fragments: Vec<String>,
}

impl Placeholders {
    fn push(&mut self, fragment: String) -> String {
        self.fragments.push(fragment);
        format!("{TOKEN_OPEN}{}{TOKEN_CLOSE}", self.fragments.len() - 1)
    }

    /// Restores every token. Fragments may contain earlier tokens, so passes
    /// repeat until none remain, bounded by the stash size.
    fn restore(&self, text: &str) -> String {
        let mut result = text.to_string();
        for _ in 0..=self.fragments.len() {
            if !result.contains(TOKEN_OPEN) {
                break;
            }
            result = TOKEN
                .replace_all(&result, |caps: &Captures| {
                    caps[1]
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| self.fragments.get(index))
                        .cloned()
                        .unwrap_or_default()
                })
                .into_owned();
        }
        result
    }
}
