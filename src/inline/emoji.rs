//! Emoji glyphs that storage markup expects as numeric character references.

use std::borrow::Cow;

/// Glyph to entity table. Variation-selector forms come first so the bare
/// glyph rule never leaves a dangling `U+FE0F` behind.
const EMOJI_ENTITIES: &[(&str, &str)] = &[
    ("\u{1f3f7}\u{fe0f}", "&#127991;"),
    ("\u{26a0}\u{fe0f}", "&#9888;"),
    ("\u{1f4cb}", "&#128203;"),
    ("\u{1f4c4}", "&#128196;"),
    ("\u{1f50d}", "&#128269;"),
    ("\u{1f3f7}", "&#127991;"),
    ("\u{1f465}", "&#128101;"),
    ("\u{1f3e2}", "&#127970;"),
    ("\u{1f4dd}", "&#128221;"),
    ("\u{2b50}", "&#11088;"),
    ("\u{2705}", "&#9989;"),
    ("\u{274c}", "&#10060;"),
    ("\u{1f680}", "&#128640;"),
    ("\u{1f4e6}", "&#128230;"),
    ("\u{1f4a1}", "&#128161;"),
    ("\u{1f527}", "&#128295;"),
    ("\u{26a0}", "&#9888;"),
    ("\u{1f4ca}", "&#128202;"),
    ("\u{1f91d}", "&#129309;"),
    ("\u{1f4c8}", "&#128200;"),
    ("\u{1f3af}", "&#127919;"),
];

/// Replaces every glyph in the table with its numeric reference.
pub fn encode_emoji(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut result = Cow::Borrowed(text);
    for (glyph, entity) in EMOJI_ENTITIES {
        if result.contains(glyph) {
            result = Cow::Owned(result.replace(glyph, entity));
        }
    }
    result
}
