//! Storage-markup builders for the constructs the line encoder emits.
//!
//! Builders take inline content that is already rendered and escaped; plain
//! values (titles, languages, attribute values) are escaped here.

use crate::constants::MACRO_SCHEMA_VERSION;
use crate::model::{escape_xml, PanelKind};
use crate::types::{MacroId, TaskId};

/// Wraps text in a CDATA section, splitting any embedded terminator.
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn macro_open(name: &str) -> String {
    format!(
        r#"<ac:structured-macro ac:name="{}" ac:schema-version="{}" ac:macro-id="{}">"#,
        name,
        MACRO_SCHEMA_VERSION,
        MacroId::new_v4()
    )
}

fn parameter(name: &str, value: &str) -> String {
    format!(
        r#"<ac:parameter ac:name="{}">{}</ac:parameter>"#,
        name,
        escape_xml(value)
    )
}

fn paragraphs(content: &[String]) -> String {
    content.iter().map(|p| format!("<p>{p}</p>")).collect()
}

/// Code macro with an optional language parameter.
pub fn code_macro(language: Option<&str>, body: &str) -> String {
    let language = language
        .map(|lang| parameter("language", lang))
        .unwrap_or_default();
    format!(
        "{}{}<ac:plain-text-body>{}</ac:plain-text-body></ac:structured-macro>",
        macro_open("code"),
        language,
        cdata(body)
    )
}

/// Markdown macro carrying a fenced mermaid diagram.
pub fn mermaid_macro(diagram: &str) -> String {
    format!(
        "{}<ac:plain-text-body>{}</ac:plain-text-body></ac:structured-macro>",
        macro_open("markdown"),
        cdata(&format!("```mermaid\n{diagram}\n```"))
    )
}

pub fn panel_macro(kind: PanelKind, content: &[String]) -> String {
    format!(
        "{}<ac:rich-text-body>{}</ac:rich-text-body></ac:structured-macro>",
        macro_open(kind.macro_name()),
        paragraphs(content)
    )
}

pub fn expand_macro(title: &str, content: &[String]) -> String {
    format!(
        "{}{}<ac:rich-text-body>{}</ac:rich-text-body></ac:structured-macro>",
        macro_open("expand"),
        parameter("title", title),
        paragraphs(content)
    )
}

/// A single task with fresh identifiers.
pub fn task(complete: bool, body: &str) -> String {
    let status = if complete { "complete" } else { "incomplete" };
    format!(
        "<ac:task><ac:task-id>{}</ac:task-id><ac:task-uuid>{}</ac:task-uuid><ac:task-status>{}</ac:task-status><ac:task-body>{}</ac:task-body></ac:task>",
        TaskId::random(),
        MacroId::new_v4(),
        status,
        body
    )
}

/// Image element: `http(s)` URLs are external references, anything else an
/// attachment named by the path's last segment.
pub fn image(alt: &str, url: &str) -> String {
    let alt = escape_xml(alt);
    if url.starts_with("http://") || url.starts_with("https://") {
        format!(
            r#"<ac:image ac:alt="{}"><ri:url ri:value="{}" /></ac:image>"#,
            alt,
            escape_xml(url)
        )
    } else {
        let filename = url.rsplit('/').next().filter(|name| !name.is_empty()).unwrap_or(url);
        format!(
            r#"<ac:image ac:alt="{}"><ri:attachment ri:filename="{}" /></ac:image>"#,
            alt,
            escape_xml(filename)
        )
    }
}

/// One table row of already-rendered cells, padded or truncated to `columns`.
pub fn table_row(tag: &str, cells: &[String], columns: usize) -> String {
    let mut row = String::from("<tr>");
    for index in 0..columns {
        let cell = cells.get(index).map(String::as_str).unwrap_or_default();
        row.push_str(&format!("<{tag}>{cell}</{tag}>"));
    }
    row.push_str("</tr>");
    row
}
