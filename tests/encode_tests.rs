// tests/encode_tests.rs
//! Markdown to storage markup, through the public entry point.

mod common;

use common::{check_tag_balance, config, count};
use pretty_assertions::assert_eq;
use storage2md::{encode_markdown, ConverterConfig};

fn encode(markdown: &str) -> String {
    encode_markdown(markdown, &config())
}

#[test]
fn task_list_items_keep_order_and_status() {
    let storage = encode("# T\n\n- [ ] a\n- [x] b\n");
    assert_eq!(count(&storage, "<ac:task-list>"), 1);
    assert_eq!(count(&storage, "<ac:task>"), 2);

    let statuses: Vec<&str> = storage
        .split("<ac:task-status>")
        .skip(1)
        .filter_map(|rest| rest.split("</ac:task-status>").next())
        .collect();
    assert_eq!(statuses, vec!["incomplete", "complete"]);
    assert!(storage.contains("<ac:task-body>a</ac:task-body>"));
    check_tag_balance(&storage).unwrap();
}

#[test]
fn task_ids_are_fresh_per_item() {
    let storage = encode("- [ ] a\n- [ ] b");
    let uuids: Vec<&str> = storage
        .split("<ac:task-uuid>")
        .skip(1)
        .filter_map(|rest| rest.split("</ac:task-uuid>").next())
        .collect();
    assert_eq!(uuids.len(), 2);
    assert_ne!(uuids[0], uuids[1]);
}

#[test]
fn mermaid_fence_becomes_markdown_macro() {
    let storage = encode("```mermaid\nflowchart TD\nA-->B\n```");
    assert!(storage.starts_with(r#"<ac:structured-macro ac:name="markdown""#));
    assert!(storage.contains("<![CDATA[```mermaid\nflowchart TD\nA-->B\n```]]>"));
    assert!(!storage.contains(r#"ac:name="code""#));
}

#[test]
fn code_fence_keeps_language_and_body() {
    let storage = encode("```rust\nfn main() {\n\n    let a = 1 < 2;\n}\n```");
    assert!(storage.contains(r#"<ac:parameter ac:name="language">rust</ac:parameter>"#));
    assert!(storage.contains("<![CDATA[fn main() {\n\n    let a = 1 < 2;\n}]]>"));
}

#[test]
fn cdata_terminator_in_code_is_split() {
    let storage = encode("```\nx]]>y\n```");
    assert!(storage.contains("<![CDATA[x]]]]><![CDATA[>y]]>"));
}

#[test]
fn text_is_escaped() {
    assert_eq!(
        encode("a < b & c > d"),
        "<p>a &lt; b &amp; c &gt; d</p>"
    );
}

#[test]
fn headings_cover_all_levels() {
    assert_eq!(
        encode("# 1\n## 2\n### 3\n#### 4\n##### 5\n###### 6"),
        "<h1>1</h1><h2>2</h2><h3>3</h3><h4>4</h4><h5>5</h5><h6>6</h6>"
    );
}

#[test]
fn nesting_changes_emit_balanced_tags() {
    let storage = encode("- a\n  - b\n    - c\n  - d\n- e");
    assert_eq!(count(&storage, "<ul>"), 3);
    assert_eq!(count(&storage, "</ul>"), 3);
    assert_eq!(count(&storage, "<li>"), count(&storage, "</li>"));
    check_tag_balance(&storage).unwrap();
}

#[test]
fn mixed_lists_switch_without_leaking_tags() {
    let storage = encode("- a\n  1. b\n  2. c\n- [ ] d\n    - note\n- e\n1. f");
    check_tag_balance(&storage).unwrap();
    assert!(storage.contains("<ul><li>a<ol><li>b</li><li>c</li></ol></li></ul><ac:task-list>"));
    assert!(storage.contains(r#"</ac:task-list><ul style="list-style-type: none;"><li>note</li></ul><ul><li>e</li></ul><ol><li>f</li></ol>"#));
}

#[test]
fn tables_keep_shape() {
    let storage = encode("| Name | Role | Team |\n| --- | --- | --- |\n| Ada | Eng | Core |\n| Bob | | Ops |");
    assert_eq!(
        storage,
        "<table><thead><tr><th>Name</th><th>Role</th><th>Team</th></tr></thead><tbody>\
         <tr><td>Ada</td><td>Eng</td><td>Core</td></tr>\
         <tr><td>Bob</td><td>&#160;</td><td>Ops</td></tr>\
         </tbody></table>"
    );
}

#[test]
fn nested_blockquotes_are_balanced() {
    let storage = encode("> one\n> > two\n> > > three\n> back");
    assert_eq!(count(&storage, "<blockquote>"), 3);
    check_tag_balance(&storage).unwrap();
}

#[test]
fn blockquote_depth_is_capped() {
    let storage = encode(&format!("{} deep", ">".repeat(50)));
    assert_eq!(count(&storage, "<blockquote>"), 10);
    check_tag_balance(&storage).unwrap();
}

#[test]
fn alert_types_map_to_panels() {
    for (label, name) in [
        ("NOTE", "note"),
        ("TIP", "tip"),
        ("INFO", "info"),
        ("WARNING", "warning"),
        ("CAUTION", "caution"),
    ] {
        let storage = encode(&format!("> [!{label}]\n> body"));
        assert!(
            storage.contains(&format!(r#"ac:name="{name}""#)),
            "{label} should map to {name}"
        );
    }
}

#[test]
fn unterminated_constructs_close_at_end_of_input() {
    for markdown in ["```\nopen", "- a\n  - b", "> > q", "| a |\n|---|\n| 1 |", "<details>\nx"] {
        let storage = encode(markdown);
        check_tag_balance(&storage).unwrap_or_else(|err| panic!("{markdown:?}: {err}"));
    }
}

#[test]
fn images_distinguish_urls_from_attachments() {
    assert_eq!(
        encode("![chart](https://cdn.io/c.png)"),
        r#"<ac:image ac:alt="chart"><ri:url ri:value="https://cdn.io/c.png" /></ac:image>"#
    );
    assert_eq!(
        encode("![](../assets/c.png)"),
        r#"<ac:image ac:alt=""><ri:attachment ri:filename="c.png" /></ac:image>"#
    );
}

#[test]
fn horizontal_rules() {
    assert_eq!(encode("a\n\n---\n\nb"), "<p>a</p><hr /><p>b</p>");
}

#[test]
fn emoji_become_numeric_references() {
    assert_eq!(encode("done ✅"), "<p>done &#9989;</p>");
}

#[test]
fn custom_link_scheme_is_honoured() {
    let config = ConverterConfig::default().with_page_link_scheme("kb");
    let storage = encode_markdown("[Home](kb://DOC/Home)", &config);
    assert!(storage.contains(r#"<ri:page ri:space-key="DOC" ri:content-title="Home" />"#));
    let untouched = encode_markdown("[Home](confluence://DOC/Home)", &config);
    assert!(untouched.contains(r#"<a href="confluence://DOC/Home">Home</a>"#));
}
