use super::*;

#[test]
fn header_markdown_uses_level() {
    assert_eq!(OutputMode::Markdown.header("Title", 1), "# Title\n\n");
    assert_eq!(OutputMode::Markdown.header("Title", 3), "### Title\n\n");
}

#[test]
fn header_plain_ignores_level() {
    assert_eq!(OutputMode::Plain.header("Title", 3), "Title\n\n");
}

#[test]
fn table_markdown() {
    let rows = vec![vec!["1", "a"], vec!["2", "b"]];
    assert_eq!(
        OutputMode::Markdown.table(&["ID", "Name"], &rows),
        "| ID | Name |\n| --- | --- |\n| 1 | a |\n| 2 | b |\n\n"
    );
}

#[test]
fn table_plain_keeps_header_row_without_separator() {
    let rows = vec![vec!["1".to_string(), "a".to_string()]];
    assert_eq!(
        OutputMode::Plain.table(&["ID", "Name"], &rows),
        "ID | Name\n1 | a\n\n"
    );
}

#[test]
fn list_is_mode_independent() {
    for mode in [OutputMode::Markdown, OutputMode::Plain] {
        assert_eq!(mode.list(&["a", "b"], false), "- a\n- b\n\n");
        assert_eq!(mode.list(&["a", "b"], true), "1. a\n2. b\n\n");
    }
}

#[test]
fn code_block() {
    assert_eq!(
        OutputMode::Markdown.code_block("{}", "json"),
        "```json\n{}\n```\n\n"
    );
    assert_eq!(OutputMode::Plain.code_block("{}", "json"), "{}\n\n");
}

#[test]
fn link_and_bold() {
    assert_eq!(
        OutputMode::Markdown.link("Sentry", "https://sentry.io"),
        "[Sentry](https://sentry.io)"
    );
    assert_eq!(
        OutputMode::Plain.link("Sentry", "https://sentry.io"),
        "Sentry: https://sentry.io"
    );
    assert_eq!(OutputMode::Markdown.bold("x"), "**x**");
    assert_eq!(OutputMode::Plain.bold("x"), "x");
}

#[test]
fn separator() {
    assert_eq!(OutputMode::Markdown.separator(), "---\n\n");
    assert_eq!(
        OutputMode::Plain.separator(),
        format!("{}\n\n", "-".repeat(40))
    );
}

#[test]
fn field_label() {
    assert_eq!(OutputMode::Markdown.field("ID", "1"), "**ID**: 1");
    assert_eq!(OutputMode::Plain.field("ID", "1"), "ID: 1");
}

#[test]
fn or_na_placeholder() {
    assert_eq!(or_na(Some("x")), "x");
    assert_eq!(or_na(Some("")), "N/A");
    assert_eq!(or_na(None), "N/A");
}

#[test]
fn epoch_to_iso_utc() {
    assert_eq!(epoch_to_iso(0), "1970-01-01T00:00:00.000Z");
    assert_eq!(epoch_to_iso(1_700_000_000), "2023-11-14T22:13:20.000Z");
}

#[test]
fn modes_default() {
    assert_eq!(OutputMode::default(), OutputMode::Markdown);
    assert_eq!(DetailLevel::default(), DetailLevel::Detailed);
}

#[test]
fn modes_deserialize_lowercase() {
    let mode: OutputMode = serde_json::from_str("\"plain\"").unwrap();
    let detail: DetailLevel = serde_json::from_str("\"summary\"").unwrap();
    assert_eq!(mode, OutputMode::Plain);
    assert_eq!(detail, DetailLevel::Summary);
}
