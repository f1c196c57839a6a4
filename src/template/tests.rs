//! Tests for template rendering against an in-memory filesystem.

use super::*;
use crate::agents::{Claude, Copilot};
use crate::fs::MemoryFileSystem;
use std::path::Path;

const BASE: &str = "/proj";

fn engine<'a>(fs: &'a MemoryFileSystem) -> Engine<'a> {
    Engine::new(fs, &Claude, BASE)
}

fn render(fs: &MemoryFileSystem, body: &str) -> Result<String, TemplateError> {
    engine(fs).execute(body, None)
}

fn yaml(src: &str) -> Value {
    serde_yaml::from_str(src).unwrap()
}

#[test]
fn test_plain_text_is_identity() {
    let fs = MemoryFileSystem::new();
    let text = "# Title\n\nSome `code` and { braces } and } stray.\n";
    assert_eq!(render(&fs, text).unwrap(), text);
    assert_eq!(render(&fs, "").unwrap(), "");
}

#[test]
fn test_two_level_include_round_trips() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/a.md", "A starts\n{{include \"b.md\"}}\nA ends"),
        ("/proj/b.md", "B content"),
    ]);
    assert_eq!(
        render(&fs, "{{include \"a.md\"}}").unwrap(),
        "A starts\nB content\nA ends"
    );
}

#[test]
fn test_include_relative_to_including_file() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/docs/guide.md", "guide[{{include \"./parts/one.md\"}}]"),
        ("/proj/docs/parts/one.md", "one[{{include \"../shared.md\"}}]"),
        ("/proj/docs/shared.md", "shared"),
    ]);
    assert_eq!(
        render(&fs, "{{include \"docs/guide.md\"}}").unwrap(),
        "guide[one[shared]]"
    );
}

#[test]
fn test_bare_include_path_is_relative_to_base() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/sub/x.md", "{{include \"y.md\"}}"),
        ("/proj/y.md", "root y"),
        ("/proj/sub/y.md", "sub y"),
    ]);
    assert_eq!(render(&fs, "{{include \"sub/x.md\"}}").unwrap(), "root y");
}

#[test]
fn test_rooted_include() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/sub/x.md", "{{include \"/y.md\"}}"),
        ("/proj/y.md", "rooted"),
    ]);
    assert_eq!(render(&fs, "{{include \"sub/x.md\"}}").unwrap(), "rooted");
}

#[test]
fn test_current_file_is_restored_after_include() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/memories/main.md", "unused"),
        ("/proj/memories/local.md", "local"),
        ("/proj/other/nested.md", "nested"),
    ]);
    let mut engine = engine(&fs).with_current_file("/proj/memories/main.md");
    let out = engine
        .execute("{{include \"other/nested.md\"}} {{include \"./local.md\"}}", None)
        .unwrap();
    assert_eq!(out, "nested local");
}

#[test]
fn test_resolve_path_examples() {
    let fs = MemoryFileSystem::new();
    let engine = Engine::new(&fs, &Claude, "/root").with_current_file("/root/sub/x.md");
    assert_eq!(engine.resolve_path("./y.md"), Path::new("/root/sub/y.md"));
    assert_eq!(engine.resolve_path("/y.md"), Path::new("/root/y.md"));
    assert_eq!(engine.resolve_path("y.md"), Path::new("/root/y.md"));
}

#[test]
fn test_reference_appends_section_once() {
    let fs = MemoryFileSystem::with_files([("/proj/api.md", "API docs\n")]);
    let out = render(
        &fs,
        "See {{reference \"api.md\"}} and again {{reference \"api.md\"}}.",
    )
    .unwrap();

    assert_eq!(
        out,
        "See [Reference: api.md] and again [Reference: api.md].\n\n## References\n\n### api.md\n\nAPI docs\n"
    );
    assert_eq!(out.matches("### api.md").count(), 1);
}

#[test]
fn test_references_keep_first_insertion_order() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/z.md", "zed"),
        ("/proj/a.md", "ay"),
    ]);
    let out = render(
        &fs,
        "{{reference \"z.md\"}}{{reference \"a.md\"}}{{reference \"z.md\"}}",
    )
    .unwrap();
    let z = out.find("### z.md").unwrap();
    let a = out.find("### a.md").unwrap();
    assert!(z < a);
}

#[test]
fn test_references_keyed_by_literal_path() {
    let fs = MemoryFileSystem::with_files([("/proj/a.md", "ay")]);
    let out = render(&fs, "{{reference \"a.md\"}}{{reference \"./a.md\"}}").unwrap();
    assert!(out.contains("### a.md\n"));
    assert!(out.contains("### ./a.md\n"));
}

#[test]
fn test_reference_inside_include_lands_in_top_level_section() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/part.md", "part {{reference \"deep.md\"}}"),
        ("/proj/deep.md", "deep text"),
    ]);
    let out = render(&fs, "top {{include \"part.md\"}}").unwrap();
    assert_eq!(
        out,
        "top part [Reference: deep.md]\n\n## References\n\n### deep.md\n\ndeep text\n"
    );
}

#[test]
fn test_references_do_not_leak_between_executions() {
    let fs = MemoryFileSystem::with_files([("/proj/a.md", "ay")]);
    let mut engine = engine(&fs);
    let first = engine.execute("{{reference \"a.md\"}}", None).unwrap();
    assert!(first.contains("## References"));
    let second = engine.execute("plain", None).unwrap();
    assert_eq!(second, "plain");
}

#[test]
fn test_file_helper_uses_agent_marker() {
    let fs = MemoryFileSystem::new();
    assert_eq!(
        render(&fs, "Read {{file \"src/lib.rs\"}}").unwrap(),
        "Read @src/lib.rs"
    );
    let copilot = Engine::new(&fs, &Copilot, BASE)
        .execute("{{file \"/src/lib.rs\"}}", None)
        .unwrap();
    assert_eq!(copilot, "#file:src/lib.rs");
}

#[test]
fn test_file_helper_does_not_read() {
    let fs = MemoryFileSystem::new();
    assert!(render(&fs, "{{file \"missing.md\"}}").is_ok());
}

#[test]
fn test_mcp_helper() {
    let fs = MemoryFileSystem::new();
    assert_eq!(
        render(&fs, "{{mcp \"github\" \"create_issue\"}}").unwrap(),
        "mcp__github__create_issue"
    );
}

#[test]
fn test_missing_include_fails_with_path() {
    let fs = MemoryFileSystem::new();
    let err = render(&fs, "line\n{{include \"nope.md\"}}").unwrap_err();
    assert_eq!(err.location, "<body>:2:1");
    assert!(err.cause.contains("nope.md"));
}

#[test]
fn test_nested_failure_carries_chain() {
    let fs = MemoryFileSystem::with_files([("/proj/a.md", "x\n  {{include \"gone.md\"}}")]);
    let err = render(&fs, "{{include \"a.md\"}}").unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("<body>:1:1: in \"a.md\": a.md:2:3:"), "{}", message);
    assert!(message.contains("gone.md"));
}

#[test]
fn test_syntax_error_in_included_file() {
    let fs = MemoryFileSystem::with_files([("/proj/bad.md", "{{bogus}}")]);
    let err = render(&fs, "{{include \"bad.md\"}}").unwrap_err();
    assert!(err.to_string().contains("function \"bogus\" not defined"));
}

#[test]
fn test_include_cycle_hits_depth_limit() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/a.md", "{{include \"b.md\"}}"),
        ("/proj/b.md", "{{include \"a.md\"}}"),
    ]);
    let err = engine(&fs)
        .with_max_depth(8)
        .execute("{{include \"a.md\"}}", None)
        .unwrap_err();
    assert!(err.to_string().contains("maximum include depth 8 exceeded"));
}

#[test]
fn test_depth_limit_allows_exact_depth() {
    let fs = MemoryFileSystem::with_files([
        ("/proj/1.md", "{{include \"2.md\"}}"),
        ("/proj/2.md", "bottom"),
    ]);
    let out = engine(&fs)
        .with_max_depth(2)
        .execute("{{include \"1.md\"}}", None)
        .unwrap();
    assert_eq!(out, "bottom");
}

#[test]
fn test_data_lookup_and_conditionals() {
    let fs = MemoryFileSystem::new();
    let data = yaml("name: deploy\nclaude:\n  model: opus\nflags: []\ncount: 0\n");
    let mut engine = engine(&fs);
    let out = engine
        .execute(
            "{{.name}}/{{.claude.model}}/{{.missing.deep}}/{{if .flags}}F{{else}}noF{{end}}/{{if .count}}C{{else}}noC{{end}}/{{if .name}}N{{end}}",
            Some(&data),
        )
        .unwrap();
    assert_eq!(out, "deploy/opus//noF/noC/N");
}

#[test]
fn test_data_is_visible_in_included_files() {
    let fs = MemoryFileSystem::with_files([("/proj/part.md", "hello {{.who}}")]);
    let data = yaml("who: world");
    let out = engine(&fs)
        .execute("{{include \"part.md\"}}", Some(&data))
        .unwrap();
    assert_eq!(out, "hello world");
}

#[test]
fn test_field_as_helper_argument() {
    let fs = MemoryFileSystem::with_files([("/proj/docs/x.md", "from field")]);
    let data = yaml("doc: docs/x.md");
    let out = engine(&fs)
        .execute("{{include .doc}}", Some(&data))
        .unwrap();
    assert_eq!(out, "from field");
}

#[test]
fn test_template_error_converts_to_render_error() {
    let fs = MemoryFileSystem::new();
    let err: AgentDocsError = render(&fs, "{{nope}}").unwrap_err().into();
    assert!(matches!(err, AgentDocsError::Render(_)));
}
