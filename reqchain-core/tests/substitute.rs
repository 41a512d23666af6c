use reqchain_core::expressions::{parse_template, unresolved_names, Segment};
use reqchain_core::types::Variables;
use reqchain_core::{substitute, EncodingContext};
use serde_json::json;

fn scope(pairs: &[(&str, serde_json::Value)]) -> Variables {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn substitutes_path_segment() {
    let vars = scope(&[("x", json!("42"))]);
    assert_eq!(substitute("{{x}}/items", &vars, EncodingContext::Url), "42/items");
}

#[test]
fn missing_variable_is_left_literal() {
    let vars = Variables::new();
    assert_eq!(substitute("{{missing}}", &vars, EncodingContext::Url), "{{missing}}");
    assert_eq!(
        substitute("/users/{{ missing }}/posts", &vars, EncodingContext::Url),
        "/users/{{ missing }}/posts"
    );
}

#[test]
fn url_context_encodes_reserved_characters() {
    let vars = scope(&[("name", json!("a b/c?d"))]);
    assert_eq!(
        substitute("/files/{{name}}", &vars, EncodingContext::Url),
        "/files/a%20b%2Fc%3Fd"
    );
}

#[test]
fn query_context_percent_encodes() {
    let vars = scope(&[("q", json!("rust & go=fun"))]);
    assert_eq!(
        substitute("{{q}}", &vars, EncodingContext::Query),
        "rust%20%26%20go%3Dfun"
    );
}

#[test]
fn header_context_strips_line_breaks() {
    let vars = scope(&[("token", json!("abc\r\nX-Injected: yes"))]);
    assert_eq!(
        substitute("Bearer {{token}}", &vars, EncodingContext::Header),
        "Bearer abcX-Injected: yes"
    );
}

#[test]
fn body_context_inserts_raw_text() {
    let vars = scope(&[("id", json!("a/b c"))]);
    assert_eq!(
        substitute(r#"{"id":"{{id}}"}"#, &vars, EncodingContext::Body),
        r#"{"id":"a/b c"}"#
    );
}

#[test]
fn non_string_values_are_rendered() {
    let vars = scope(&[
        ("n", json!(7)),
        ("flag", json!(true)),
        ("obj", json!({"a": 1})),
        ("nothing", json!(null)),
    ]);
    assert_eq!(
        substitute("{{n}}|{{flag}}|{{obj}}|{{nothing}}", &vars, EncodingContext::Body),
        r#"7|true|{"a":1}|"#
    );
}

#[test]
fn substitution_is_single_pass() {
    // A value that itself looks like a placeholder is not expanded again.
    let vars = scope(&[("a", json!("{{b}}")), ("b", json!("nope"))]);
    assert_eq!(substitute("{{a}}", &vars, EncodingContext::Body), "{{b}}");
}

#[test]
fn malformed_braces_are_literal() {
    let vars = scope(&[("x", json!("1"))]);
    assert_eq!(substitute("{{x", &vars, EncodingContext::Body), "{{x");
    assert_eq!(substitute("{{ }}", &vars, EncodingContext::Body), "{{ }}");
    assert_eq!(substitute("{{{x}}}", &vars, EncodingContext::Body), "{1}");
}

#[test]
fn template_splits_literals_and_placeholders() {
    let tpl = parse_template("/a/{{id}}/b");
    assert_eq!(
        tpl.segments,
        vec![
            Segment::Literal("/a/".to_string()),
            Segment::Placeholder {
                name: "id".to_string(),
                raw: "{{id}}".to_string()
            },
            Segment::Literal("/b".to_string()),
        ]
    );
}

#[test]
fn lists_unresolved_names() {
    let vars = scope(&[("known", json!("1"))]);
    assert_eq!(
        unresolved_names("{{known}}/{{a}}?x={{b}}", &vars),
        vec!["a".to_string(), "b".to_string()]
    );
}
