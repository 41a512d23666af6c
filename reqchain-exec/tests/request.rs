use reqchain_core::types::{
    HttpMethod, Variables, WorkflowDefinition, WorkflowDocument, WorkflowRequest, WorkflowStep,
};
use reqchain_exec::executor::{build_request, build_url, encode_component, parse_body};
use serde_json::json;

fn doc_with(request: WorkflowRequest) -> (WorkflowDocument, WorkflowStep) {
    let step = WorkflowStep::new(0, "only", request).with_id("only");
    let doc = WorkflowDocument::transient(
        WorkflowDefinition::new("w", "https://api.test/v1").with_step(step.clone()),
    );
    (doc, step)
}

fn vars(pairs: &[(&str, serde_json::Value)]) -> Variables {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn url_is_server_url_plus_substituted_path() {
    let (doc, step) = doc_with(WorkflowRequest::new(HttpMethod::Get, "/users/{{id}}/posts"));
    let req = build_request(&doc, &step, &vars(&[("id", json!("a/b"))]));
    assert_eq!(req.url, "https://api.test/v1/users/a%2Fb/posts");
}

#[test]
fn unresolved_path_placeholder_is_sent_literally() {
    let (doc, step) = doc_with(WorkflowRequest::new(HttpMethod::Get, "/users/{{missing}}"));
    let req = build_request(&doc, &step, &Variables::new());
    assert_eq!(req.url, "https://api.test/v1/users/{{missing}}");
}

#[test]
fn query_values_are_encoded_once() {
    let mut request = WorkflowRequest::new(HttpMethod::Get, "/search");
    request.query_params.insert("q".into(), "{{term}}".into());
    request.query_params.insert("lang".into(), "en us".into());
    request.query_params.insert("page".into(), "{{page}}".into());
    let (doc, step) = doc_with(request);

    let req = build_request(&doc, &step, &vars(&[("term", json!("a b&c")), ("page", json!(2))]));

    assert_eq!(req.url, "https://api.test/v1/search?lang=en%20us&page=2&q=a%20b%26c");
}

#[test]
fn empty_query_values_are_omitted() {
    let mut request = WorkflowRequest::new(HttpMethod::Get, "/items");
    request.query_params.insert("cursor".into(), "{{cursor}}".into());
    request.query_params.insert("limit".into(), "".into());
    let (doc, step) = doc_with(request);

    let req = build_request(&doc, &step, &vars(&[("cursor", serde_json::Value::Null)]));

    assert_eq!(req.url, "https://api.test/v1/items");
}

#[test]
fn query_is_appended_to_existing_query_string() {
    assert_eq!(
        build_url("https://h", "/p?x=1", &[("y".into(), "2".into())]),
        "https://h/p?x=1&y=2"
    );
}

#[test]
fn encode_component_keeps_existing_escapes() {
    assert_eq!(encode_component("a%20b"), "a%20b");
    assert_eq!(encode_component("100%"), "100%25");
    assert_eq!(encode_component("%zz"), "%25zz");
    assert_eq!(encode_component("x y"), "x%20y");
}

#[test]
fn body_is_only_sent_for_post_put_patch() {
    let get = WorkflowRequest {
        body: Some(r#"{"a":1}"#.into()),
        ..WorkflowRequest::new(HttpMethod::Get, "/x")
    };
    let (doc, step) = doc_with(get);
    assert_eq!(build_request(&doc, &step, &Variables::new()).body, None);

    let patch = WorkflowRequest {
        body: Some(r#"{"name":"{{name}}"}"#.into()),
        ..WorkflowRequest::new(HttpMethod::Patch, "/x")
    };
    let (doc, step) = doc_with(patch);
    let req = build_request(&doc, &step, &vars(&[("name", json!("a\"b"))]));
    assert_eq!(req.body.as_deref(), Some(r#"{"name":"a"b"}"#));
}

#[test]
fn header_values_lose_control_characters() {
    let mut request = WorkflowRequest::new(HttpMethod::Get, "/x");
    request.headers.insert("X-Trace".into(), "{{trace}}".into());
    let (doc, step) = doc_with(request);

    let req = build_request(&doc, &step, &vars(&[("trace", json!("abc\r\nInjected: 1"))]));

    assert_eq!(req.headers.get("X-Trace").map(String::as_str), Some("abcInjected: 1"));
}

#[test]
fn response_bodies_parse_as_json_or_text() {
    assert_eq!(parse_body(b""), None);
    assert_eq!(parse_body(b" \n"), None);
    assert_eq!(parse_body(br#"{"id":1}"#), Some(json!({"id": 1})));
    assert_eq!(parse_body(b"plain text"), Some(json!("plain text")));
}
