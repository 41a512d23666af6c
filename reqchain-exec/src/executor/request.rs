use serde::Serialize;

use reqchain_core::expressions::{substitute, EncodingContext};
use reqchain_core::types::{
    HttpMethod, StringMap, Variables, WorkflowAuth, WorkflowDocument, WorkflowStep,
};

/// A request with every placeholder resolved, handed to the execution collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: StringMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Step auth when set, otherwise the workflow's shared auth.
    #[serde(skip)]
    pub auth: WorkflowAuth,
}

pub fn build_request(
    workflow: &WorkflowDocument,
    step: &WorkflowStep,
    variables: &Variables,
) -> ResolvedRequest {
    let req = &step.request;

    let path = substitute(&req.path, variables, EncodingContext::Url);

    let headers = req
        .headers
        .iter()
        .map(|(k, v)| (k.clone(), substitute(v, variables, EncodingContext::Header)))
        .collect::<StringMap>();

    // Parameters that resolve to an empty string are left out of the query.
    let query = req
        .query_params
        .iter()
        .map(|(k, v)| (k.clone(), substitute(v, variables, EncodingContext::Query)))
        .filter(|(_, v)| !v.is_empty())
        .collect::<Vec<_>>();

    let body = if req.method.carries_body() {
        req.body
            .as_deref()
            .map(|b| substitute(b, variables, EncodingContext::Body))
    } else {
        None
    };

    ResolvedRequest {
        method: req.method,
        url: build_url(&workflow.server_url, &path, &query),
        headers,
        body,
        auth: WorkflowAuth::effective(req.auth.as_ref(), workflow.shared_auth.as_ref()),
    }
}

/// `server_url` and `path` are joined verbatim; the query is appended with `?` or `&`.
pub fn build_url(server_url: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!("{server_url}{path}");
    if query.is_empty() {
        return url;
    }
    url.push(if url.contains('?') { '&' } else { '?' });
    let pairs = query
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>();
    url.push_str(&pairs.join("&"));
    url
}

/// Percent-encodes `s`, passing existing `%XX` escapes through unchanged so values that were
/// already encoded during substitution are not encoded twice.
pub fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('%') {
        out.push_str(&urlencoding::encode(&rest[..pos]));
        let tail = &rest[pos..];
        let b = tail.as_bytes();
        if b.len() >= 3 && b[1].is_ascii_hexdigit() && b[2].is_ascii_hexdigit() {
            out.push_str(&tail[..3]);
            rest = &tail[3..];
        } else {
            out.push_str("%25");
            rest = &tail[1..];
        }
    }
    out.push_str(&urlencoding::encode(rest));
    out
}
