use reqchain_core::types::StringMap;

const SENSITIVE_HEADERS: [&str; 5] = [
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
];

/// Copy of `headers` safe to log: credential-bearing values are replaced.
pub fn redact_headers(headers: &StringMap, extra: &[&str]) -> StringMap {
    let mut out = headers.clone();
    for name in SENSITIVE_HEADERS.iter().chain(extra.iter()) {
        replace_case_insensitive(&mut out, name, "<redacted>");
    }
    out
}

fn replace_case_insensitive(map: &mut StringMap, header: &str, replacement: &str) {
    let keys = map
        .keys()
        .filter(|k| k.eq_ignore_ascii_case(header))
        .cloned()
        .collect::<Vec<_>>();
    for k in keys {
        map.insert(k, replacement.to_string());
    }
}
