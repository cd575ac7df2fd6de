//! CORS header detection and spoofed Origin derivation.
//!
//! Detection is a plain substring match on lowercased header names. It does
//! not check whether the reflected origin equals the one that was sent.

use url::Url;

/// Appended to the target's own origin to build an origin it cannot trust.
pub const ORIGIN_SUFFIX: &str = "-test.cors.com";

/// Lowercased substrings that mark a response header as CORS-related.
pub const CORS_HEADER_PATTERNS: [&str; 6] = [
    "access-control-allow-origin",
    "access-control-allow-methods",
    "access-control-allow-headers",
    "access-control-allow-credentials",
    "access-control-expose-headers",
    "access-control-max-age",
];

/// Returns true if `name` contains any CORS header pattern, ignoring case.
pub fn is_cors_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    CORS_HEADER_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

/// Builds the Origin sent to `url`: its `scheme://host[:port]` plus [`ORIGIN_SUFFIX`].
///
/// Returns `None` for URLs without a host.
pub fn spoofed_origin(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
    Some(format!("{}://{}{}{}", url.scheme(), host, port, ORIGIN_SUFFIX))
}

/// Formats a header name the way it is usually written on the wire,
/// e.g. `access-control-allow-origin` becomes `Access-Control-Allow-Origin`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
