//! URL scheme allowlist for `href` and `src` values

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

fn scheme_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").ok())
        .as_ref()
}

/// Returns the URL unchanged when it is relative or uses an allowed scheme,
/// otherwise an empty string
pub fn safe_url(url: &str) -> &str {
    // Browsers drop whitespace and control characters inside a scheme
    let compact: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();

    let Some(pattern) = scheme_pattern() else {
        return "";
    };

    match pattern.captures(&compact).and_then(|caps| caps.get(1)) {
        None => url.trim(),
        Some(scheme) => {
            let scheme = scheme.as_str().to_ascii_lowercase();
            if ALLOWED_SCHEMES.contains(&scheme.as_str()) {
                url.trim()
            } else {
                warn!(scheme = %scheme, "Dropping URL with disallowed scheme");
                ""
            }
        }
    }
}
